//! UniDex CLI - deployment and trading tool
//!
//! Front end for an ETH/token constant-product pool: deploys the exchange
//! contract to a test network, quotes liquidity and swap operations with
//! the local engine, and submits them through a locally-signed JSON-RPC
//! connection (localnet dev node or Sepolia).

use clap::{Parser, Subcommand};
use colored::Colorize;

mod client;
mod config;
mod deploy;
mod exchange;
mod liquidity;
mod tests;
mod trading;

use config::NetworkConfig;

#[derive(Parser)]
#[command(name = "unidex")]
#[command(about = "UniDex CLI - deploy and trade an ETH/token constant-product pool", long_about = None)]
#[command(version)]
struct Cli {
    /// Network to connect to (localnet, sepolia)
    #[arg(short, long, default_value = "localnet")]
    network: String,

    /// RPC URL (overrides network default)
    #[arg(short, long)]
    url: Option<String>,

    /// Path to a hex-encoded secp256k1 secret key file
    #[arg(short, long)]
    keypair: Option<String>,

    /// Path to the deployment record
    #[arg(short, long)]
    deployments: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the exchange contract to the network
    Deploy {
        /// Address of the ERC20 token the pool trades against
        token: String,

        /// Path to the compiled contract artifact (abi + bytecode JSON)
        #[arg(long)]
        artifact: Option<String>,

        /// Swap fee the deployed contract charges, in basis points.
        /// Recorded for quoting; must match the compiled contract.
        #[arg(long, default_value = "30")]
        fee_bps: u64,
    },

    /// Liquidity operations
    Liquidity {
        #[command(subcommand)]
        command: LiquidityCommands,
    },

    /// Swap operations
    Swap {
        #[command(subcommand)]
        command: SwapCommands,
    },

    /// Show pool reserves, supply and spot price
    Status,

    /// Show signer balances (ETH, token, LP)
    Balances,

    /// Run the E2E smoke suite against a dev node
    Test,
}

#[derive(Subcommand)]
enum LiquidityCommands {
    /// Add liquidity; the token leg is quoted from the pool ratio
    Add {
        /// Ether amount to deposit (e.g. 1.5)
        eth: String,

        /// Token amount for the first, ratio-setting deposit
        #[arg(long)]
        tokens: Option<String>,

        /// Print the quote without submitting
        #[arg(long)]
        dry_run: bool,
    },

    /// Burn LP shares and withdraw both legs
    Remove {
        /// LP share amount to burn
        lp: String,

        /// Print the quote without submitting
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the signer's LP position
    Show,
}

#[derive(Subcommand)]
enum SwapCommands {
    /// Print a live quote without submitting
    Quote {
        /// Swap direction (eth-to-token or token-to-eth)
        direction: String,

        /// Input amount (ETH or UDT, by direction)
        amount: String,
    },

    /// Execute a swap
    Execute {
        /// Swap direction (eth-to-token or token-to-eth)
        direction: String,

        /// Input amount (ETH or UDT, by direction)
        amount: String,

        /// Allowed slippage versus the quoted output, in basis points
        #[arg(long, default_value = "50")]
        slippage_bps: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // Initialize network configuration
    let config = NetworkConfig::new(
        &cli.network,
        cli.url.clone(),
        cli.keypair.clone(),
        cli.deployments.clone(),
    )?;

    if cli.verbose {
        println!("{} {}", "Network:".bright_cyan(), config.network);
        println!("{} {}", "RPC URL:".bright_cyan(), config.rpc_url);
        println!("{} {}", "Chain Id:".bright_cyan(), config.chain_id);
        println!("{} {}", "Keypair:".bright_cyan(), config.key_path.display());
        println!(
            "{} {}",
            "Account:".bright_cyan(),
            client::format_address(config.sender)
        );
    }

    // Execute command
    match cli.command {
        Commands::Deploy {
            token,
            artifact,
            fee_bps,
        } => {
            deploy::deploy_exchange(&config, token, artifact, fee_bps).await?;
        }
        Commands::Liquidity { command } => match command {
            LiquidityCommands::Add {
                eth,
                tokens,
                dry_run,
            } => {
                liquidity::add_liquidity(&config, eth, tokens, dry_run).await?;
            }
            LiquidityCommands::Remove { lp, dry_run } => {
                liquidity::remove_liquidity(&config, lp, dry_run).await?;
            }
            LiquidityCommands::Show => {
                liquidity::show_position(&config).await?;
            }
        },
        Commands::Swap { command } => match command {
            SwapCommands::Quote { direction, amount } => {
                trading::quote_swap(&config, direction, amount).await?;
            }
            SwapCommands::Execute {
                direction,
                amount,
                slippage_bps,
            } => {
                trading::execute_swap(&config, direction, amount, slippage_bps).await?;
            }
        },
        Commands::Status => {
            exchange::show_status(&config).await?;
        }
        Commands::Balances => {
            exchange::show_balances(&config).await?;
        }
        Commands::Test => {
            tests::run_smoke_tests(&config).await?;
        }
    }

    Ok(())
}
