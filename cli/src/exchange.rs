//! Exchange and token contract bindings
//!
//! Thin typed wrappers over the pool's ABI. Reads return raw `U256` wei
//! amounts for the quote engine; writes are signed locally and block until
//! the configured number of confirmations.

use anyhow::{Context, Result};
use colored::Colorize;
use ethereum_types::{Address, U256};
use web3::contract::tokens::Tokenize;
use web3::contract::{Contract, Options};
use web3::signing::SecretKeyRef;
use web3::transports::Http;
use web3::types::TransactionReceipt;
use web3::Web3;

use quote_model::PoolSnapshot;

use crate::client;
use crate::config::NetworkConfig;

const EXCHANGE_ABI: &[u8] = include_bytes!("../abi/exchange.json");
const TOKEN_ABI: &[u8] = include_bytes!("../abi/token.json");

/// Confirmations to wait before a write is reported as done
const CONFIRMATIONS: usize = 1;

pub struct ExchangeHandle {
    web3: Web3<Http>,
    exchange: Contract<Http>,
    token: Contract<Http>,
    pub fee_bps: u64,
}

impl ExchangeHandle {
    /// Bind to the pool recorded for the configured network.
    pub fn connect(config: &NetworkConfig) -> Result<Self> {
        let record = config.deployment()?;
        let web3 = client::connect(config)?;

        let exchange_address = client::parse_address(&record.exchange)
            .context("Invalid exchange address in deployment record")?;
        let token_address = client::parse_address(&record.token)
            .context("Invalid token address in deployment record")?;

        let exchange = Contract::from_json(web3.eth(), exchange_address, EXCHANGE_ABI)
            .context("Invalid exchange ABI")?;
        let token = Contract::from_json(web3.eth(), token_address, TOKEN_ABI)
            .context("Invalid token ABI")?;

        Ok(Self {
            web3,
            exchange,
            token,
            fee_bps: record.fee_bps,
        })
    }

    pub fn address(&self) -> Address {
        self.exchange.address()
    }

    pub fn token_address(&self) -> Address {
        self.token.address()
    }

    pub async fn ensure_chain(&self, config: &NetworkConfig) -> Result<()> {
        client::ensure_chain(&self.web3, config).await
    }

    /// Capture the pool state the engine quotes against. Three separate
    /// reads; the snapshot can go stale before submission.
    pub async fn snapshot(&self) -> Result<PoolSnapshot> {
        let eth_reserve = client::eth_balance(&self.web3, self.address()).await?;
        let token_reserve: U256 = self
            .exchange
            .query("getReserve", (), None, Options::default(), None)
            .await
            .context("Failed to read token reserve")?;
        let lp_total_supply: U256 = self
            .exchange
            .query("totalSupply", (), None, Options::default(), None)
            .await
            .context("Failed to read LP total supply")?;

        log::debug!(
            "snapshot: eth_reserve={eth_reserve} token_reserve={token_reserve} lp_supply={lp_total_supply}"
        );

        Ok(PoolSnapshot {
            eth_reserve,
            token_reserve,
            lp_total_supply,
        })
    }

    pub async fn eth_balance(&self, owner: Address) -> Result<U256> {
        client::eth_balance(&self.web3, owner).await
    }

    pub async fn token_balance(&self, owner: Address) -> Result<U256> {
        self.token
            .query("balanceOf", (owner,), None, Options::default(), None)
            .await
            .context("Failed to read token balance")
    }

    pub async fn lp_balance(&self, owner: Address) -> Result<U256> {
        self.exchange
            .query("balanceOf", (owner,), None, Options::default(), None)
            .await
            .context("Failed to read LP balance")
    }

    pub async fn allowance(&self, owner: Address) -> Result<U256> {
        self.token
            .query(
                "allowance",
                (owner, self.address()),
                None,
                Options::default(),
                None,
            )
            .await
            .context("Failed to read token allowance")
    }

    /// The contract's own swap quote, for cross-checking the engine.
    pub async fn contract_swap_quote(
        &self,
        input_amount: U256,
        input_reserve: U256,
        output_reserve: U256,
    ) -> Result<U256> {
        self.exchange
            .query(
                "getAmountOfTokens",
                (input_amount, input_reserve, output_reserve),
                None,
                Options::default(),
                None,
            )
            .await
            .context("Failed to query contract swap quote")
    }

    /// Grant the exchange allowance to pull `amount` tokens, skipping the
    /// transaction when the standing allowance already covers it.
    pub async fn ensure_allowance(&self, config: &NetworkConfig, amount: U256) -> Result<()> {
        let current = self.allowance(config.sender).await?;
        if current >= amount {
            log::debug!("allowance {current} already covers {amount}");
            return Ok(());
        }

        println!("{}", "Approving token transfer...".dimmed());
        self.submit(
            &self.token,
            "approve",
            (self.address(), amount),
            Options::default(),
            config,
        )
        .await?;
        Ok(())
    }

    pub async fn add_liquidity(
        &self,
        config: &NetworkConfig,
        token_amount: U256,
        eth_amount: U256,
    ) -> Result<TransactionReceipt> {
        self.submit(
            &self.exchange,
            "addLiquidity",
            (token_amount,),
            Options::with(|options| options.value = Some(eth_amount)),
            config,
        )
        .await
    }

    pub async fn remove_liquidity(
        &self,
        config: &NetworkConfig,
        lp_amount: U256,
    ) -> Result<TransactionReceipt> {
        self.submit(
            &self.exchange,
            "removeLiquidity",
            (lp_amount,),
            Options::default(),
            config,
        )
        .await
    }

    pub async fn eth_to_token(
        &self,
        config: &NetworkConfig,
        eth_amount: U256,
        min_tokens: U256,
    ) -> Result<TransactionReceipt> {
        self.submit(
            &self.exchange,
            "ethToToken",
            (min_tokens,),
            Options::with(|options| options.value = Some(eth_amount)),
            config,
        )
        .await
    }

    pub async fn token_to_eth(
        &self,
        config: &NetworkConfig,
        token_amount: U256,
        min_eth: U256,
    ) -> Result<TransactionReceipt> {
        self.submit(
            &self.exchange,
            "tokenToEth",
            (token_amount, min_eth),
            Options::default(),
            config,
        )
        .await
    }

    /// Sign, submit and wait for confirmation, failing on an on-chain
    /// revert rather than reporting a mined-but-failed transaction as done.
    async fn submit<P: Tokenize>(
        &self,
        contract: &Contract<Http>,
        func: &str,
        params: P,
        options: Options,
        config: &NetworkConfig,
    ) -> Result<TransactionReceipt> {
        let spinner =
            client::confirmation_spinner(&format!("Waiting for {func} confirmation..."));

        let receipt = contract
            .signed_call_with_confirmations(
                func,
                params,
                options,
                CONFIRMATIONS,
                SecretKeyRef::new(&config.secret_key),
            )
            .await
            .with_context(|| format!("Failed to submit {func} transaction"))?;

        spinner.finish_and_clear();

        if receipt.status != Some(1.into()) {
            anyhow::bail!(
                "{} transaction reverted on-chain: {}",
                func,
                client::format_tx_hash(receipt.transaction_hash, &config.network)
            );
        }

        println!(
            "{} {}",
            "Transaction confirmed:".bright_green(),
            client::format_tx_hash(receipt.transaction_hash, &config.network)
        );

        Ok(receipt)
    }
}

/// `unidex status` - pool reserves, supply and spot price
pub async fn show_status(config: &NetworkConfig) -> Result<()> {
    println!("{}", "=== Pool Status ===".bright_green().bold());
    println!("{} {}", "Network:".bright_cyan(), config.network);

    let handle = ExchangeHandle::connect(config)?;
    handle.ensure_chain(config).await?;

    println!(
        "{} {}",
        "Exchange:".bright_cyan(),
        client::format_address(handle.address())
    );
    println!(
        "{} {}",
        "Token:".bright_cyan(),
        client::format_address(handle.token_address())
    );

    let snapshot = handle.snapshot().await?;

    println!("\n{}", "=== Reserves ===".bright_yellow());
    println!(
        "{} {} ETH",
        "Ether Reserve:".bright_cyan(),
        client::format_units(snapshot.eth_reserve)
    );
    println!(
        "{} {} UDT",
        "Token Reserve:".bright_cyan(),
        client::format_units(snapshot.token_reserve)
    );
    println!(
        "{} {}",
        "LP Supply:".bright_cyan(),
        client::format_units(snapshot.lp_total_supply)
    );
    println!("{} {} bps", "Swap Fee:".bright_cyan(), handle.fee_bps);

    if snapshot.is_seeded() && !snapshot.eth_reserve.is_zero() {
        // Spot price as token-wei per ETH, truncated like every other quote
        if let Some(scaled) = snapshot.token_reserve.checked_mul(U256::exp10(18)) {
            println!(
                "{} {} UDT/ETH",
                "Spot Price:".bright_cyan(),
                client::format_units(scaled / snapshot.eth_reserve)
            );
        }
    } else {
        println!(
            "\n{}",
            "Pool is unseeded - add the first liquidity to set the ratio".yellow()
        );
    }

    println!("\n{} {}", "Status:".bright_green().bold(), "OK ✓".bright_green());
    Ok(())
}

/// `unidex balances` - signer holdings across all three assets
pub async fn show_balances(config: &NetworkConfig) -> Result<()> {
    println!("{}", "=== Balances ===".bright_green().bold());
    println!(
        "{} {}",
        "Account:".bright_cyan(),
        client::format_address(config.sender)
    );

    let handle = ExchangeHandle::connect(config)?;

    let eth = handle.eth_balance(config.sender).await?;
    let token = handle.token_balance(config.sender).await?;
    let lp = handle.lp_balance(config.sender).await?;

    println!("{} {} ETH", "Ether:".bright_cyan(), client::format_units(eth));
    println!("{} {} UDT", "Token:".bright_cyan(), client::format_units(token));
    println!("{} {} UDT-LP", "LP Shares:".bright_cyan(), client::format_units(lp));

    Ok(())
}
