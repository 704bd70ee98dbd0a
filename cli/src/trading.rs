//! Swap operations
//!
//! `quote` evaluates the engine against a fresh snapshot and prints the
//! expected output; `execute` does the same, derives a slippage-bounded
//! minimum and submits. The quote is advisory: settlement price is
//! whatever the contract computes at inclusion time.

use anyhow::{Context, Result};
use colored::Colorize;
use ethereum_types::U256;
use quote_model::{swap_output, PoolSnapshot, SwapDirection, BPS_SCALE};

use crate::client;
use crate::config::NetworkConfig;
use crate::exchange::ExchangeHandle;

fn parse_direction(input: &str) -> Result<SwapDirection> {
    match input.to_lowercase().as_str() {
        "eth-to-token" | "eth" => Ok(SwapDirection::EthToToken),
        "token-to-eth" | "token" => Ok(SwapDirection::TokenToEth),
        _ => anyhow::bail!(
            "Unknown direction: {}. Use eth-to-token or token-to-eth",
            input
        ),
    }
}

fn direction_labels(direction: SwapDirection) -> (&'static str, &'static str) {
    match direction {
        SwapDirection::EthToToken => ("ETH", "UDT"),
        SwapDirection::TokenToEth => ("UDT", "ETH"),
    }
}

fn quote_against(
    snapshot: &PoolSnapshot,
    direction: SwapDirection,
    amount: U256,
    fee_bps: u64,
) -> Result<U256> {
    let (input_reserve, output_reserve) = direction.reserves(snapshot);
    swap_output(amount, input_reserve, output_reserve, fee_bps)
        .context("Failed to quote the swap")
}

pub async fn quote_swap(config: &NetworkConfig, direction: String, amount: String) -> Result<()> {
    println!("{}", "=== Swap Quote ===".bright_green().bold());

    let direction = parse_direction(&direction)?;
    let amount = client::parse_units(&amount).context("Invalid swap amount")?;
    let (in_label, out_label) = direction_labels(direction);

    let handle = ExchangeHandle::connect(config)?;
    let snapshot = handle.snapshot().await?;
    let output = quote_against(&snapshot, direction, amount, handle.fee_bps)?;

    println!(
        "{} {} {}",
        "Input:".bright_cyan(),
        client::format_units(amount),
        in_label
    );
    println!(
        "{} {} {}",
        "You Receive:".bright_cyan(),
        client::format_units(output),
        out_label
    );
    println!("{} {} bps", "Fee:".bright_cyan(), handle.fee_bps);
    println!(
        "\n{}",
        "Advisory only - the pool reprices at inclusion time".dimmed()
    );

    Ok(())
}

pub async fn execute_swap(
    config: &NetworkConfig,
    direction: String,
    amount: String,
    slippage_bps: u64,
) -> Result<()> {
    println!("{}", "=== Swap ===".bright_green().bold());
    println!("{} {}", "Network:".bright_cyan(), config.network);

    let direction = parse_direction(&direction)?;
    let amount = client::parse_units(&amount).context("Invalid swap amount")?;
    if amount.is_zero() {
        anyhow::bail!("Swap amount must be positive");
    }
    if slippage_bps >= BPS_SCALE {
        anyhow::bail!("Slippage must be below {} bps", BPS_SCALE);
    }
    let (in_label, out_label) = direction_labels(direction);

    let handle = ExchangeHandle::connect(config)?;
    handle.ensure_chain(config).await?;
    let snapshot = handle.snapshot().await?;
    let output = quote_against(&snapshot, direction, amount, handle.fee_bps)?;

    // The quote goes stale the moment another transaction lands; accept up
    // to slippage_bps less and let the contract reject anything worse.
    let min_output = output
        .checked_mul(U256::from(BPS_SCALE - slippage_bps))
        .map(|scaled| scaled / U256::from(BPS_SCALE))
        .context("Slippage bound overflows 256 bits")?;

    println!(
        "{} {} {}",
        "Input:".bright_cyan(),
        client::format_units(amount),
        in_label
    );
    println!(
        "{} {} {}",
        "Quoted Output:".bright_cyan(),
        client::format_units(output),
        out_label
    );
    println!(
        "{} {} {}",
        "Minimum Output:".bright_cyan(),
        client::format_units(min_output),
        out_label
    );

    let eth_before = handle.eth_balance(config.sender).await?;
    let token_before = handle.token_balance(config.sender).await?;

    match direction {
        SwapDirection::EthToToken => {
            handle.eth_to_token(config, amount, min_output).await?;
        }
        SwapDirection::TokenToEth => {
            let token_balance = handle.token_balance(config.sender).await?;
            if token_balance < amount {
                anyhow::bail!(
                    "Insufficient token balance: have {} UDT, swapping {} UDT",
                    client::format_units(token_balance),
                    client::format_units(amount)
                );
            }
            handle.ensure_allowance(config, amount).await?;
            handle.token_to_eth(config, amount, min_output).await?;
        }
    }

    let eth_after = handle.eth_balance(config.sender).await?;
    let token_after = handle.token_balance(config.sender).await?;

    println!("\n{} {}", "Success!".bright_green().bold(), "✓".bright_green());
    // Received amount from balance deltas; the ETH leg also moved gas
    match direction {
        SwapDirection::EthToToken => {
            let received = token_after.saturating_sub(token_before);
            println!(
                "{} {} UDT",
                "Received:".bright_cyan(),
                client::format_units(received)
            );
        }
        SwapDirection::TokenToEth => {
            let received = eth_after.saturating_sub(eth_before);
            println!(
                "{} {} ETH (net of gas)",
                "Received:".bright_cyan(),
                client::format_units(received)
            );
        }
    }

    Ok(())
}
