//! Liquidity provider operations
//!
//! `add` quotes the token leg off the live ratio (or takes both amounts
//! for the first, ratio-setting deposit), `remove` previews both
//! redemption legs before burning, `show` reports the signer's position.

use anyhow::{Context, Result};
use colored::Colorize;
use ethereum_types::U256;
use quote_model::{matching_deposit, redemption};

use crate::client;
use crate::config::NetworkConfig;
use crate::exchange::ExchangeHandle;

pub async fn add_liquidity(
    config: &NetworkConfig,
    eth: String,
    tokens: Option<String>,
    dry_run: bool,
) -> Result<()> {
    println!("{}", "=== Add Liquidity ===".bright_green().bold());
    println!("{} {}", "Network:".bright_cyan(), config.network);

    let eth_amount = client::parse_units(&eth).context("Invalid ether amount")?;
    if eth_amount.is_zero() {
        anyhow::bail!("Ether amount must be positive");
    }

    let handle = ExchangeHandle::connect(config)?;
    handle.ensure_chain(config).await?;
    let snapshot = handle.snapshot().await?;

    let token_amount = if snapshot.is_seeded() {
        if tokens.is_some() {
            println!(
                "{}",
                "Pool is already seeded; --tokens is ignored and the ratio decides".yellow()
            );
        }
        matching_deposit(eth_amount, snapshot.eth_reserve, snapshot.token_reserve)
            .context("Failed to quote the token leg")?
    } else {
        // First deposit seeds the pool at whatever ratio the caller picks
        let tokens = tokens.ok_or_else(|| {
            anyhow::anyhow!("Pool is unseeded; pass --tokens to set the initial ratio")
        })?;
        let token_amount = client::parse_units(&tokens).context("Invalid token amount")?;
        if token_amount.is_zero() {
            anyhow::bail!("Token amount must be positive for the first deposit");
        }
        token_amount
    };

    println!(
        "{} {} ETH",
        "Depositing:".bright_cyan(),
        client::format_units(eth_amount)
    );
    println!(
        "{} {} UDT",
        "Required Tokens:".bright_cyan(),
        client::format_units(token_amount)
    );

    if dry_run {
        println!("\n{}", "Dry run - nothing submitted".yellow());
        return Ok(());
    }

    let token_balance = handle.token_balance(config.sender).await?;
    if token_balance < token_amount {
        anyhow::bail!(
            "Insufficient token balance: have {} UDT, need {} UDT",
            client::format_units(token_balance),
            client::format_units(token_amount)
        );
    }

    handle.ensure_allowance(config, token_amount).await?;
    handle
        .add_liquidity(config, token_amount, eth_amount)
        .await?;

    let lp_balance = handle.lp_balance(config.sender).await?;
    println!("\n{} {}", "Success!".bright_green().bold(), "✓".bright_green());
    println!(
        "{} {} UDT-LP",
        "LP Balance:".bright_cyan(),
        client::format_units(lp_balance)
    );

    Ok(())
}

pub async fn remove_liquidity(config: &NetworkConfig, lp: String, dry_run: bool) -> Result<()> {
    println!("{}", "=== Remove Liquidity ===".bright_green().bold());
    println!("{} {}", "Network:".bright_cyan(), config.network);

    let lp_amount = client::parse_units(&lp).context("Invalid LP amount")?;
    if lp_amount.is_zero() {
        anyhow::bail!("LP amount must be positive");
    }

    let handle = ExchangeHandle::connect(config)?;
    handle.ensure_chain(config).await?;

    let lp_balance = handle.lp_balance(config.sender).await?;
    if lp_balance < lp_amount {
        anyhow::bail!(
            "Insufficient LP balance: have {}, burning {}",
            client::format_units(lp_balance),
            client::format_units(lp_amount)
        );
    }

    let snapshot = handle.snapshot().await?;
    let eth_out = redemption(lp_amount, snapshot.eth_reserve, snapshot.lp_total_supply)
        .context("Failed to quote the ether leg")?;
    let token_out = redemption(lp_amount, snapshot.token_reserve, snapshot.lp_total_supply)
        .context("Failed to quote the token leg")?;

    println!(
        "{} {} UDT-LP",
        "Burning:".bright_cyan(),
        client::format_units(lp_amount)
    );
    println!(
        "{} {} ETH + {} UDT",
        "You Receive:".bright_cyan(),
        client::format_units(eth_out),
        client::format_units(token_out)
    );

    if dry_run {
        println!("\n{}", "Dry run - nothing submitted".yellow());
        return Ok(());
    }

    handle.remove_liquidity(config, lp_amount).await?;

    println!("\n{} {}", "Success!".bright_green().bold(), "✓".bright_green());
    Ok(())
}

pub async fn show_position(config: &NetworkConfig) -> Result<()> {
    println!("{}", "=== Liquidity Position ===".bright_green().bold());
    println!(
        "{} {}",
        "Account:".bright_cyan(),
        client::format_address(config.sender)
    );

    let handle = ExchangeHandle::connect(config)?;
    let snapshot = handle.snapshot().await?;
    let lp_balance = handle.lp_balance(config.sender).await?;

    println!(
        "{} {} UDT-LP",
        "LP Balance:".bright_cyan(),
        client::format_units(lp_balance)
    );

    if snapshot.lp_total_supply.is_zero() {
        println!("\n{}", "Pool has no liquidity".dimmed());
        return Ok(());
    }

    // What the position is worth if burned against the current snapshot
    let eth_out = redemption(lp_balance, snapshot.eth_reserve, snapshot.lp_total_supply)
        .context("Failed to value the ether leg")?;
    let token_out = redemption(lp_balance, snapshot.token_reserve, snapshot.lp_total_supply)
        .context("Failed to value the token leg")?;

    println!(
        "{} {} ETH + {} UDT",
        "Redeemable:".bright_cyan(),
        client::format_units(eth_out),
        client::format_units(token_out)
    );

    // Share of the pool in basis points, truncated
    if let Some(scaled) = lp_balance.checked_mul(U256::from(10_000u64)) {
        println!(
            "{} {} bps",
            "Pool Share:".bright_cyan(),
            scaled / snapshot.lp_total_supply
        );
    }

    Ok(())
}
