//! E2E smoke test suite
//!
//! Runs against a deployed pool on a dev node with a funded signer
//! (`unidex test`). Exercises the read path, checks the local quote engine
//! against the contract's own pricing, then round-trips a small liquidity
//! position and a small swap.

use anyhow::Result;
use colored::Colorize;
use ethereum_types::U256;
use quote_model::{matching_deposit, swap_output, PoolSnapshot, QuoteRequest, Quote, SwapDirection};

use crate::config::NetworkConfig;
use crate::exchange::ExchangeHandle;

pub async fn run_smoke_tests(config: &NetworkConfig) -> Result<()> {
    println!("{}", "=== Running Smoke Tests ===".bright_yellow().bold());
    println!(
        "{}",
        "Requires a deployed pool and a funded signer\n".dimmed()
    );

    let mut passed = 0;
    let mut failed = 0;

    // Test 1: snapshot reads
    match test_snapshot_reads(config).await {
        Ok(_) => {
            println!("{} Snapshot reads", "✓".bright_green());
            passed += 1;
        }
        Err(e) => {
            println!("{} Snapshot reads: {}", "✗".bright_red(), e);
            failed += 1;
        }
    }

    // Test 2: engine quote matches the contract's pricing
    match test_quote_consistency(config).await {
        Ok(_) => {
            println!("{} Quote consistency", "✓".bright_green());
            passed += 1;
        }
        Err(e) => {
            println!("{} Quote consistency: {}", "✗".bright_red(), e);
            failed += 1;
        }
    }

    // Test 3: add then remove a small liquidity position
    match test_liquidity_roundtrip(config).await {
        Ok(_) => {
            println!("{} Liquidity roundtrip", "✓".bright_green());
            passed += 1;
        }
        Err(e) => {
            println!("{} Liquidity roundtrip: {}", "✗".bright_red(), e);
            failed += 1;
        }
    }

    // Test 4: swap execution respects the quoted minimum
    match test_swap_execution(config).await {
        Ok(_) => {
            println!("{} Swap execution", "✓".bright_green());
            passed += 1;
        }
        Err(e) => {
            println!("{} Swap execution: {}", "✗".bright_red(), e);
            failed += 1;
        }
    }

    println!(
        "\n{} {} passed, {} failed",
        "Results:".bright_cyan(),
        passed,
        failed
    );

    if failed > 0 {
        anyhow::bail!("{failed} smoke test(s) failed");
    }
    println!("{}", "All smoke tests passed".bright_green().bold());
    Ok(())
}

async fn seeded_snapshot(handle: &ExchangeHandle) -> Result<PoolSnapshot> {
    let snapshot = handle.snapshot().await?;
    if !snapshot.is_seeded() {
        anyhow::bail!("pool is unseeded; run `unidex liquidity add --tokens ...` first");
    }
    Ok(snapshot)
}

async fn test_snapshot_reads(config: &NetworkConfig) -> Result<()> {
    let handle = ExchangeHandle::connect(config)?;
    handle.ensure_chain(config).await?;
    let snapshot = seeded_snapshot(&handle).await?;

    if snapshot.eth_reserve.is_zero() {
        anyhow::bail!("token reserve is seeded but ether reserve is zero");
    }
    if snapshot.lp_total_supply.is_zero() {
        anyhow::bail!("reserves are seeded but LP supply is zero");
    }
    Ok(())
}

async fn test_quote_consistency(config: &NetworkConfig) -> Result<()> {
    let handle = ExchangeHandle::connect(config)?;
    let snapshot = seeded_snapshot(&handle).await?;

    // 0.1 ETH in both directions, against the same reserve arguments the
    // contract is given
    let input = U256::exp10(17);
    for direction in [SwapDirection::EthToToken, SwapDirection::TokenToEth] {
        let (input_reserve, output_reserve) = direction.reserves(&snapshot);
        let local = swap_output(input, input_reserve, output_reserve, handle.fee_bps)?;
        let on_chain = handle
            .contract_swap_quote(input, input_reserve, output_reserve)
            .await?;
        if local != on_chain {
            anyhow::bail!(
                "engine quote {local} disagrees with contract quote {on_chain} ({direction:?})"
            );
        }

        // The request/result dispatch must agree with the primitive
        let quoted = snapshot.quote(
            QuoteRequest::Swap { direction, amount: input },
            handle.fee_bps,
        )?;
        if quoted != Quote::SwapOutput(local) {
            anyhow::bail!("snapshot dispatch disagrees with the swap primitive");
        }
    }
    Ok(())
}

async fn test_liquidity_roundtrip(config: &NetworkConfig) -> Result<()> {
    let handle = ExchangeHandle::connect(config)?;
    let snapshot = seeded_snapshot(&handle).await?;

    // Deposit 0.01 ETH plus the quoted token leg
    let eth_amount = U256::exp10(16);
    let token_amount =
        matching_deposit(eth_amount, snapshot.eth_reserve, snapshot.token_reserve)?;

    let lp_before = handle.lp_balance(config.sender).await?;
    handle.ensure_allowance(config, token_amount).await?;
    handle.add_liquidity(config, token_amount, eth_amount).await?;

    let lp_after = handle.lp_balance(config.sender).await?;
    if lp_after <= lp_before {
        anyhow::bail!("LP balance did not increase after deposit");
    }

    // Burn exactly what was just minted
    let minted = lp_after - lp_before;
    handle.remove_liquidity(config, minted).await?;

    let lp_final = handle.lp_balance(config.sender).await?;
    if lp_final != lp_before {
        anyhow::bail!(
            "LP balance {lp_final} after roundtrip, expected {lp_before}"
        );
    }
    Ok(())
}

async fn test_swap_execution(config: &NetworkConfig) -> Result<()> {
    let handle = ExchangeHandle::connect(config)?;
    let snapshot = seeded_snapshot(&handle).await?;

    // Swap 0.01 ETH for tokens with a zero-slippage bound: nothing else is
    // writing to a dev node, so the quote must hold exactly
    let input = U256::exp10(16);
    let quoted = swap_output(
        input,
        snapshot.eth_reserve,
        snapshot.token_reserve,
        handle.fee_bps,
    )?;

    let token_before = handle.token_balance(config.sender).await?;
    handle.eth_to_token(config, input, quoted).await?;
    let token_after = handle.token_balance(config.sender).await?;

    let received = token_after
        .checked_sub(token_before)
        .ok_or_else(|| anyhow::anyhow!("token balance decreased across swap"))?;
    if received < quoted {
        anyhow::bail!("received {received} tokens, quoted minimum was {quoted}");
    }
    Ok(())
}
