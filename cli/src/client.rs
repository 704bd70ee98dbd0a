//! JSON-RPC client helpers and unit formatting

use anyhow::{Context, Result};
use colored::Colorize;
use ethereum_types::{Address, H256, U256};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use web3::transports::Http;
use web3::Web3;

use crate::config::NetworkConfig;

/// Wei per whole unit, for both ETH and the 18-decimal token
const UNIT_DECIMALS: usize = 18;

/// Create a web3 handle from the network configuration
pub fn connect(config: &NetworkConfig) -> Result<Web3<Http>> {
    let transport = Http::new(&config.rpc_url)
        .with_context(|| format!("Failed to create RPC transport for {}", config.rpc_url))?;
    Ok(Web3::new(transport))
}

/// Refuse to talk to a node on the wrong chain before anything is signed.
pub async fn ensure_chain(web3: &Web3<Http>, config: &NetworkConfig) -> Result<()> {
    let chain_id = web3
        .eth()
        .chain_id()
        .await
        .context("Failed to query node chain id")?;
    log::debug!("node reports chain id {chain_id}");

    if chain_id != U256::from(config.chain_id) {
        anyhow::bail!(
            "Node chain id {} does not match network {} (expected {})",
            chain_id,
            config.network,
            config.chain_id
        );
    }
    Ok(())
}

/// Get native balance in wei
pub async fn eth_balance(web3: &Web3<Http>, address: Address) -> Result<U256> {
    web3.eth()
        .balance(address, None)
        .await
        .with_context(|| format!("Failed to get balance for {}", format_address(address)))
}

/// Spinner shown while a transaction waits for block inclusion
pub fn confirmation_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("static spinner template"),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Parse a 20-byte hex address, with or without the 0x prefix
pub fn parse_address(input: &str) -> Result<Address> {
    let hex_part = input.trim().trim_start_matches("0x");
    let bytes = hex::decode(hex_part)
        .with_context(|| format!("Address is not valid hex: {input}"))?;
    if bytes.len() != 20 {
        anyhow::bail!("Address must be 20 bytes, got {}: {}", bytes.len(), input);
    }
    Ok(Address::from_slice(&bytes))
}

pub fn format_address(address: Address) -> String {
    format!("0x{}", hex::encode(address.as_bytes()))
}

/// Parse a decimal amount ("1.5") into wei. Integer-exact: the string is
/// split at the point and scaled, never routed through floating point.
pub fn parse_units(amount: &str) -> Result<U256> {
    let amount = amount.trim();
    let (whole, frac) = match amount.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (amount, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        anyhow::bail!("Empty amount");
    }
    if frac.len() > UNIT_DECIMALS {
        anyhow::bail!("Too many decimal places (max {UNIT_DECIMALS}): {amount}");
    }

    let whole = if whole.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(whole).with_context(|| format!("Invalid amount: {amount}"))?
    };
    let frac = if frac.is_empty() {
        U256::zero()
    } else {
        let padded = format!("{frac:0<18}");
        U256::from_dec_str(&padded).with_context(|| format!("Invalid amount: {amount}"))?
    };

    whole
        .checked_mul(U256::exp10(UNIT_DECIMALS))
        .and_then(|scaled| scaled.checked_add(frac))
        .with_context(|| format!("Amount overflows 256 bits: {amount}"))
}

/// Format wei as a decimal amount, trimming trailing zeros
pub fn format_units(amount: U256) -> String {
    let base = U256::exp10(UNIT_DECIMALS);
    let whole = amount / base;
    let frac = amount % base;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac = format!("{:0>18}", frac.to_string());
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// Pretty print a transaction hash as a shortened explorer link
pub fn format_tx_hash(hash: H256, network: &str) -> String {
    let hash_str = format!("0x{}", hex::encode(hash.as_bytes()));
    let short = format!("{}...{}", &hash_str[0..10], &hash_str[hash_str.len() - 8..]);

    let explorer_url = match network {
        "sepolia" => format!("https://sepolia.etherscan.io/tx/{hash_str}"),
        _ => hash_str.clone(),
    };

    format!("{} ({})", short.bright_blue(), explorer_url.dimmed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units_whole_and_fraction() {
        assert_eq!(parse_units("1").unwrap(), U256::exp10(18));
        assert_eq!(
            parse_units("1.5").unwrap(),
            U256::from(15u64) * U256::exp10(17)
        );
        assert_eq!(parse_units("0.000000000000000001").unwrap(), U256::one());
        assert_eq!(parse_units(".5").unwrap(), U256::from(5u64) * U256::exp10(17));
        assert_eq!(parse_units("2.").unwrap(), U256::from(2u64) * U256::exp10(18));
    }

    #[test]
    fn test_parse_units_rejects_bad_input() {
        assert!(parse_units("").is_err());
        assert!(parse_units(".").is_err());
        assert!(parse_units("-1").is_err());
        assert!(parse_units("1.2.3").is_err());
        assert!(parse_units("0.0000000000000000001").is_err());
        assert!(parse_units("abc").is_err());
    }

    #[test]
    fn test_format_units_trims_zeros() {
        assert_eq!(format_units(U256::exp10(18)), "1");
        assert_eq!(format_units(U256::from(15u64) * U256::exp10(17)), "1.5");
        assert_eq!(format_units(U256::one()), "0.000000000000000001");
        assert_eq!(format_units(U256::zero()), "0");
    }

    #[test]
    fn test_units_roundtrip() {
        for text in ["0.1", "42", "906.610893880149131581", "1000000"] {
            let parsed = parse_units(text).unwrap();
            assert_eq!(format_units(parsed), *text);
        }
    }

    #[test]
    fn test_parse_address() {
        let address =
            parse_address("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap();
        assert_eq!(
            format_address(address),
            "0x5fbdb2315678afecb367f032d93f642f64180aa3"
        );
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("zz").is_err());
    }
}
