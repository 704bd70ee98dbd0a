//! Exchange contract deployment
//!
//! One-shot publish of the compiled exchange contract to the configured
//! test network: read the compiler artifact, sign the creation transaction
//! with the local key, wait for confirmation and record the resulting
//! addresses for the rest of the CLI to consume.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use web3::contract::{Contract, Options};
use web3::signing::SecretKeyRef;

use crate::client;
use crate::config::{DeploymentRecord, NetworkConfig};

const DEFAULT_ARTIFACT: &str = "artifacts/Exchange.json";

/// Compiler output consumed at deploy time (hardhat/solc layout)
#[derive(Debug, Deserialize)]
struct ContractArtifact {
    abi: serde_json::Value,
    bytecode: String,
}

pub async fn deploy_exchange(
    config: &NetworkConfig,
    token: String,
    artifact: Option<String>,
    fee_bps: u64,
) -> Result<()> {
    println!("{}", "=== Exchange Deployment ===".bright_green().bold());
    println!("{} {}", "Network:".bright_cyan(), config.network);
    println!(
        "{} {}",
        "Deployer:".bright_cyan(),
        client::format_address(config.sender)
    );

    let token_address = client::parse_address(&token).context("Invalid token address")?;
    println!(
        "{} {}",
        "Token:".bright_cyan(),
        client::format_address(token_address)
    );

    let artifact_path = artifact
        .map(|p| crate::config::expand_path(&p))
        .unwrap_or_else(|| DEFAULT_ARTIFACT.into());
    let artifact = load_artifact(&artifact_path)?;
    let abi = serde_json::to_vec(&artifact.abi).context("Failed to re-encode artifact ABI")?;
    let bytecode = artifact.bytecode.trim().trim_start_matches("0x").to_string();

    println!(
        "{} {} ({} bytes of code)",
        "Artifact:".bright_cyan(),
        artifact_path.display(),
        bytecode.len() / 2
    );

    let web3 = client::connect(config)?;
    client::ensure_chain(&web3, config).await?;

    let balance = client::eth_balance(&web3, config.sender).await?;
    println!(
        "{} {} ETH",
        "Deployer Balance:".bright_cyan(),
        client::format_units(balance)
    );
    if balance.is_zero() {
        anyhow::bail!("Deployer account has no ether to pay for deployment");
    }

    println!("\n{}", "Deploying exchange contract...".bright_green());
    let spinner = client::confirmation_spinner("Waiting for deployment confirmation...");

    let contract = Contract::deploy(web3.eth(), &abi)
        .context("Invalid ABI in artifact")?
        .confirmations(1)
        .options(Options::default())
        .sign_with_key_and_execute(
            bytecode,
            (token_address,),
            SecretKeyRef::new(&config.secret_key),
            Some(config.chain_id),
        )
        .await
        .context("Deployment transaction failed")?;

    spinner.finish_and_clear();

    let exchange_address = contract.address();
    println!("\n{} {}", "Success!".bright_green().bold(), "✓".bright_green());
    println!(
        "{} {}",
        "Exchange Address:".bright_cyan(),
        client::format_address(exchange_address)
    );

    config.record_deployment(DeploymentRecord {
        exchange: client::format_address(exchange_address),
        token: client::format_address(token_address),
        fee_bps,
    })?;
    println!(
        "{} {}",
        "Recorded in:".bright_cyan(),
        config.deployments_path.display()
    );
    println!("\n{}", "Exchange deployed successfully".bright_green());

    Ok(())
}

fn load_artifact(path: &Path) -> Result<ContractArtifact> {
    if !path.exists() {
        anyhow::bail!(
            "Contract artifact not found: {}\n\
             Compile the contract first and point --artifact at the compiler output",
            path.display()
        );
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read artifact: {}", path.display()))?;

    let artifact: ContractArtifact = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse artifact: {}", path.display()))?;

    if artifact.bytecode.trim().trim_start_matches("0x").is_empty() {
        anyhow::bail!(
            "Artifact has no deployable bytecode (interface-only?): {}",
            path.display()
        );
    }

    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_artifact_parsing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"abi": [{{"inputs": [], "name": "getReserve", "outputs": [{{"name": "", "type": "uint256"}}], "stateMutability": "view", "type": "function"}}], "bytecode": "0x6080604052"}}"#
        )
        .unwrap();
        let artifact = load_artifact(file.path()).unwrap();
        assert_eq!(artifact.bytecode, "0x6080604052");
        assert!(artifact.abi.is_array());
    }

    #[test]
    fn test_missing_artifact_hint() {
        let err = load_artifact(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.to_string().contains("Compile the contract first"));
    }

    #[test]
    fn test_empty_bytecode_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"abi": [], "bytecode": "0x"}}"#).unwrap();
        assert!(load_artifact(file.path()).is_err());
    }
}
