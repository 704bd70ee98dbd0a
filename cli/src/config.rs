//! Network configuration, signer key and deployment record management

use anyhow::{Context, Result};
use ethereum_types::Address;
use secp256k1::SecretKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use web3::signing::{Key, SecretKeyRef};

#[derive(Debug)]
pub struct NetworkConfig {
    pub network: String,
    pub rpc_url: String,
    pub chain_id: u64,
    pub secret_key: SecretKey,
    pub key_path: PathBuf,
    pub sender: Address,
    pub deployments_path: PathBuf,
}

impl NetworkConfig {
    pub fn new(
        network: &str,
        rpc_url: Option<String>,
        key_path: Option<String>,
        deployments_path: Option<String>,
    ) -> Result<Self> {
        let (default_rpc, chain_id) = match network {
            "localnet" | "local" => ("http://127.0.0.1:8545".to_string(), 31337),
            "sepolia" => ("https://rpc.sepolia.org".to_string(), 11_155_111),
            _ => anyhow::bail!("Unknown network: {}. Use localnet or sepolia", network),
        };

        let rpc_url = rpc_url.unwrap_or(default_rpc);

        // Resolve signer key path
        let key_path = if let Some(path) = key_path {
            expand_path(&path)
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".config/unidex/signer.hex")
        };

        let secret_key = load_secret_key(&key_path)?;
        let sender = SecretKeyRef::new(&secret_key).address();

        let deployments_path = deployments_path
            .map(|p| expand_path(&p))
            .unwrap_or_else(|| PathBuf::from("deployments.toml"));

        Ok(Self {
            network: network.to_string(),
            rpc_url,
            chain_id,
            secret_key,
            key_path,
            sender,
            deployments_path,
        })
    }

    /// Deployment record for the selected network.
    pub fn deployment(&self) -> Result<DeploymentRecord> {
        let deployments = Deployments::load(&self.deployments_path)?;
        deployments
            .networks
            .get(&self.network)
            .cloned()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No deployment recorded for {} in {}\n\
                     Run `unidex deploy <token-address>` first",
                    self.network,
                    self.deployments_path.display()
                )
            })
    }

    /// Record (or replace) this network's deployment.
    pub fn record_deployment(&self, record: DeploymentRecord) -> Result<()> {
        let mut deployments = Deployments::load(&self.deployments_path)?;
        deployments.networks.insert(self.network.clone(), record);
        deployments.store(&self.deployments_path)
    }
}

/// Addresses and fee of one deployed pool, written by `deploy` and read by
/// every other command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub exchange: String,
    pub token: String,
    /// Fee the deployed contract charges; every quote uses this value
    pub fee_bps: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Deployments {
    #[serde(default)]
    pub networks: BTreeMap<String, DeploymentRecord>,
}

impl Deployments {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read deployment record: {}", path.display()))?;
        toml::from_str(&data)
            .with_context(|| format!("Failed to parse deployment record: {}", path.display()))
    }

    pub fn store(&self, path: &Path) -> Result<()> {
        let data = toml::to_string_pretty(self).context("Failed to serialize deployment record")?;
        fs::write(path, data)
            .with_context(|| format!("Failed to write deployment record: {}", path.display()))
    }
}

pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Load a hex-encoded secp256k1 secret key from a file
fn load_secret_key(path: &Path) -> Result<SecretKey> {
    if !path.exists() {
        anyhow::bail!(
            "Signer key file not found: {}\n\
             Create one with: openssl rand -hex 32 > {}",
            path.display(),
            path.display()
        );
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read key file: {}", path.display()))?;

    let hex_key = data.trim().trim_start_matches("0x");
    let bytes = hex::decode(hex_key)
        .with_context(|| format!("Key file is not valid hex: {}", path.display()))?;

    SecretKey::from_slice(&bytes)
        .with_context(|| format!("Invalid secp256k1 secret key in: {}", path.display()))
}
