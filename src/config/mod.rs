//! Configuration for the deposit agent

pub mod rpc;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export RPC config
pub use rpc::RpcConfig;

/// Environment variable holding the hex-encoded signing key
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Supported blockchain networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Ethereum,
    Arbitrum,
    Optimism,
    #[default]
    Base,
    Polygon,
}

impl Network {
    pub const ALL: [Network; 5] = [
        Network::Ethereum,
        Network::Arbitrum,
        Network::Optimism,
        Network::Base,
        Network::Polygon,
    ];

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Ethereum => 1,
            Network::Arbitrum => 42161,
            Network::Optimism => 10,
            Network::Base => 8453,
            Network::Polygon => 137,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Network::Ethereum => "ethereum",
            Network::Arbitrum => "arbitrum",
            Network::Optimism => "optimism",
            Network::Base => "base",
            Network::Polygon => "polygon",
        }
    }

    /// Block explorer base URL for transaction pages
    pub fn explorer_tx_base(&self) -> &'static str {
        match self {
            Network::Ethereum => "https://etherscan.io/tx/",
            Network::Arbitrum => "https://arbiscan.io/tx/",
            Network::Optimism => "https://optimistic.etherscan.io/tx/",
            Network::Base => "https://basescan.org/tx/",
            Network::Polygon => "https://polygonscan.com/tx/",
        }
    }

    /// Link to a transaction on this network's block explorer
    pub fn transaction_link(&self, tx_hash: &str) -> String {
        format!("{}{}", self.explorer_tx_base(), tx_hash)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = crate::Error;

    /// Accepts both the short name and the `<name>-mainnet` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let short = lower.strip_suffix("-mainnet").unwrap_or(&lower);
        match short {
            "ethereum" | "mainnet" => Ok(Network::Ethereum),
            "arbitrum" => Ok(Network::Arbitrum),
            "optimism" => Ok(Network::Optimism),
            "base" => Ok(Network::Base),
            "polygon" => Ok(Network::Polygon),
            _ => Err(crate::Error::InvalidArgument(format!(
                "Unknown network: {}",
                s
            ))),
        }
    }
}

/// Settings for the protocol stats fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Network the signing wallet transacts on; unset means the network
    /// the action's contract is deployed on
    #[serde(default)]
    pub network: Option<Network>,
    /// Path to audit log file
    #[serde(default = "default_audit_log_path")]
    pub audit_log_path: Option<String>,
    /// Stats fetcher settings
    #[serde(default)]
    pub stats: StatsConfig,
}

fn default_audit_log_path() -> Option<String> {
    Some("audit.jsonl".to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: None,
            audit_log_path: default_audit_log_path(),
            stats: StatsConfig::default(),
        }
    }
}

impl Config {
    /// Pick the wallet network for an action deployed on `deployed`.
    ///
    /// An explicit `requested` network wins over the config value; with
    /// neither, the wallet follows the deployment.
    pub fn wallet_network(&self, requested: Option<Network>, deployed: Network) -> Network {
        let network = requested.or(self.network).unwrap_or(deployed);
        if network != deployed {
            tracing::warn!(
                %network,
                %deployed,
                "Wallet network differs from the contract deployment; the call will be refused"
            );
        }
        network
    }

    /// Load a JSON config file
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
    }
}
