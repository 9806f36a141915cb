//! RPC endpoint configuration
//!
//! Resolution order per network:
//! 1. Per-network env var (`ETH_RPC_URL`, `BASE_RPC_URL`, ...)
//! 2. `ALCHEMY_API_KEY`, expanded into Alchemy URLs
//! 3. Public RPC fallback (rate limited, for testing only)
//!
//! ```bash
//! export BASE_RPC_URL="https://base-mainnet.g.alchemy.com/v2/YOUR_KEY"
//! ```

use super::Network;
use std::collections::HashMap;

const ALCHEMY_API_KEY: &str = "ALCHEMY_API_KEY";

fn url_env_var(network: Network) -> &'static str {
    match network {
        Network::Ethereum => "ETH_RPC_URL",
        Network::Arbitrum => "ARBITRUM_RPC_URL",
        Network::Optimism => "OPTIMISM_RPC_URL",
        Network::Base => "BASE_RPC_URL",
        Network::Polygon => "POLYGON_RPC_URL",
    }
}

fn alchemy_url(network: Network, key: &str) -> String {
    let host = match network {
        Network::Ethereum => "eth-mainnet",
        Network::Arbitrum => "arb-mainnet",
        Network::Optimism => "opt-mainnet",
        Network::Base => "base-mainnet",
        Network::Polygon => "polygon-mainnet",
    };
    format!("https://{}.g.alchemy.com/v2/{}", host, key)
}

fn public_url(network: Network) -> &'static str {
    match network {
        Network::Ethereum => "https://eth.llamarpc.com",
        Network::Arbitrum => "https://arb1.arbitrum.io/rpc",
        Network::Optimism => "https://mainnet.optimism.io",
        Network::Base => "https://mainnet.base.org",
        Network::Polygon => "https://polygon-rpc.com",
    }
}

/// RPC URLs indexed by network
#[derive(Debug, Clone)]
pub struct RpcConfig {
    urls: HashMap<Network, String>,
}

impl RpcConfig {
    /// Resolve URLs for every supported network from the environment
    pub fn from_env() -> Self {
        Self::resolve(|name| std::env::var(name).ok())
    }

    /// Resolve URLs using `lookup` in place of the process environment
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let alchemy_key = lookup(ALCHEMY_API_KEY);
        let mut urls = HashMap::new();

        for network in Network::ALL {
            let url = if let Some(url) = lookup(url_env_var(network)) {
                tracing::debug!(%network, "Using {} for RPC", url_env_var(network));
                url
            } else if let Some(key) = alchemy_key.as_deref() {
                alchemy_url(network, key)
            } else {
                tracing::debug!(%network, "No RPC configured, using public RPC (rate limited)");
                public_url(network).to_string()
            };
            urls.insert(network, url);
        }

        Self { urls }
    }

    /// Create with explicit RPC URLs
    pub fn with_urls(urls: HashMap<Network, String>) -> Self {
        Self { urls }
    }

    /// Get RPC URL for a network
    pub fn get(&self, network: Network) -> Option<&str> {
        self.urls.get(&network).map(|s| s.as_str())
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_public_rpc_fallbacks() {
        let config = RpcConfig::resolve(env(&[]));

        for network in Network::ALL {
            assert_eq!(config.get(network), Some(public_url(network)));
        }
    }

    #[test]
    fn test_per_network_url_wins() {
        let config = RpcConfig::resolve(env(&[
            ("BASE_RPC_URL", "https://custom.base"),
            (ALCHEMY_API_KEY, "key"),
        ]));

        assert_eq!(config.get(Network::Base), Some("https://custom.base"));
        assert_eq!(
            config.get(Network::Arbitrum),
            Some("https://arb-mainnet.g.alchemy.com/v2/key")
        );
    }

    #[test]
    fn test_with_urls() {
        let mut urls = HashMap::new();
        urls.insert(Network::Ethereum, "https://custom.rpc".to_string());
        let config = RpcConfig::with_urls(urls);

        assert_eq!(config.get(Network::Ethereum), Some("https://custom.rpc"));
        assert_eq!(config.get(Network::Base), None);
    }
}
