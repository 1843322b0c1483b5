//! Configuration types for Solstream

use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;

use crate::Network;

/// RPC endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// RPC URL (e.g., "https://api.mainnet-beta.solana.com")
    pub url: String,

    /// Commitment level used for queries, submission, and confirmation
    #[serde(default = "default_commitment")]
    pub commitment: CommitmentConfig,
}

fn default_commitment() -> CommitmentConfig {
    CommitmentConfig::confirmed()
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: Network::MainnetBeta.default_rpc_url().to_string(),
            commitment: default_commitment(),
        }
    }
}

impl RpcConfig {
    pub fn for_network(network: Network) -> Self {
        Self {
            url: network.default_rpc_url().to_string(),
            commitment: default_commitment(),
        }
    }
}

/// Swap quote aggregator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Aggregator API base URL
    pub base_url: String,

    /// Slippage tolerance (basis points) requested with each quote
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u16,
}

fn default_slippage_bps() -> u16 {
    50
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://quote-api.jup.ag/v6".to_string(),
            slippage_bps: default_slippage_bps(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// RPC connection settings
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Quote aggregator settings
    #[serde(default)]
    pub aggregator: AggregatorConfig,

    /// Network (mainnet-beta or devnet)
    #[serde(default = "default_network")]
    pub network: Network,
}

fn default_network() -> Network {
    Network::MainnetBeta
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            aggregator: AggregatorConfig::default(),
            network: default_network(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.rpc.url, "https://api.mainnet-beta.solana.com");
        assert_eq!(config.network, Network::MainnetBeta);
        assert_eq!(config.aggregator.slippage_bps, 50);
        assert_eq!(config.rpc.commitment, CommitmentConfig::confirmed());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.rpc.url, config.rpc.url);
        assert_eq!(parsed.aggregator.base_url, config.aggregator.base_url);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: AppConfig = serde_json::from_str(r#"{"rpc": {"url": "http://localhost:8899"}}"#).unwrap();
        assert_eq!(parsed.rpc.url, "http://localhost:8899");
        assert_eq!(parsed.rpc.commitment, CommitmentConfig::confirmed());
        assert_eq!(parsed.network, Network::MainnetBeta);
    }
}
