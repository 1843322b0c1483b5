//! Core type definitions for Solstream

use std::fmt;

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// A fungible SPL token: its mint address and decimal precision.
///
/// `decimals` is the on-chain precision of the mint, so one human unit of
/// the token equals `10^decimals` base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenDescriptor {
    pub mint: Pubkey,
    pub decimals: u8,
}

impl TokenDescriptor {
    pub const fn new(mint: Pubkey, decimals: u8) -> Self {
        Self { mint, decimals }
    }

    /// USDC on mainnet-beta (6 decimals)
    pub const fn usdc() -> Self {
        Self::new(constants::USDC_MINT, constants::USDC_DECIMALS)
    }

    /// Base units per 1 human unit (e.g. 1_000_000 for a 6-decimal token)
    pub fn decimals_scale(&self) -> u64 {
        10u64.pow(self.decimals as u32)
    }
}

impl fmt::Display for TokenDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} decimals)", self.mint, self.decimals)
    }
}

/// Intent to move `human_amount` units of `token` from the connected wallet
/// to `destination`. Constructed fresh per payment action; never persisted.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub destination: Pubkey,
    pub token: TokenDescriptor,
    pub human_amount: f64,
}

impl TransferRequest {
    pub fn new(destination: Pubkey, token: TokenDescriptor, human_amount: f64) -> Self {
        Self {
            destination,
            token,
            human_amount,
        }
    }
}

/// Network type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    MainnetBeta,
    Devnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MainnetBeta => "mainnet-beta",
            Self::Devnet => "devnet",
        }
    }

    /// Public RPC endpoint for this network
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Self::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Self::Devnet => "https://api.devnet.solana.com",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Constants
pub mod constants {
    use solana_sdk::pubkey::Pubkey;

    /// USDC mint on mainnet-beta
    pub const USDC_MINT: Pubkey =
        solana_sdk::pubkey!("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");

    /// USDC decimal precision
    pub const USDC_DECIMALS: u8 = 6;

    /// Base units per 1 USDC
    pub const USDC_SCALE: u64 = 1_000_000;

    /// Base units (lamports) per 1 SOL
    pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimals_scale() {
        assert_eq!(TokenDescriptor::usdc().decimals_scale(), 1_000_000);

        let nine = TokenDescriptor::new(Pubkey::new_unique(), 9);
        assert_eq!(nine.decimals_scale(), constants::LAMPORTS_PER_SOL);
    }

    #[test]
    fn test_network_display() {
        assert_eq!(Network::MainnetBeta.as_str(), "mainnet-beta");
        assert_eq!(Network::Devnet.as_str(), "devnet");
        assert!(Network::MainnetBeta.default_rpc_url().starts_with("https://"));
    }

    #[test]
    fn test_usdc_descriptor() {
        let usdc = TokenDescriptor::usdc();
        assert_eq!(usdc.mint, constants::USDC_MINT);
        assert_eq!(usdc.decimals, 6);
    }
}
