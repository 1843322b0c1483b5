//! Aggregator swap transaction decoding
//!
//! The quote aggregator returns a fully-formed unsigned transaction as
//! base64-encoded bytes. It is opaque: we never amend its instructions,
//! only restamp the blockhash, sign, and submit. Any required account
//! bootstrapping must therefore happen in a separate transaction first.

use base64::Engine;
use solana_sdk::transaction::Transaction;
use thiserror::Error;

/// Error returned when an aggregator transaction cannot be decoded
#[derive(Debug, Error)]
pub enum SwapDecodeError {
    #[error("Invalid base64 transaction payload: {0}")]
    Base64(String),

    #[error("Failed to deserialize transaction bytes: {0}")]
    Deserialize(String),
}

/// Decode a base64-encoded legacy transaction from the aggregator.
pub fn decode_swap_transaction(encoded: &str) -> Result<Transaction, SwapDecodeError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| SwapDecodeError::Base64(e.to_string()))?;

    bincode::deserialize(&bytes).map_err(|e| SwapDecodeError::Deserialize(e.to_string()))
}
