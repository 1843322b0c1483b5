//! Error types for Solstream

use thiserror::Error;

/// Core errors that can occur in Solstream
#[derive(Debug, Error)]
pub enum Error {
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Settlement error: {0}")]
    Settlement(#[from] SettleError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// RPC endpoint connection and query errors
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("RPC endpoint unreachable at {url}")]
    Unreachable { url: String },

    #[error("RPC request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("RPC returned error: {message}")]
    ApiError { message: String },

    #[error("Failed to parse RPC response: {0}")]
    ParseError(String),

    #[error("Blockhash expired: chain height {chain_height} is past {last_valid_block_height}")]
    BlockhashExpired {
        last_valid_block_height: u64,
        chain_height: u64,
    },

    #[error("Transaction failed on-chain: {message}")]
    TransactionFailed { message: String },
}

/// Wallet capability errors
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Wallet rejected the signing request: {message}")]
    Rejected { message: String },

    #[error("Wallet failed to sign: {message}")]
    SigningFailed { message: String },
}

/// Settlement flow errors
///
/// Each failure a payment flow can hit surfaces as its own variant so the
/// caller can show a specific, actionable message. None of these are
/// retried internally; retry is always a caller-initiated repeat of the
/// whole flow.
#[derive(Debug, Error)]
pub enum SettleError {
    #[error("Wallet is not connected")]
    WalletNotConnected,

    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Insufficient balance: need {required} base units, have {available}")]
    InsufficientBalance { required: u64, available: u64 },

    #[error("Quote aggregator unavailable: {message}")]
    QuoteUnavailable { message: String },

    #[error("Associated account creation failed: {message}")]
    AccountCreationFailed { message: String },

    #[error("Transaction submission failed: {message}")]
    SubmissionFailed { message: String },

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),
}

/// Result type alias for Solstream operations
pub type Result<T> = std::result::Result<T, Error>;

impl SettleError {
    /// Get a UI-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::WalletNotConnected => "wallet_not_connected",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::QuoteUnavailable { .. } => "quote_unavailable",
            Self::AccountCreationFailed { .. } => "account_creation_failed",
            Self::SubmissionFailed { .. } => "submission_failed",
            Self::Wallet(_) => "wallet_error",
        }
    }

    /// Whether restarting the flow from the top can succeed without any
    /// other change (funding, reconnecting, etc.)
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::QuoteUnavailable { .. } | Self::AccountCreationFailed { .. } => true,
            Self::WalletNotConnected
            | Self::InvalidAmount { .. }
            | Self::InsufficientBalance { .. }
            | Self::SubmissionFailed { .. }
            | Self::Wallet(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_error_codes() {
        let err = SettleError::InsufficientBalance {
            required: 5_000_000,
            available: 3_000_000,
        };
        assert_eq!(err.error_code(), "insufficient_balance");
        assert!(!err.is_retryable());

        let err = SettleError::QuoteUnavailable {
            message: "timeout".into(),
        };
        assert_eq!(err.error_code(), "quote_unavailable");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_error_display_distinguishable() {
        let balance = SettleError::InsufficientBalance {
            required: 5,
            available: 3,
        }
        .to_string();
        let wallet = SettleError::WalletNotConnected.to_string();
        let submit = SettleError::SubmissionFailed {
            message: "blockhash not found".into(),
        }
        .to_string();

        assert!(balance.contains("need 5"));
        assert!(wallet.contains("not connected"));
        assert!(submit.contains("blockhash not found"));
        assert_ne!(balance, wallet);
        assert_ne!(wallet, submit);
    }

    #[test]
    fn test_wallet_error_folds_into_settle_error() {
        let err: SettleError = WalletError::Rejected {
            message: "user dismissed".into(),
        }
        .into();
        assert_eq!(err.error_code(), "wallet_error");
    }
}
