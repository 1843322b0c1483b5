//! solstream-tx: Transaction assembly utilities for Solstream
//!
//! Pure, I/O-free helpers for building SPL token transfer transactions,
//! deriving associated token accounts, and decoding aggregator-supplied
//! swap transactions. All network interaction lives in `solana-gateway`.

pub mod amounts;
pub mod associated;
pub mod swap;
pub mod transfer;

pub use amounts::{to_base_units, AmountError};
pub use associated::{associated_token_address, resolve_associated_account, AssociatedAccount};
pub use swap::{decode_swap_transaction, SwapDecodeError};
pub use transfer::{build_transfer_instructions, build_transfer_tx, TransferBuildError};
