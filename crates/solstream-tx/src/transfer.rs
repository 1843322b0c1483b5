//! SPL token transfer transaction assembly
//!
//! # Important Notes
//!
//! - The account-creation instruction (if any) MUST come before the
//!   transfer instruction in the same transaction
//! - The connected wallet is always the fee payer
//! - Amounts are raw base units; see `amounts::to_base_units`

use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;
use thiserror::Error;

use solstream_core::TokenDescriptor;

/// Error returned when a transfer instruction cannot be assembled
#[derive(Debug, Error)]
pub enum TransferBuildError {
    #[error("Failed to build transfer instruction: {0}")]
    Instruction(String),
}

/// Build the instruction list for a token transfer.
///
/// Ordering invariant: `creation` (the destination's associated-account
/// bootstrap, when the account does not exist yet) strictly precedes the
/// transfer itself.
pub fn build_transfer_instructions(
    token: &TokenDescriptor,
    source_account: &Pubkey,
    destination_account: &Pubkey,
    owner: &Pubkey,
    base_units: u64,
    creation: Option<Instruction>,
) -> Result<Vec<Instruction>, TransferBuildError> {
    let transfer = spl_token::instruction::transfer_checked(
        &spl_token::id(),
        source_account,
        &token.mint,
        destination_account,
        owner,
        &[],
        base_units,
        token.decimals,
    )
    .map_err(|e| TransferBuildError::Instruction(e.to_string()))?;

    let mut instructions = Vec::with_capacity(2);
    if let Some(create) = creation {
        instructions.push(create);
    }
    instructions.push(transfer);
    Ok(instructions)
}

/// Assemble an unsigned transaction: fee payer set, message stamped with
/// the supplied blockhash, ready for the wallet to sign.
pub fn build_transfer_tx(
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    blockhash: &Hash,
) -> Transaction {
    let message = Message::new_with_blockhash(instructions, Some(fee_payer), blockhash);
    Transaction::new_unsigned(message)
}
