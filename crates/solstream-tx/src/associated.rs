//! Associated token account derivation
//!
//! An associated token account is the deterministic per-owner, per-mint
//! account that must exist before the owner can receive that token. The
//! derivation here is pure; the existence check against the chain belongs
//! to the caller (see `settlement::resolve_or_create_associated_account`).

use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;
use spl_associated_token_account::instruction::create_associated_token_account;

/// Resolved associated account: its address, plus an unsubmitted creation
/// instruction only when the account does not yet exist on-chain.
#[derive(Debug, Clone)]
pub struct AssociatedAccount {
    pub address: Pubkey,
    pub creation: Option<Instruction>,
}

impl AssociatedAccount {
    pub fn requires_creation(&self) -> bool {
        self.creation.is_some()
    }
}

/// Derive the associated token account address for `(owner, mint)`.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

/// Combine a derivation with a known existence state.
///
/// Idempotent: the address is the same on every call, and the creation
/// instruction is attached only while `exists` is false. `payer` funds the
/// rent for the new account.
pub fn resolve_associated_account(
    mint: &Pubkey,
    payer: &Pubkey,
    recipient: &Pubkey,
    exists: bool,
) -> AssociatedAccount {
    let address = get_associated_token_address(recipient, mint);
    let creation = (!exists)
        .then(|| create_associated_token_account(payer, recipient, mint, &spl_token::id()));

    AssociatedAccount { address, creation }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_is_deterministic() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let a = associated_token_address(&owner, &mint);
        let b = associated_token_address(&owner, &mint);
        assert_eq!(a, b);

        // Distinct owners get distinct accounts for the same mint
        let other = Pubkey::new_unique();
        assert_ne!(a, associated_token_address(&other, &mint));
    }

    #[test]
    fn test_resolve_existing_account_has_no_creation() {
        let mint = Pubkey::new_unique();
        let payer = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();

        let resolved = resolve_associated_account(&mint, &payer, &recipient, true);
        assert!(!resolved.requires_creation());
        assert_eq!(resolved.address, associated_token_address(&recipient, &mint));
    }

    #[test]
    fn test_resolve_missing_account_attaches_creation() {
        let mint = Pubkey::new_unique();
        let payer = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();

        let resolved = resolve_associated_account(&mint, &payer, &recipient, false);
        assert!(resolved.requires_creation());

        let ix = resolved.creation.unwrap();
        assert_eq!(ix.program_id, spl_associated_token_account::id());
        // Payer is the first (signing, writable) account of the instruction
        assert_eq!(ix.accounts[0].pubkey, payer);
        assert!(ix.accounts[0].is_signer);
    }

    #[test]
    fn test_resolve_is_idempotent_across_states() {
        let mint = Pubkey::new_unique();
        let payer = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();

        let before = resolve_associated_account(&mint, &payer, &recipient, false);
        let after = resolve_associated_account(&mint, &payer, &recipient, true);
        assert_eq!(before.address, after.address);
        assert!(before.requires_creation());
        assert!(!after.requires_creation());
    }
}
