//! Wallet capability seam
//!
//! Settlement never holds key material itself. It borrows a `WalletHandle`
//! for the duration of one call: the handle exposes the connected address
//! and signs transactions the settlement logic assembled. Browser wallet
//! adapters, hardware wallets, and in-process keypairs all fit behind the
//! same trait.

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;

use solstream_core::WalletError;

/// Capability object for a connected wallet
#[async_trait]
pub trait WalletHandle: Send + Sync {
    /// The connected public address, or None when no wallet is connected
    fn public_key(&self) -> Option<Pubkey>;

    /// Sign a transaction whose fee payer is this wallet.
    ///
    /// The message (including its recent blockhash) must not be altered
    /// after signing, or the signature stops matching.
    async fn sign_transaction(&self, transaction: Transaction)
        -> Result<Transaction, WalletError>;
}

/// In-process wallet backed by a keypair.
///
/// Used for server-side payout flows and in tests; interactive wallets live
/// behind their own `WalletHandle` implementations in the embedding
/// application.
pub struct LocalWallet {
    keypair: Keypair,
}

impl LocalWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    pub fn address(&self) -> Pubkey {
        self.keypair.pubkey()
    }
}

#[async_trait]
impl WalletHandle for LocalWallet {
    fn public_key(&self) -> Option<Pubkey> {
        Some(self.keypair.pubkey())
    }

    async fn sign_transaction(
        &self,
        mut transaction: Transaction,
    ) -> Result<Transaction, WalletError> {
        let blockhash = transaction.message.recent_blockhash;
        // Partial sign: aggregator transactions may carry signature slots
        // for signers other than the user.
        transaction
            .try_partial_sign(&[&self.keypair], blockhash)
            .map_err(|e| WalletError::SigningFailed {
                message: e.to_string(),
            })?;
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::hash::Hash;
    use solana_sdk::system_instruction;

    #[tokio::test]
    async fn test_local_wallet_signs_as_fee_payer() {
        let wallet = LocalWallet::new(Keypair::new());
        let payer = wallet.public_key().unwrap();
        assert_eq!(payer, wallet.address());

        let ix = system_instruction::transfer(&payer, &Pubkey::new_unique(), 1);
        let message =
            solana_sdk::message::Message::new_with_blockhash(&[ix], Some(&payer), &Hash::new_unique());
        let unsigned = Transaction::new_unsigned(message);
        assert!(!unsigned.is_signed());

        let signed = wallet.sign_transaction(unsigned).await.unwrap();
        assert!(signed.is_signed());
        signed.verify().unwrap();
    }
}
