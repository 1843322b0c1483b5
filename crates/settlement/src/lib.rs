//! settlement: On-chain token settlement flows
//!
//! Moves value from a connected wallet to a destination address, either by
//! direct SPL token transfer or by swap-and-forward through the quote
//! aggregator. Each operation is one strict sequence: balance check,
//! account resolve, sign, submit, confirm. Nothing is retried internally
//! and concurrent calls are not deduplicated; both are caller contracts.

pub mod jupiter;
pub mod wallet;

pub use jupiter::{JupiterClient, SwapQuote};
pub use wallet::{LocalWallet, WalletHandle};

use solana_gateway::RpcGateway;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solstream_core::{Result, RpcError, SettleError, TokenDescriptor, TransferRequest};
use solstream_tx::{
    associated_token_address, build_transfer_instructions, build_transfer_tx,
    resolve_associated_account, to_base_units, AssociatedAccount,
};

/// Token settlement over a connected wallet.
///
/// Stateless with respect to its own logic: every call operates on
/// caller-supplied parameters, so concurrent invocations never share
/// mutable state.
pub struct TokenSettlement {
    gateway: RpcGateway,
    aggregator: JupiterClient,
    settlement_token: TokenDescriptor,
}

impl TokenSettlement {
    /// Settlement into USDC by default
    pub fn new(gateway: RpcGateway, aggregator: JupiterClient) -> Self {
        Self {
            gateway,
            aggregator,
            settlement_token: TokenDescriptor::usdc(),
        }
    }

    /// Override the token swaps settle into
    pub fn with_settlement_token(mut self, token: TokenDescriptor) -> Self {
        self.settlement_token = token;
        self
    }

    pub fn settlement_token(&self) -> TokenDescriptor {
        self.settlement_token
    }

    pub fn gateway(&self) -> &RpcGateway {
        &self.gateway
    }

    /// Transfer `request.human_amount` of `request.token` from the wallet
    /// to the destination address, creating the destination's associated
    /// account in the same transaction when needed.
    ///
    /// The balance pre-check runs before anything is assembled or
    /// submitted, so `InsufficientBalance` has no network side effect.
    pub async fn transfer_direct(
        &self,
        wallet: &dyn WalletHandle,
        request: &TransferRequest,
    ) -> Result<Signature> {
        let owner = wallet.public_key().ok_or(SettleError::WalletNotConnected)?;

        let required = to_base_units(request.human_amount, request.token.decimals)
            .map_err(|e| SettleError::InvalidAmount {
                message: e.to_string(),
            })?;
        if required == 0 {
            return Err(SettleError::InvalidAmount {
                message: "amount must be positive".to_string(),
            }
            .into());
        }

        let accounts = self
            .gateway
            .token_accounts(&owner, &request.token.mint)
            .await?;
        let available: u64 = accounts.iter().map(|(_, amount)| amount).sum();
        if available < required {
            return Err(SettleError::InsufficientBalance {
                required,
                available,
            }
            .into());
        }
        // Spend from the owner's largest account for this mint
        let source = accounts
            .iter()
            .max_by_key(|(_, amount)| *amount)
            .map(|(address, _)| *address)
            .ok_or(SettleError::InsufficientBalance {
                required,
                available: 0,
            })?;

        let destination = self
            .resolve_or_create_associated_account(&request.token.mint, &owner, &request.destination)
            .await?;

        let instructions = build_transfer_instructions(
            &request.token,
            &source,
            &destination.address,
            &owner,
            required,
            destination.creation,
        )
        .map_err(|e| SettleError::SubmissionFailed {
            message: e.to_string(),
        })?;

        let (blockhash, last_valid_block_height) = self.gateway.latest_blockhash().await?;
        let unsigned = build_transfer_tx(&instructions, &owner, &blockhash);
        let signed = wallet
            .sign_transaction(unsigned)
            .await
            .map_err(SettleError::from)?;

        let signature = self
            .gateway
            .submit(&signed)
            .await
            .map_err(submission_failed)?;
        self.gateway
            .confirm(&signature, last_valid_block_height)
            .await
            .map_err(submission_failed)?;

        tracing::info!(
            %signature,
            amount = request.human_amount,
            destination = %request.destination,
            "direct transfer settled"
        );
        Ok(signature)
    }

    /// Swap a caller-quoted amount of the source token into the settlement
    /// token and forward it to the destination address.
    ///
    /// The quote must already be fetched (see `JupiterClient::quote_exact_out`);
    /// its freshness window is short and retry behavior belongs to the caller.
    ///
    /// Two-phase by necessity: the aggregator transaction is opaque bytes we
    /// cannot amend, so a missing destination account is created and
    /// confirmed in its own preliminary transaction first. The gap is
    /// recoverable: if the swap is abandoned, a retry finds the account
    /// already created and skips the first phase.
    pub async fn swap_and_forward(
        &self,
        wallet: &dyn WalletHandle,
        destination: &Pubkey,
        quote: &SwapQuote,
    ) -> Result<Signature> {
        let owner = wallet.public_key().ok_or(SettleError::WalletNotConnected)?;

        let resolved = self
            .resolve_or_create_associated_account(&self.settlement_token.mint, &owner, destination)
            .await?;

        if let Some(creation) = resolved.creation.clone() {
            self.bootstrap_account(wallet, &owner, creation).await?;
        }

        let swap_tx = self
            .aggregator
            .swap_transaction(quote, &owner, &resolved.address)
            .await?;

        let (blockhash, last_valid_block_height) = self.gateway.latest_blockhash().await?;
        let mut transaction = swap_tx;
        transaction.message.recent_blockhash = blockhash;

        let signed = wallet
            .sign_transaction(transaction)
            .await
            .map_err(SettleError::from)?;
        let signature = self
            .gateway
            .submit(&signed)
            .await
            .map_err(submission_failed)?;
        self.gateway
            .confirm(&signature, last_valid_block_height)
            .await
            .map_err(submission_failed)?;

        tracing::info!(%signature, destination = %destination, "swap settled and forwarded");
        Ok(signature)
    }

    /// Resolve the recipient's associated account for `mint`, returning an
    /// unsubmitted creation instruction (payable by `payer`) only when the
    /// account does not exist on-chain yet. Idempotent: never produces a
    /// duplicate account.
    pub async fn resolve_or_create_associated_account(
        &self,
        mint: &Pubkey,
        payer: &Pubkey,
        recipient: &Pubkey,
    ) -> Result<AssociatedAccount> {
        let address = associated_token_address(recipient, mint);
        let exists = self.gateway.account_exists(&address).await?;
        Ok(resolve_associated_account(mint, payer, recipient, exists))
    }

    /// Submit and confirm the preliminary associated-account creation for
    /// the swap path.
    async fn bootstrap_account(
        &self,
        wallet: &dyn WalletHandle,
        owner: &Pubkey,
        creation: Instruction,
    ) -> Result<()> {
        let (blockhash, last_valid_block_height) = self.gateway.latest_blockhash().await?;
        let unsigned = build_transfer_tx(&[creation], owner, &blockhash);
        let signed = wallet
            .sign_transaction(unsigned)
            .await
            .map_err(SettleError::from)?;

        let signature = self.gateway.submit(&signed).await.map_err(|e| {
            SettleError::AccountCreationFailed {
                message: e.to_string(),
            }
        })?;
        self.gateway
            .confirm(&signature, last_valid_block_height)
            .await
            .map_err(|e| SettleError::AccountCreationFailed {
                message: e.to_string(),
            })?;

        tracing::info!(%signature, "associated account created for settlement");
        Ok(())
    }
}

/// Submission and confirmation failures collapse to `SubmissionFailed`: the
/// blockhash has likely expired, so the caller must restart the whole flow
/// rather than retry the same transaction.
fn submission_failed(e: RpcError) -> SettleError {
    SettleError::SubmissionFailed {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use solana_sdk::transaction::Transaction;
    use solstream_core::{AggregatorConfig, Error, RpcConfig, WalletError};

    struct DisconnectedWallet;

    #[async_trait]
    impl WalletHandle for DisconnectedWallet {
        fn public_key(&self) -> Option<Pubkey> {
            None
        }

        async fn sign_transaction(
            &self,
            _transaction: Transaction,
        ) -> std::result::Result<Transaction, WalletError> {
            Err(WalletError::NotConnected)
        }
    }

    fn settlement() -> TokenSettlement {
        TokenSettlement::new(
            RpcGateway::new(RpcConfig::default()),
            JupiterClient::new(AggregatorConfig::default()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_transfer_rejects_disconnected_wallet() {
        let request = TransferRequest::new(Pubkey::new_unique(), TokenDescriptor::usdc(), 5.0);
        let err = settlement()
            .transfer_direct(&DisconnectedWallet, &request)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Settlement(SettleError::WalletNotConnected)
        ));
    }

    #[tokio::test]
    async fn test_swap_rejects_disconnected_wallet() {
        let quote = SwapQuote::new(serde_json::json!({"outAmount": "1"}));
        let err = settlement()
            .swap_and_forward(&DisconnectedWallet, &Pubkey::new_unique(), &quote)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Settlement(SettleError::WalletNotConnected)
        ));
    }

    #[tokio::test]
    async fn test_transfer_rejects_invalid_amounts_before_any_network_call() {
        let wallet = LocalWallet::new(solana_sdk::signature::Keypair::new());
        let settle = settlement();

        for bad in [-5.0, 0.0, f64::NAN] {
            let request =
                TransferRequest::new(Pubkey::new_unique(), TokenDescriptor::usdc(), bad);
            let err = settle.transfer_direct(&wallet, &request).await.unwrap_err();
            assert!(
                matches!(err, Error::Settlement(SettleError::InvalidAmount { .. })),
                "amount {} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_settlement_token_defaults_to_usdc() {
        let settle = settlement();
        assert_eq!(settle.settlement_token(), TokenDescriptor::usdc());

        let sol = TokenDescriptor::new(Pubkey::new_unique(), 9);
        let settle = settle.with_settlement_token(sol);
        assert_eq!(settle.settlement_token(), sol);
    }
}
