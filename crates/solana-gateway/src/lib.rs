//! solana-gateway: Wrapper around the Solana JSON-RPC client
//!
//! This crate provides the one place Solstream talks to the chain:
//! balance scans, blockhash retrieval, transaction submission, and
//! confirmation polling, all behind uniform timeouts and typed errors.

use std::sync::Arc;
use std::time::Duration;

use solana_account_decoder::UiAccountEncoding;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

use solstream_core::{RpcConfig, RpcError};

/// Default timeout for RPC calls (30 seconds).
/// Long enough for congested public endpoints, short enough to avoid
/// perpetual spinners.
const RPC_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How often confirmation polling re-checks a submitted signature.
const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Byte offset of the owner field inside an SPL token account
const TOKEN_ACCOUNT_OWNER_OFFSET: usize = 32;

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, RpcError>;

/// High-level Solana RPC gateway
#[derive(Clone)]
pub struct RpcGateway {
    inner: Arc<RpcClient>,
    config: RpcConfig,
}

impl RpcGateway {
    /// Create a new gateway from configuration
    pub fn new(config: RpcConfig) -> Self {
        let inner = RpcClient::new_with_timeout_and_commitment(
            config.url.clone(),
            RPC_REQUEST_TIMEOUT,
            config.commitment,
        );

        Self {
            inner: Arc::new(inner),
            config,
        }
    }

    /// Get the underlying RPC client (for advanced usage)
    pub fn inner(&self) -> &RpcClient {
        &self.inner
    }

    /// Get the current gateway configuration
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Commitment level used for queries, submission, and confirmation
    pub fn commitment(&self) -> CommitmentConfig {
        self.config.commitment
    }

    /// Check if the endpoint is reachable
    pub async fn is_online(&self) -> bool {
        timed_request(self.inner.get_version()).await.is_ok()
    }

    /// Fetch a fresh blockhash together with its last valid block height.
    ///
    /// Both values come from one call so that signing and confirmation share
    /// the same expiry window.
    pub async fn latest_blockhash(&self) -> Result<(Hash, u64)> {
        timed_request(
            self.inner
                .get_latest_blockhash_with_commitment(self.commitment()),
        )
        .await
    }

    /// Scan the token program for the owner's accounts holding `mint`.
    ///
    /// Filters by account data size, mint (offset 0), and owner (offset 32),
    /// and returns `(account, raw amount)` pairs.
    pub async fn token_accounts(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Vec<(Pubkey, u64)>> {
        let filters = vec![
            RpcFilterType::DataSize(spl_token::state::Account::LEN as u64),
            RpcFilterType::Memcmp(Memcmp::new_base58_encoded(0, mint.as_ref())),
            RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
                TOKEN_ACCOUNT_OWNER_OFFSET,
                owner.as_ref(),
            )),
        ];

        let config = RpcProgramAccountsConfig {
            filters: Some(filters),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(self.commitment()),
                ..Default::default()
            },
            ..Default::default()
        };

        let accounts = timed_request(
            self.inner
                .get_program_accounts_with_config(&spl_token::id(), config),
        )
        .await?;

        Ok(accounts
            .into_iter()
            .filter_map(|(address, account)| {
                unpack_token_amount(&account.data).map(|amount| (address, amount))
            })
            .collect())
    }

    /// Total balance of `mint` held by `owner`, summed across all of the
    /// owner's token accounts (raw base units).
    pub async fn token_balance(&self, owner: &Pubkey, mint: &Pubkey) -> Result<u64> {
        let accounts = self.token_accounts(owner, mint).await?;
        Ok(accounts.iter().map(|(_, amount)| amount).sum())
    }

    /// Check whether an account exists on-chain
    pub async fn account_exists(&self, address: &Pubkey) -> Result<bool> {
        let response = timed_request(
            self.inner
                .get_account_with_commitment(address, self.commitment()),
        )
        .await?;
        Ok(response.value.is_some())
    }

    /// Submit a signed transaction. No internal retry: resubmitting a
    /// settlement transaction risks paying twice.
    pub async fn submit(&self, transaction: &Transaction) -> Result<Signature> {
        let signature = timed_request(self.inner.send_transaction(transaction)).await?;
        tracing::info!(%signature, "transaction submitted");
        Ok(signature)
    }

    /// Poll until `signature` satisfies the configured commitment.
    ///
    /// Fails `TransactionFailed` if the status carries an on-chain error,
    /// and `BlockhashExpired` once the chain height passes the expiry the
    /// transaction was signed against. Expiry is what prevents waiting
    /// forever on a transaction the network has silently dropped.
    pub async fn confirm(&self, signature: &Signature, last_valid_block_height: u64) -> Result<()> {
        loop {
            let statuses = timed_request(self.inner.get_signature_statuses(&[*signature])).await?;

            if let Some(status) = statuses.value.into_iter().next().flatten() {
                if let Some(err) = status.err {
                    return Err(RpcError::TransactionFailed {
                        message: err.to_string(),
                    });
                }
                if status.satisfies_commitment(self.commitment()) {
                    tracing::debug!(%signature, "transaction confirmed");
                    return Ok(());
                }
            }

            let chain_height = timed_request(self.inner.get_block_height()).await?;
            if chain_height > last_valid_block_height {
                tracing::warn!(%signature, chain_height, "blockhash expired before confirmation");
                return Err(RpcError::BlockhashExpired {
                    last_valid_block_height,
                    chain_height,
                });
            }

            tokio::time::sleep(CONFIRM_POLL_INTERVAL).await;
        }
    }
}

/// Wrap an RPC call with a timeout. Converts both timeout and API errors to RpcError.
async fn timed_request<T, E: std::fmt::Display>(
    fut: impl std::future::Future<Output = std::result::Result<T, E>>,
) -> Result<T> {
    tokio::time::timeout(RPC_REQUEST_TIMEOUT, fut)
        .await
        .map_err(|_| RpcError::Timeout {
            seconds: RPC_REQUEST_TIMEOUT.as_secs(),
        })?
        .map_err(|e| RpcError::ApiError {
            message: e.to_string(),
        })
}

/// Unpack the raw amount from SPL token account data.
///
/// Returns None for data that is not a token account (wrong size or layout);
/// the program-account filters should make that unreachable, but a lying RPC
/// endpoint must not panic us.
fn unpack_token_amount(data: &[u8]) -> Option<u64> {
    spl_token::state::Account::unpack(data).ok().map(|a| a.amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::program_option::COption;
    use spl_token::state::{Account as TokenAccount, AccountState};

    fn packed_token_account(amount: u64) -> Vec<u8> {
        let account = TokenAccount {
            mint: Pubkey::new_unique(),
            owner: Pubkey::new_unique(),
            amount,
            delegate: COption::None,
            state: AccountState::Initialized,
            is_native: COption::None,
            delegated_amount: 0,
            close_authority: COption::None,
        };
        let mut data = vec![0u8; TokenAccount::LEN];
        TokenAccount::pack(account, &mut data).unwrap();
        data
    }

    #[test]
    fn test_unpack_token_amount() {
        let data = packed_token_account(5_250_000);
        assert_eq!(unpack_token_amount(&data), Some(5_250_000));
    }

    #[test]
    fn test_unpack_rejects_wrong_size() {
        assert_eq!(unpack_token_amount(&[0u8; 10]), None);
        assert_eq!(unpack_token_amount(&[]), None);
    }

    #[test]
    fn test_gateway_from_default_config() {
        let gateway = RpcGateway::new(RpcConfig::default());
        assert_eq!(gateway.config().url, "https://api.mainnet-beta.solana.com");
        assert_eq!(gateway.commitment(), CommitmentConfig::confirmed());
    }
}
