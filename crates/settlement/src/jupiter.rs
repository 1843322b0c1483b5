//! Quote aggregator client (Jupiter v6 API)
//!
//! Two endpoints: `/quote` returns a priced route for an exact-output swap,
//! `/swap` turns that quote into an executable unsigned transaction. The
//! quote payload is opaque to us; it is carried between the two calls
//! unmodified. The aggregator sometimes reports failure as a 200 response
//! with an `error` field, so success is decided here, once, at the boundary.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;

use solstream_core::{AggregatorConfig, SettleError};
use solstream_tx::decode_swap_transaction;

/// Timeout for aggregator HTTP calls. Quotes go stale in seconds, so there
/// is no point waiting longer than this.
const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Opaque quote returned by the aggregator.
///
/// Only its presence is inspected; the payload is passed back to the swap
/// endpoint as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwapQuote(serde_json::Value);

impl SwapQuote {
    pub fn new(raw: serde_json::Value) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Body of the `/swap` request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SwapRequest {
    quote_response: serde_json::Value,
    user_public_key: String,
    destination_token_account: String,
    as_legacy_transaction: bool,
    wrap_and_unwrap_sol: bool,
}

/// Body of the `/swap` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapResponse {
    swap_transaction: String,
}

/// HTTP client for the quote aggregator
#[derive(Clone)]
pub struct JupiterClient {
    http: reqwest::Client,
    config: AggregatorConfig,
}

impl JupiterClient {
    pub fn new(config: AggregatorConfig) -> solstream_core::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("solstream")
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| {
                solstream_core::Error::Config(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Fetch a quote for an exact-output swap: spend `input_mint`, receive
    /// exactly `out_amount` base units of `output_mint`.
    pub async fn quote_exact_out(
        &self,
        input_mint: &Pubkey,
        output_mint: &Pubkey,
        out_amount: u64,
    ) -> Result<SwapQuote, SettleError> {
        let url = format!("{}/quote", self.config.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("inputMint", input_mint.to_string()),
                ("outputMint", output_mint.to_string()),
                ("amount", out_amount.to_string()),
                ("swapMode", "ExactOut".to_string()),
                ("slippageBps", self.config.slippage_bps.to_string()),
            ])
            .send()
            .await
            .map_err(quote_unavailable)?;

        if !response.status().is_success() {
            return Err(SettleError::QuoteUnavailable {
                message: format!("quote endpoint returned {}", response.status()),
            });
        }

        let payload: serde_json::Value = response.json().await.map_err(quote_unavailable)?;
        if let Some(message) = error_message(&payload) {
            return Err(SettleError::QuoteUnavailable {
                message: message.to_string(),
            });
        }

        Ok(SwapQuote(payload))
    }

    /// Request the executable transaction for a previously fetched quote.
    ///
    /// `destination_token_account` is where the swap output lands; it must
    /// exist on-chain before this transaction is submitted. Legacy format is
    /// requested so the connected wallet can countersign.
    pub async fn swap_transaction(
        &self,
        quote: &SwapQuote,
        user: &Pubkey,
        destination_token_account: &Pubkey,
    ) -> Result<Transaction, SettleError> {
        let body = SwapRequest {
            quote_response: quote.raw().clone(),
            user_public_key: user.to_string(),
            destination_token_account: destination_token_account.to_string(),
            as_legacy_transaction: true,
            wrap_and_unwrap_sol: true,
        };

        let url = format!("{}/swap", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(quote_unavailable)?;

        if !response.status().is_success() {
            return Err(SettleError::QuoteUnavailable {
                message: format!("swap endpoint returned {}", response.status()),
            });
        }

        let payload: SwapResponse = response.json().await.map_err(quote_unavailable)?;
        decode_swap_transaction(&payload.swap_transaction).map_err(|e| {
            SettleError::QuoteUnavailable {
                message: e.to_string(),
            }
        })
    }
}

fn quote_unavailable(e: reqwest::Error) -> SettleError {
    SettleError::QuoteUnavailable {
        message: e.to_string(),
    }
}

/// Extract the aggregator's in-band error, if the payload carries one
fn error_message(payload: &serde_json::Value) -> Option<&str> {
    payload.get("error").and_then(|v| v.as_str())
}
