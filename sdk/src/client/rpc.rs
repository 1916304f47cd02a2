//! JSON-RPC ledger client.
//!
//! Implements [`Ledger`] against a Solana JSON-RPC 2.0 endpoint.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64ct::{Base64, Encoding};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use solana_sdk::{
    hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction,
};
use tracing::{debug, warn};

use super::config::ClientConfig;
use super::error::ClientError;
use crate::ledger::Ledger;
use crate::types::{Commitment, SignatureStatus};

/// Delay before the first timeout retry, doubled on each further retry.
const BASE_BACKOFF_MS: u64 = 100;

/// Longest delay between timeout retries.
const MAX_BACKOFF_MS: u64 = 10_000;

/// Returns the delay before timeout retry number `retry` (starting at 1).
fn backoff(retry: u32) -> Duration {
    let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
    Duration::from_millis(BASE_BACKOFF_MS.saturating_mul(factor).min(MAX_BACKOFF_MS))
}

/// JSON-RPC error object.
#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Response wrapper carrying a slot context.
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

/// `getLatestBlockhash` value.
#[derive(Debug, Deserialize)]
struct BlockhashValue {
    blockhash: String,
}

/// `getSignatureStatuses` entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusValue {
    slot: u64,
    confirmation_status: Option<Commitment>,
    err: Option<Value>,
}

/// `getTransaction` result.
#[derive(Debug, Deserialize)]
struct TransactionResult {
    meta: Option<TransactionMeta>,
}

/// Execution metadata of a transaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionMeta {
    log_messages: Option<Vec<String>>,
}

/// `getAccountInfo` value.
#[derive(Debug, Deserialize)]
struct AccountValue {
    /// `[data, encoding]`
    data: (String, String),
}

/// JSON-RPC client for a Solana node.
#[derive(Debug)]
pub struct RpcLedger {
    config: ClientConfig,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl RpcLedger {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .user_agent(&config.user_agent)
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            config,
            http,
            next_id: AtomicU64::new(1),
        })
    }

    /// Creates a new client for the given RPC URL with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_url(rpc_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::new(ClientConfig::new(rpc_url))
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Calls a read-only RPC method.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, ClientError> {
        let result = self.request_with_retry(method, &params, true).await?;
        serde_json::from_value(result).map_err(|e| ClientError::Deserialization(e.to_string()))
    }

    /// Sends one JSON-RPC request and returns its `result` member.
    ///
    /// Rate limiting is always retried, since the node refused the request
    /// outright. Timeouts are only retried when `idempotent` is set: a timed
    /// out submission may still have landed. Other HTTP failures come back as
    /// [`ClientError::Http`], JSON-RPC error objects as [`ClientError::Rpc`].
    async fn request_with_retry(
        &self,
        method: &str,
        params: &Value,
        idempotent: bool,
    ) -> Result<Value, ClientError> {
        let mut retry_count = 0;

        loop {
            let body = json!({
                "jsonrpc": "2.0",
                "id": self.next_id.fetch_add(1, Ordering::Relaxed),
                "method": method,
                "params": params,
            });

            let resp = match self.http.post(&self.config.rpc_url).json(&body).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    if e.is_timeout() && idempotent && retry_count < self.config.max_retries {
                        retry_count += 1;
                        warn!("{} timed out, retry {}", method, retry_count);
                        tokio::time::sleep(backoff(retry_count)).await;
                        continue;
                    }
                    return Err(ClientError::from(e));
                }
            };

            let status = resp.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after = resp
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse().ok());

                if retry_count < self.config.max_retries {
                    let wait_time = retry_after.unwrap_or(1);
                    tokio::time::sleep(Duration::from_secs(wait_time)).await;
                    retry_count += 1;
                    continue;
                }

                return Err(ClientError::RateLimited { retry_after });
            }

            let text = resp
                .text()
                .await
                .map_err(|e| ClientError::Deserialization(e.to_string()))?;

            if !status.is_success() {
                return Err(ClientError::Http {
                    status: status.as_u16(),
                    body: text,
                });
            }

            let mut envelope: Value = serde_json::from_str(&text)
                .map_err(|e| ClientError::Deserialization(e.to_string()))?;

            if let Some(error) = envelope.get("error") {
                let error: RpcErrorObject = serde_json::from_value(error.clone())
                    .map_err(|e| ClientError::Deserialization(e.to_string()))?;
                return Err(ClientError::Rpc {
                    code: error.code,
                    message: error.message,
                });
            }

            return Ok(envelope
                .get_mut("result")
                .map(Value::take)
                .unwrap_or(Value::Null));
        }
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn latest_blockhash(&self) -> Result<Hash, ClientError> {
        let response: WithContext<BlockhashValue> = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": self.config.commitment.as_str() }]),
            )
            .await?;

        Hash::from_str(&response.value.blockhash)
            .map_err(|e| ClientError::Deserialization(format!("blockhash: {}", e)))
    }

    async fn submit(&self, transaction: &Transaction) -> Result<Signature, ClientError> {
        let wire = bincode::serialize(transaction)
            .map_err(|e| ClientError::Deserialization(format!("transaction: {}", e)))?;

        let params = json!([
            Base64::encode_string(&wire),
            {
                "encoding": "base64",
                "skipPreflight": self.config.skip_preflight,
                "preflightCommitment": self.config.commitment.as_str(),
            }
        ]);

        let result = match self.request_with_retry("sendTransaction", &params, false).await {
            Ok(result) => result,
            Err(ClientError::Rpc { code, message }) => {
                debug!("sendTransaction refused [{}]: {}", code, message);
                return Err(ClientError::Rejected(message));
            }
            Err(e) => return Err(e),
        };

        let signature: String = serde_json::from_value(result)
            .map_err(|e| ClientError::Deserialization(e.to_string()))?;

        Signature::from_str(&signature)
            .map_err(|e| ClientError::Deserialization(format!("signature: {}", e)))
    }

    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, ClientError> {
        let response: WithContext<Vec<Option<StatusValue>>> = self
            .call(
                "getSignatureStatuses",
                json!([[signature.to_string()], { "searchTransactionHistory": true }]),
            )
            .await?;

        Ok(response
            .value
            .into_iter()
            .next()
            .flatten()
            .map(|status| SignatureStatus {
                slot: status.slot,
                confirmation: status.confirmation_status,
                err: status.err.map(|err| err.to_string()),
            }))
    }

    async fn transaction_logs(&self, signature: &Signature) -> Result<Vec<String>, ClientError> {
        // getTransaction does not serve the processed level
        let commitment = self.config.commitment.max(Commitment::Confirmed);

        let response: Option<TransactionResult> = self
            .call(
                "getTransaction",
                json!([
                    signature.to_string(),
                    {
                        "encoding": "json",
                        "commitment": commitment.as_str(),
                        "maxSupportedTransactionVersion": 0,
                    }
                ]),
            )
            .await?;

        let transaction =
            response.ok_or_else(|| ClientError::NotFound(format!("transaction {}", signature)))?;

        Ok(transaction
            .meta
            .and_then(|meta| meta.log_messages)
            .unwrap_or_default())
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, ClientError> {
        let response: WithContext<Option<AccountValue>> = self
            .call(
                "getAccountInfo",
                json!([
                    address.to_string(),
                    {
                        "encoding": "base64",
                        "commitment": self.config.commitment.as_str(),
                    }
                ]),
            )
            .await?;

        response
            .value
            .map(|account| {
                Base64::decode_vec(&account.data.0)
                    .map_err(|e| ClientError::Deserialization(format!("account data: {}", e)))
            })
            .transpose()
    }
}
