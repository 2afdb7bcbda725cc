//! JSON-RPC chain client.
//!
//! Read-only venue access over `eth_call`. Quotes come from the pool's
//! `get_dy` view; swap submission needs a transaction signer, which this
//! client does not carry, so `swap` reports `Unsupported` and live
//! settlement stays behind the simulated client until one is wired in.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{ChainClientPort, ChainError};
use crate::domain::shared::{PoolId, TxRef};

use super::abi;

use async_trait::async_trait;

const RPC_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Shared JSON-RPC transport over HTTP.
#[derive(Debug)]
pub struct JsonRpcTransport {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcTransport {
    /// Create a transport for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Transport` when the HTTP client cannot be
    /// constructed.
    pub fn new(url: impl Into<String>) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(RPC_TIMEOUT)
            .build()
            .map_err(|e| ChainError::Transport {
                message: format!("http client: {e}"),
            })?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Perform an `eth_call` against `to` with pre-encoded call data,
    /// returning the raw hex result.
    pub async fn eth_call(&self, to: &str, data: &str) -> Result<String, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "eth_call",
            "params": [{"to": to, "data": data}, "latest"],
        });

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainError::Transport {
                message: format!("eth_call send: {e}"),
            })?;

        let parsed: RpcResponse = response.json().await.map_err(|e| ChainError::Transport {
            message: format!("eth_call response: {e}"),
        })?;

        if let Some(error) = parsed.error {
            // Node-reported errors are contract-side: reverts, bad calldata.
            return Err(ChainError::Revert {
                message: format!("rpc error {}: {}", error.code, error.message),
            });
        }
        parsed.result.ok_or_else(|| ChainError::Transport {
            message: "eth_call returned neither result nor error".to_string(),
        })
    }
}

/// Chain client backed by a JSON-RPC node.
#[derive(Debug)]
pub struct RpcChainClient {
    transport: JsonRpcTransport,
}

impl RpcChainClient {
    /// Create a client for the given RPC endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Transport` when the transport cannot be
    /// constructed.
    pub fn new(url: impl Into<String>) -> Result<Self, ChainError> {
        Ok(Self {
            transport: JsonRpcTransport::new(url)?,
        })
    }
}

#[async_trait]
impl ChainClientPort for RpcChainClient {
    async fn quote(
        &self,
        pool: &PoolId,
        sell_index: i32,
        buy_index: i32,
        amount_in: u64,
    ) -> Result<u64, ChainError> {
        let data = abi::call_data(
            abi::SELECTOR_GET_DY,
            &[
                abi::encode_i128(sell_index),
                abi::encode_i128(buy_index),
                abi::encode_u256(amount_in),
            ],
        );
        let result = self.transport.eth_call(pool.as_str(), &data).await?;
        abi::decode_u64(&result)
    }

    async fn swap(
        &self,
        _pool: &PoolId,
        _sell_index: i32,
        _buy_index: i32,
        _amount_in: u64,
        _min_out: u64,
        _recipient: &str,
    ) -> Result<TxRef, ChainError> {
        Err(ChainError::Unsupported {
            message: "swap submission requires a transaction signer".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn swap_is_unsupported_without_a_signer() {
        let client = RpcChainClient::new("http://localhost:8545").unwrap();
        let err = client
            .swap(&PoolId::new("0xpool"), 0, 1, 1, 0, "0xme")
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Unsupported { .. }));
    }

    #[test]
    fn rpc_error_body_deserializes() {
        let parsed: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"error":{"code":3,"message":"execution reverted"}}"#)
                .unwrap();
        let error = parsed.error.unwrap();
        assert_eq!(error.code, 3);
        assert_eq!(error.message, "execution reverted");
        assert!(parsed.result.is_none());
    }

    #[test]
    fn rpc_result_deserializes() {
        let parsed: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":"0x1f4"}"#).unwrap();
        assert_eq!(parsed.result.as_deref(), Some("0x1f4"));
    }
}
