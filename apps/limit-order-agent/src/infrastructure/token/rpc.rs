//! Token metadata over JSON-RPC.
//!
//! Works only for tokens given as contract addresses; ticker symbols
//! have no on-chain lookup here and are rejected.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::application::ports::{TokenServiceError, TokenServicePort};
use crate::domain::shared::TokenSymbol;
use crate::infrastructure::chain::{JsonRpcTransport, abi};

use async_trait::async_trait;

/// Token service querying ERC-20 views over `eth_call`.
///
/// Decimals never change for a deployed token, so they are cached
/// forever after the first lookup.
#[derive(Debug)]
pub struct RpcTokenService {
    transport: Arc<JsonRpcTransport>,
    decimals_cache: RwLock<HashMap<TokenSymbol, u8>>,
}

impl RpcTokenService {
    /// Create a service over a shared transport.
    #[must_use]
    pub fn new(transport: Arc<JsonRpcTransport>) -> Self {
        Self {
            transport,
            decimals_cache: RwLock::new(HashMap::new()),
        }
    }

    fn require_address(token: &TokenSymbol) -> Result<&str, TokenServiceError> {
        if token.is_address() {
            Ok(token.as_str())
        } else {
            Err(TokenServiceError::UnknownToken {
                token: token.to_string(),
            })
        }
    }
}

#[async_trait]
impl TokenServicePort for RpcTokenService {
    async fn decimals(&self, token: &TokenSymbol) -> Result<u8, TokenServiceError> {
        if let Some(cached) = self.decimals_cache.read().get(token).copied() {
            return Ok(cached);
        }

        let address = Self::require_address(token)?;
        let data = abi::call_data(abi::SELECTOR_DECIMALS, &[]);
        let result = self
            .transport
            .eth_call(address, &data)
            .await
            .map_err(|e| TokenServiceError::LookupFailed {
                message: e.to_string(),
            })?;
        let raw = abi::decode_u64(&result).map_err(|e| TokenServiceError::LookupFailed {
            message: e.to_string(),
        })?;
        let decimals = u8::try_from(raw).map_err(|_| TokenServiceError::LookupFailed {
            message: format!("decimals out of range: {raw}"),
        })?;

        self.decimals_cache.write().insert(token.clone(), decimals);
        Ok(decimals)
    }

    async fn balance_of(
        &self,
        token: &TokenSymbol,
        owner: &str,
    ) -> Result<u64, TokenServiceError> {
        let address = Self::require_address(token)?;
        let owner_word = abi::encode_address(owner).map_err(|e| TokenServiceError::LookupFailed {
            message: e.to_string(),
        })?;
        let data = abi::call_data(abi::SELECTOR_BALANCE_OF, &[owner_word]);
        let result = self
            .transport
            .eth_call(address, &data)
            .await
            .map_err(|e| TokenServiceError::LookupFailed {
                message: e.to_string(),
            })?;
        abi::decode_u64(&result).map_err(|e| TokenServiceError::LookupFailed {
            message: e.to_string(),
        })
    }
}
