//! Token metadata/balance port (driven port).

use async_trait::async_trait;

use crate::domain::shared::TokenSymbol;

/// Token service error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TokenServiceError {
    /// Token is not known to the service.
    #[error("unknown token: {token}")]
    UnknownToken {
        /// The symbol or address that was looked up.
        token: String,
    },

    /// Lookup failed at the transport level.
    #[error("token lookup failed: {message}")]
    LookupFailed {
        /// Failure description.
        message: String,
    },
}

/// Port for token metadata and balances.
///
/// Used to normalize human-readable amounts at the boundary; the core's
/// pricing math only consumes the decimals it returns.
#[async_trait]
pub trait TokenServicePort: Send + Sync {
    /// Number of decimals for a token.
    async fn decimals(&self, token: &TokenSymbol) -> Result<u8, TokenServiceError>;

    /// Balance of `owner` in the token's base units.
    async fn balance_of(&self, token: &TokenSymbol, owner: &str)
    -> Result<u64, TokenServiceError>;
}
