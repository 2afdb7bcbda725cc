//! Chain client port (driven port).
//!
//! Interface to the settlement venue: quoting and executing swaps against
//! a pool. Implementations may be a live JSON-RPC client or a simulated
//! venue; both are selected at construction time.

use async_trait::async_trait;

use crate::domain::shared::{PoolId, TxRef};

/// Chain interaction error. Every variant is a recoverable per-call
/// failure from the core's point of view.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChainError {
    /// Transport-level failure (connection, timeout, malformed payload).
    #[error("chain transport error: {message}")]
    Transport {
        /// Failure description.
        message: String,
    },

    /// Contract call reverted.
    #[error("contract revert: {message}")]
    Revert {
        /// Revert reason as reported by the node.
        message: String,
    },

    /// Operation not supported by this client.
    #[error("chain operation unsupported: {message}")]
    Unsupported {
        /// What was attempted and why it is unsupported.
        message: String,
    },
}

/// Port for quoting and settling swaps.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainClientPort: Send + Sync {
    /// Expected output amount for swapping `amount_in` of slot
    /// `sell_index` into slot `buy_index` on `pool`.
    async fn quote(
        &self,
        pool: &PoolId,
        sell_index: i32,
        buy_index: i32,
        amount_in: u64,
    ) -> Result<u64, ChainError>;

    /// Execute the swap, enforcing `min_out` as the output floor.
    async fn swap(
        &self,
        pool: &PoolId,
        sell_index: i32,
        buy_index: i32,
        amount_in: u64,
        min_out: u64,
        recipient: &str,
    ) -> Result<TxRef, ChainError>;

    /// Liquidity the pool can absorb for this trade, capped at
    /// `requested`. Defaults to the full requested amount for venues
    /// that do not expose depth.
    async fn available_liquidity(
        &self,
        _pool: &PoolId,
        _sell_index: i32,
        _buy_index: i32,
        requested: u64,
    ) -> Result<u64, ChainError> {
        Ok(requested)
    }
}
