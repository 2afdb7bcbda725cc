//! Order storage/log port (driven port).
//!
//! Fire-and-forget from the core's perspective: the engine never depends
//! on the log's success for correctness, only for auditability.

use async_trait::async_trait;

use crate::domain::order::Order;

/// Order log error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OrderLogError {
    /// Write failed.
    #[error("order log write failed: {message}")]
    WriteFailed {
        /// Failure description.
        message: String,
    },
}

/// Port for appending order lifecycle events and persisting snapshots.
#[async_trait]
pub trait OrderLogPort: Send + Sync {
    /// Append a lifecycle event for an order.
    async fn append(&self, order: &Order, event: &str) -> Result<(), OrderLogError>;

    /// Persist the current order snapshot.
    async fn persist(&self, order: &Order) -> Result<(), OrderLogError>;
}

/// No-op order log for testing.
#[derive(Debug, Clone, Default)]
pub struct NoOpOrderLog;

#[async_trait]
impl OrderLogPort for NoOpOrderLog {
    async fn append(&self, _order: &Order, _event: &str) -> Result<(), OrderLogError> {
        Ok(())
    }

    async fn persist(&self, _order: &Order) -> Result<(), OrderLogError> {
        Ok(())
    }
}
