//! Order log emitting structured tracing events.
//!
//! Lifecycle events become `info` spans in the normal log stream;
//! snapshots are serialized to JSON at `debug` so an operator can
//! reconstruct any order from the logs alone.

use crate::application::ports::{OrderLogError, OrderLogPort};
use crate::domain::order::Order;

use async_trait::async_trait;

/// Order log backed by the tracing pipeline.
#[derive(Debug, Clone, Default)]
pub struct TracingOrderLog;

impl TracingOrderLog {
    /// Create a tracing-backed log.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OrderLogPort for TracingOrderLog {
    async fn append(&self, order: &Order, event: &str) -> Result<(), OrderLogError> {
        tracing::info!(
            order_id = %order.id(),
            event,
            status = %order.status(),
            policy = order.policy().code(),
            pair = %format!("{}/{}", order.sell_token(), order.buy_token()),
            "order event"
        );
        Ok(())
    }

    async fn persist(&self, order: &Order) -> Result<(), OrderLogError> {
        let snapshot = serde_json::to_string(order).map_err(|e| OrderLogError::WriteFailed {
            message: format!("serialize order: {e}"),
        })?;
        tracing::debug!(order_id = %order.id(), snapshot, "order snapshot");
        Ok(())
    }
}
