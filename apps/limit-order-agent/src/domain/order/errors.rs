//! Order lifecycle errors.

use thiserror::Error;

use super::status::OrderStatus;

/// Errors raised by the order aggregate and registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Order parameters violate an invariant; the order never enters the
    /// registry.
    #[error("invalid order: {reason}")]
    Validation {
        /// Which invariant was violated.
        reason: String,
    },

    /// Invalid state transition attempted.
    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidStateTransition {
        /// Current order status.
        from: OrderStatus,
        /// Attempted status.
        to: OrderStatus,
        /// Reason for failure.
        reason: String,
    },

    /// Order not found (unknown or already terminal).
    #[error("order not found: {order_id}")]
    NotFound {
        /// Order ID.
        order_id: String,
    },
}

impl OrderError {
    /// Convenience constructor for a validation failure.
    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}
