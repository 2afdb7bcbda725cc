//! Order state machine service.
//!
//! Validates lifecycle transitions: `New -> Working -> exactly one of
//! {Filled, Canceled, Expired, Failed}`. Terminal states are immutable.

use super::errors::OrderError;
use super::status::OrderStatus;

/// Order state machine for validating transitions.
pub struct OrderStateMachine;

impl OrderStateMachine {
    /// Check if a state transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        matches!(
            (from, to),
            // From New
            (OrderStatus::New, OrderStatus::Working)
                // From Working
                | (OrderStatus::Working, OrderStatus::Filled)
                | (OrderStatus::Working, OrderStatus::Canceled)
                | (OrderStatus::Working, OrderStatus::Expired)
                | (OrderStatus::Working, OrderStatus::Failed)
        )
    }

    /// Validate a state transition.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is invalid.
    pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(OrderError::InvalidStateTransition {
                from,
                to,
                reason: Self::transition_error_reason(from, to),
            })
        }
    }

    /// Get a human-readable reason for an invalid transition.
    #[must_use]
    pub fn transition_error_reason(from: OrderStatus, to: OrderStatus) -> String {
        match from {
            OrderStatus::Filled => format!("order is already filled, cannot transition to {to}"),
            OrderStatus::Canceled => format!("order is canceled, cannot transition to {to}"),
            OrderStatus::Expired => format!("order has expired, cannot transition to {to}"),
            OrderStatus::Failed => format!("order has failed, cannot transition to {to}"),
            _ => format!("invalid transition from {from} to {to}"),
        }
    }

    /// Get all valid next states from a given state.
    #[must_use]
    pub fn valid_next_states(from: OrderStatus) -> Vec<OrderStatus> {
        match from {
            OrderStatus::New => vec![OrderStatus::Working],
            OrderStatus::Working => vec![
                OrderStatus::Filled,
                OrderStatus::Canceled,
                OrderStatus::Expired,
                OrderStatus::Failed,
            ],
            // Terminal states
            OrderStatus::Filled
            | OrderStatus::Canceled
            | OrderStatus::Expired
            | OrderStatus::Failed => vec![],
        }
    }
}
