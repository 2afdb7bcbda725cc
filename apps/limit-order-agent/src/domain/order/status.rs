//! Order status in the lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status.
///
/// An order is created `New`, moved to `Working` by the submission path,
/// and from `Working` reaches exactly one terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order created but not yet accepted into the registry.
    New,
    /// Order active and being monitored.
    Working,
    /// Order executed; settlement reference recorded.
    Filled,
    /// Order canceled by the user or by an IOC/FOK policy decision.
    Canceled,
    /// Order expired (GTT expiry or time-caused cancellation).
    Expired,
    /// Execution attempt failed; failure reason recorded.
    Failed,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Filled | Self::Canceled | Self::Expired | Self::Failed
        )
    }

    /// Returns true if the order is eligible for the monitoring tick.
    #[must_use]
    pub const fn is_working(&self) -> bool {
        matches!(self, Self::Working)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::New => "NEW",
            Self::Working => "WORKING",
            Self::Filled => "FILLED",
            Self::Canceled => "CANCELED",
            Self::Expired => "EXPIRED",
            Self::Failed => "FAILED",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::Canceled.is_terminal());
        assert!(OrderStatus::Expired.is_terminal());
        assert!(OrderStatus::Failed.is_terminal());
        assert!(!OrderStatus::New.is_terminal());
        assert!(!OrderStatus::Working.is_terminal());
    }

    #[test]
    fn only_working_is_monitored() {
        assert!(OrderStatus::Working.is_working());
        assert!(!OrderStatus::New.is_working());
        assert!(!OrderStatus::Filled.is_working());
    }

    #[test]
    fn display_matches_wire_form() {
        assert_eq!(OrderStatus::Working.to_string(), "WORKING");
        assert_eq!(OrderStatus::Failed.to_string(), "FAILED");
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&OrderStatus::Expired).unwrap();
        assert_eq!(json, "\"EXPIRED\"");
        let parsed: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, OrderStatus::Expired);
    }
}
