//! Fill policies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fill policy governing when an order executes, waits, or dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FillPolicy {
    /// Remains active until filled or manually canceled.
    GoodTillCanceled,
    /// Remains active until filled, manually canceled, or expired.
    GoodTillTime,
    /// Execute immediately at an acceptable price or cancel. Partial
    /// fills allowed.
    ImmediateOrCancel,
    /// Execute the full amount immediately at an acceptable price or
    /// cancel. No partial fills.
    FillOrKill,
}

impl FillPolicy {
    /// Short wire/display code for the policy.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::GoodTillCanceled => "GTC",
            Self::GoodTillTime => "GTT",
            Self::ImmediateOrCancel => "IOC",
            Self::FillOrKill => "FOK",
        }
    }

    /// Human-readable description of the policy semantics.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::GoodTillCanceled => {
                "Good Till Canceled - order remains active until filled or manually canceled"
            }
            Self::GoodTillTime => {
                "Good Till Time - order remains active until filled, manually canceled, or expired"
            }
            Self::ImmediateOrCancel => {
                "Immediate or Cancel - execute immediately at an acceptable price or cancel; partial fills allowed"
            }
            Self::FillOrKill => {
                "Fill or Kill - execute the full amount immediately at an acceptable price or cancel; no partial fills"
            }
        }
    }

    /// Whether this policy requires an expiry timestamp on the order.
    #[must_use]
    pub const fn requires_expiry(&self) -> bool {
        matches!(self, Self::GoodTillTime)
    }
}

impl fmt::Display for FillPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
