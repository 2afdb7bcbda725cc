//! Token symbol value object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A token symbol or address, as understood by the configured venue.
///
/// Examples:
/// - Symbol: "WETH", "USDC", "DAI"
/// - Address: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSymbol(String);

impl TokenSymbol {
    /// Create a new token symbol.
    ///
    /// Plain symbols are normalized to uppercase; hex addresses are kept
    /// as given so they stay comparable with on-chain data.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.starts_with("0x") {
            Self(value)
        } else {
            Self(value.to_uppercase())
        }
    }

    /// Get the symbol string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Check whether the symbol is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if this looks like a hex address rather than a ticker.
    #[must_use]
    pub fn is_address(&self) -> bool {
        self.0.starts_with("0x")
    }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TokenSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TokenSymbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TokenSymbol {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
