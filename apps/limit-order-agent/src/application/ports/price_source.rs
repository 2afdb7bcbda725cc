//! Price source port (driven port).
//!
//! One external market-data source. Each source is independently
//! callable and independently unreliable; the resolver contains every
//! failure and moves to the next source.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::shared::TokenSymbol;

/// Price source error. A failing source is "this source declined", never
/// a fatal error for the caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PriceSourceError {
    /// Source could not be reached or answered with garbage.
    #[error("{origin} unavailable: {message}")]
    Unavailable {
        /// Tag of the source that declined.
        origin: String,
        /// Failure description.
        message: String,
    },

    /// Source answered but the payload did not contain a usable rate.
    #[error("{origin} returned an invalid response: {message}")]
    InvalidResponse {
        /// Tag of the source that declined.
        origin: String,
        /// What was wrong with the payload.
        message: String,
    },

    /// Source does not serve this pair.
    #[error("{origin} does not quote {pair}")]
    UnsupportedPair {
        /// Tag of the source that declined.
        origin: String,
        /// The pair that was requested.
        pair: String,
    },
}

/// Port for a single market-data source.
#[async_trait]
pub trait PriceSourcePort: Send + Sync {
    /// Stable tag identifying this source in quotes and logs.
    fn name(&self) -> &'static str;

    /// Current rate: human buy-units per one human sell-unit.
    async fn spot_price(
        &self,
        sell: &TokenSymbol,
        buy: &TokenSymbol,
    ) -> Result<Decimal, PriceSourceError>;
}
