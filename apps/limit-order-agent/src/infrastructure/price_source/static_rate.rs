//! Settable price source for dry-run operation and tests.

use std::collections::HashMap;

use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::application::ports::{PriceSourceError, PriceSourcePort};
use crate::domain::shared::TokenSymbol;

use async_trait::async_trait;

/// Price source backed by an in-memory rate table.
#[derive(Debug, Default)]
pub struct StaticRateSource {
    rates: RwLock<HashMap<(TokenSymbol, TokenSymbol), Decimal>>,
}

impl StaticRateSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rate for one direction of a pair.
    pub fn set_rate(&self, sell: &TokenSymbol, buy: &TokenSymbol, rate: Decimal) {
        self.rates
            .write()
            .insert((sell.clone(), buy.clone()), rate);
    }

    /// Remove the rate for one direction of a pair.
    pub fn clear_rate(&self, sell: &TokenSymbol, buy: &TokenSymbol) {
        self.rates.write().remove(&(sell.clone(), buy.clone()));
    }
}

#[async_trait]
impl PriceSourcePort for StaticRateSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn spot_price(
        &self,
        sell: &TokenSymbol,
        buy: &TokenSymbol,
    ) -> Result<Decimal, PriceSourceError> {
        self.rates
            .read()
            .get(&(sell.clone(), buy.clone()))
            .copied()
            .ok_or_else(|| PriceSourceError::UnsupportedPair {
                origin: "static".to_string(),
                pair: format!("{sell}/{buy}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn set_and_clear_round_trip() {
        let source = StaticRateSource::new();
        let usdc = TokenSymbol::new("USDC");
        let weth = TokenSymbol::new("WETH");

        assert!(source.spot_price(&usdc, &weth).await.is_err());

        source.set_rate(&usdc, &weth, dec!(0.0005));
        assert_eq!(source.spot_price(&usdc, &weth).await.unwrap(), dec!(0.0005));
        // Directional: the reverse is not implied.
        assert!(source.spot_price(&weth, &usdc).await.is_err());

        source.clear_rate(&usdc, &weth);
        assert!(source.spot_price(&usdc, &weth).await.is_err());
    }
}
