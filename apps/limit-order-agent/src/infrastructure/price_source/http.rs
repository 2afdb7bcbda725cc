//! HTTP market-data source.
//!
//! Queries a CoinGecko-compatible `simple/price` endpoint for the USD
//! value of both legs and derives the pair rate as the cross-rate
//! `sell_usd / buy_usd`.

use std::collections::HashMap;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::application::ports::{PriceSourceError, PriceSourcePort};
use crate::domain::shared::TokenSymbol;

use async_trait::async_trait;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Price source over a CoinGecko-style REST API.
pub struct HttpPriceSource {
    http: reqwest::Client,
    base_url: String,
    ids: HashMap<TokenSymbol, String>,
}

impl HttpPriceSource {
    /// Create a source with the default symbol-to-listing-id table.
    ///
    /// # Errors
    ///
    /// Returns `PriceSourceError::Unavailable` when the HTTP client
    /// cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, PriceSourceError> {
        let mut ids = HashMap::new();
        for (symbol, id) in [
            ("ETH", "ethereum"),
            ("WETH", "weth"),
            ("WBTC", "wrapped-bitcoin"),
            ("USDC", "usd-coin"),
            ("USDT", "tether"),
            ("DAI", "dai"),
        ] {
            ids.insert(TokenSymbol::new(symbol), id.to_string());
        }
        Self::with_ids(base_url, ids)
    }

    /// Create a source with a custom symbol-to-listing-id table.
    ///
    /// # Errors
    ///
    /// Returns `PriceSourceError::Unavailable` when the HTTP client
    /// cannot be constructed.
    pub fn with_ids(
        base_url: impl Into<String>,
        ids: HashMap<TokenSymbol, String>,
    ) -> Result<Self, PriceSourceError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| PriceSourceError::Unavailable {
                origin: "coingecko".to_string(),
                message: format!("http client: {e}"),
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            ids,
        })
    }

    fn listing_id(&self, token: &TokenSymbol) -> Result<&str, PriceSourceError> {
        self.ids
            .get(token)
            .map(String::as_str)
            .ok_or_else(|| PriceSourceError::UnsupportedPair {
                origin: "coingecko".to_string(),
                pair: token.to_string(),
            })
    }
}

#[async_trait]
impl PriceSourcePort for HttpPriceSource {
    fn name(&self) -> &'static str {
        "coingecko"
    }

    async fn spot_price(
        &self,
        sell: &TokenSymbol,
        buy: &TokenSymbol,
    ) -> Result<Decimal, PriceSourceError> {
        let sell_id = self.listing_id(sell)?;
        let buy_id = self.listing_id(buy)?;

        let url = format!(
            "{}/simple/price?ids={sell_id},{buy_id}&vs_currencies=usd",
            self.base_url
        );
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PriceSourceError::Unavailable {
                origin: "coingecko".to_string(),
                message: e.to_string(),
            })?;

        let prices: HashMap<String, HashMap<String, Decimal>> =
            response.json().await.map_err(|e| PriceSourceError::InvalidResponse {
                origin: "coingecko".to_string(),
                message: e.to_string(),
            })?;

        let usd_of = |id: &str| -> Result<Decimal, PriceSourceError> {
            prices
                .get(id)
                .and_then(|leg| leg.get("usd"))
                .copied()
                .ok_or_else(|| PriceSourceError::InvalidResponse {
                    origin: "coingecko".to_string(),
                    message: format!("no usd price for {id}"),
                })
        };

        let sell_usd = usd_of(sell_id)?;
        let buy_usd = usd_of(buy_id)?;
        if buy_usd <= Decimal::ZERO {
            return Err(PriceSourceError::InvalidResponse {
                origin: "coingecko".to_string(),
                message: format!("non-positive usd price for {buy_id}"),
            });
        }

        Ok(sell_usd / buy_usd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_symbol_is_an_unsupported_pair() {
        let source = HttpPriceSource::new("https://api.coingecko.com/api/v3").unwrap();
        let err = source
            .spot_price(&TokenSymbol::new("MYSTERY"), &TokenSymbol::new("USDC"))
            .await
            .unwrap_err();
        assert!(matches!(err, PriceSourceError::UnsupportedPair { .. }));
    }

    #[test]
    fn payload_shape_parses() {
        let json = r#"{"usd-coin":{"usd":1.0},"weth":{"usd":2000.0}}"#;
        let prices: HashMap<String, HashMap<String, Decimal>> =
            serde_json::from_str(json).unwrap();
        let usdc = prices["usd-coin"]["usd"];
        let weth = prices["weth"]["usd"];
        assert_eq!(usdc / weth, Decimal::new(5, 4));
    }
}
