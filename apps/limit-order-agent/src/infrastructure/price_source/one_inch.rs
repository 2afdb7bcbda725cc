//! DEX-aggregator market-data source.
//!
//! Queries a 1inch-style quote endpoint for a one-unit swap and derives
//! the pair rate as `toTokenAmount / fromTokenAmount`. Second tier of
//! the live price chain, behind the primary aggregator.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::ports::{PriceSourceError, PriceSourcePort};
use crate::domain::shared::TokenSymbol;

use async_trait::async_trait;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// One whole token at 18 decimals, the probe size for quotes.
const PROBE_AMOUNT: &str = "1000000000000000000";

/// Quote payload: amounts come back as decimal strings.
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "fromTokenAmount")]
    from_token_amount: String,
    #[serde(rename = "toTokenAmount")]
    to_token_amount: String,
}

/// Price source over a 1inch-style quote REST API.
pub struct OneInchPriceSource {
    http: reqwest::Client,
    base_url: String,
}

impl OneInchPriceSource {
    /// Create a source against the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns `PriceSourceError::Unavailable` when the HTTP client
    /// cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, PriceSourceError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| PriceSourceError::Unavailable {
                origin: "1inch".to_string(),
                message: format!("http client: {e}"),
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn rate_of(quote: &QuoteResponse) -> Result<Decimal, PriceSourceError> {
        let parse = |raw: &str| {
            raw.parse::<Decimal>()
                .map_err(|e| PriceSourceError::InvalidResponse {
                    origin: "1inch".to_string(),
                    message: format!("unparseable amount {raw}: {e}"),
                })
        };
        let from_amount = parse(&quote.from_token_amount)?;
        let to_amount = parse(&quote.to_token_amount)?;
        if from_amount <= Decimal::ZERO {
            return Err(PriceSourceError::InvalidResponse {
                origin: "1inch".to_string(),
                message: "non-positive fromTokenAmount".to_string(),
            });
        }
        Ok(to_amount / from_amount)
    }
}

#[async_trait]
impl PriceSourcePort for OneInchPriceSource {
    fn name(&self) -> &'static str {
        "1inch"
    }

    async fn spot_price(
        &self,
        sell: &TokenSymbol,
        buy: &TokenSymbol,
    ) -> Result<Decimal, PriceSourceError> {
        let url = format!(
            "{}/quote?fromTokenSymbol={}&toTokenSymbol={}&amount={PROBE_AMOUNT}",
            self.base_url,
            sell.as_str(),
            buy.as_str(),
        );
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PriceSourceError::Unavailable {
                origin: "1inch".to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(PriceSourceError::UnsupportedPair {
                origin: "1inch".to_string(),
                pair: format!("{sell}/{buy}"),
            });
        }

        let quote: QuoteResponse =
            response
                .json()
                .await
                .map_err(|e| PriceSourceError::InvalidResponse {
                    origin: "1inch".to_string(),
                    message: e.to_string(),
                })?;

        Self::rate_of(&quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn quote_payload_yields_the_amount_ratio() {
        let quote: QuoteResponse = serde_json::from_str(
            r#"{"fromTokenAmount":"1000000000000000000","toTokenAmount":"500000000000000"}"#,
        )
        .unwrap();
        assert_eq!(OneInchPriceSource::rate_of(&quote).unwrap(), dec!(0.0005));
    }

    #[test]
    fn zero_from_amount_is_an_invalid_response() {
        let quote = QuoteResponse {
            from_token_amount: "0".to_string(),
            to_token_amount: "500".to_string(),
        };
        let err = OneInchPriceSource::rate_of(&quote).unwrap_err();
        assert!(matches!(err, PriceSourceError::InvalidResponse { .. }));
    }

    #[test]
    fn garbage_amount_is_an_invalid_response() {
        let quote = QuoteResponse {
            from_token_amount: "not-a-number".to_string(),
            to_token_amount: "500".to_string(),
        };
        let err = OneInchPriceSource::rate_of(&quote).unwrap_err();
        assert!(matches!(err, PriceSourceError::InvalidResponse { .. }));
    }
}
