//! On-chain price source.
//!
//! Quotes one configured pool pair through the chain client by probing
//! `get_dy` with one human unit of the sell token and converting the
//! output back to a rate. Serves both directions of its pair and
//! declines everything else.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::application::ports::{ChainClientPort, PriceSourceError, PriceSourcePort};
use crate::domain::pricing::math;
use crate::domain::shared::{PoolId, TokenSymbol};

use async_trait::async_trait;

/// One leg of the configured pair.
#[derive(Debug, Clone)]
pub struct PoolLeg {
    /// Token on this leg.
    pub token: TokenSymbol,
    /// Venue slot index.
    pub index: i32,
    /// Token decimals.
    pub decimals: u8,
}

/// Price source that quotes a single pool pair on-chain.
pub struct OnChainPriceSource {
    chain: Arc<dyn ChainClientPort>,
    pool: PoolId,
    first: PoolLeg,
    second: PoolLeg,
}

impl OnChainPriceSource {
    /// Create a source for the given pool and pair.
    #[must_use]
    pub fn new(chain: Arc<dyn ChainClientPort>, pool: PoolId, first: PoolLeg, second: PoolLeg) -> Self {
        Self {
            chain,
            pool,
            first,
            second,
        }
    }

    fn legs_for(&self, sell: &TokenSymbol, buy: &TokenSymbol) -> Option<(&PoolLeg, &PoolLeg)> {
        if *sell == self.first.token && *buy == self.second.token {
            Some((&self.first, &self.second))
        } else if *sell == self.second.token && *buy == self.first.token {
            Some((&self.second, &self.first))
        } else {
            None
        }
    }
}

#[async_trait]
impl PriceSourcePort for OnChainPriceSource {
    fn name(&self) -> &'static str {
        "onchain"
    }

    async fn spot_price(
        &self,
        sell: &TokenSymbol,
        buy: &TokenSymbol,
    ) -> Result<Decimal, PriceSourceError> {
        let (sell_leg, buy_leg) =
            self.legs_for(sell, buy)
                .ok_or_else(|| PriceSourceError::UnsupportedPair {
                    origin: "onchain".to_string(),
                    pair: format!("{sell}/{buy}"),
                })?;

        // Probe with one human unit of the sell token.
        let probe = 10u64
            .checked_pow(u32::from(sell_leg.decimals))
            .unwrap_or(u64::MAX);
        let out = self
            .chain
            .quote(&self.pool, sell_leg.index, buy_leg.index, probe)
            .await
            .map_err(|e| PriceSourceError::Unavailable {
                origin: "onchain".to_string(),
                message: e.to_string(),
            })?;

        let rate = math::calculate_price(probe, out, sell_leg.decimals, buy_leg.decimals);
        if rate <= Decimal::ZERO {
            return Err(PriceSourceError::InvalidResponse {
                origin: "onchain".to_string(),
                message: "pool quoted a zero rate".to_string(),
            });
        }
        Ok(rate)
    }
}
