//! Simulated settlement venue for dry-run operation and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::application::ports::{ChainClientPort, ChainError};
use crate::domain::pricing::math;
use crate::domain::shared::{PoolId, TxRef};

use async_trait::async_trait;

/// In-memory venue with configurable rates and depth per pool slot pair.
///
/// Rates are keyed by `(pool, sell_index, buy_index)` and quoted in human
/// units on both sides, with decimals fixed per slot.
#[derive(Debug, Default)]
pub struct SimulatedChainClient {
    rates: RwLock<HashMap<(String, i32, i32), PairConfig>>,
    fail_next: AtomicBool,
    tx_counter: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
struct PairConfig {
    rate: Decimal,
    sell_decimals: u8,
    buy_decimals: u8,
    /// Depth cap in sell-token base units; `None` means unbounded.
    max_in: Option<u64>,
}

impl SimulatedChainClient {
    /// Create an empty venue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure a pair in one direction.
    pub fn set_rate(
        &self,
        pool: &PoolId,
        sell_index: i32,
        buy_index: i32,
        rate: Decimal,
        sell_decimals: u8,
        buy_decimals: u8,
    ) {
        self.rates.write().insert(
            (pool.as_str().to_string(), sell_index, buy_index),
            PairConfig {
                rate,
                sell_decimals,
                buy_decimals,
                max_in: None,
            },
        );
    }

    /// Cap the depth for a configured pair, in sell-token base units.
    pub fn set_depth(&self, pool: &PoolId, sell_index: i32, buy_index: i32, max_in: u64) {
        if let Some(config) = self
            .rates
            .write()
            .get_mut(&(pool.as_str().to_string(), sell_index, buy_index))
        {
            config.max_in = Some(max_in);
        }
    }

    /// Make the next swap revert.
    pub fn fail_next_swap(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn pair(&self, pool: &PoolId, sell_index: i32, buy_index: i32) -> Result<PairConfig, ChainError> {
        self.rates
            .read()
            .get(&(pool.as_str().to_string(), sell_index, buy_index))
            .copied()
            .ok_or_else(|| ChainError::Revert {
                message: format!("no pair at {pool} [{sell_index} -> {buy_index}]"),
            })
    }
}

#[async_trait]
impl ChainClientPort for SimulatedChainClient {
    async fn quote(
        &self,
        pool: &PoolId,
        sell_index: i32,
        buy_index: i32,
        amount_in: u64,
    ) -> Result<u64, ChainError> {
        let pair = self.pair(pool, sell_index, buy_index)?;
        Ok(math::expected_output(
            amount_in,
            pair.rate,
            pair.sell_decimals,
            pair.buy_decimals,
        ))
    }

    async fn swap(
        &self,
        pool: &PoolId,
        sell_index: i32,
        buy_index: i32,
        amount_in: u64,
        min_out: u64,
        _recipient: &str,
    ) -> Result<TxRef, ChainError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ChainError::Revert {
                message: "injected failure".to_string(),
            });
        }

        let out = self.quote(pool, sell_index, buy_index, amount_in).await?;
        if out < min_out {
            return Err(ChainError::Revert {
                message: format!("output {out} below floor {min_out}"),
            });
        }

        let seq = self.tx_counter.fetch_add(1, Ordering::SeqCst);
        Ok(TxRef::new(format!("0xsim{seq:016x}")))
    }

    async fn available_liquidity(
        &self,
        pool: &PoolId,
        sell_index: i32,
        buy_index: i32,
        requested: u64,
    ) -> Result<u64, ChainError> {
        let pair = self.pair(pool, sell_index, buy_index)?;
        Ok(pair.max_in.map_or(requested, |cap| requested.min(cap)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn venue() -> (SimulatedChainClient, PoolId) {
        let venue = SimulatedChainClient::new();
        let pool = PoolId::new("tricrypto");
        venue.set_rate(&pool, 0, 1, dec!(0.0005), 6, 6);
        (venue, pool)
    }

    #[tokio::test]
    async fn quote_applies_the_configured_rate() {
        let (venue, pool) = venue();
        assert_eq!(venue.quote(&pool, 0, 1, 1_000_000).await.unwrap(), 500);
    }

    #[tokio::test]
    async fn quote_unknown_pair_reverts() {
        let (venue, pool) = venue();
        assert!(venue.quote(&pool, 1, 0, 1_000).await.is_err());
    }

    #[tokio::test]
    async fn swap_enforces_the_output_floor() {
        let (venue, pool) = venue();
        let err = venue
            .swap(&pool, 0, 1, 1_000_000, 501, "0xrecipient")
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Revert { .. }));

        let tx = venue
            .swap(&pool, 0, 1, 1_000_000, 500, "0xrecipient")
            .await
            .unwrap();
        assert!(tx.as_str().starts_with("0xsim"));
    }

    #[tokio::test]
    async fn tx_refs_are_unique() {
        let (venue, pool) = venue();
        let a = venue.swap(&pool, 0, 1, 1_000_000, 0, "0x1").await.unwrap();
        let b = venue.swap(&pool, 0, 1, 1_000_000, 0, "0x1").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn injected_failure_hits_exactly_one_swap() {
        let (venue, pool) = venue();
        venue.fail_next_swap();
        assert!(venue.swap(&pool, 0, 1, 1, 0, "0x1").await.is_err());
        assert!(venue.swap(&pool, 0, 1, 1_000_000, 0, "0x1").await.is_ok());
    }

    #[tokio::test]
    async fn depth_cap_bounds_liquidity() {
        let (venue, pool) = venue();
        venue.set_depth(&pool, 0, 1, 400_000);
        assert_eq!(
            venue
                .available_liquidity(&pool, 0, 1, 1_000_000)
                .await
                .unwrap(),
            400_000
        );
        assert_eq!(
            venue.available_liquidity(&pool, 0, 1, 100_000).await.unwrap(),
            100_000
        );
    }

    #[tokio::test]
    async fn uncapped_pair_reports_full_depth() {
        let (venue, pool) = venue();
        assert_eq!(
            venue
                .available_liquidity(&pool, 0, 1, 1_000_000)
                .await
                .unwrap(),
            1_000_000
        );
    }
}
