//! Multi-source price resolution with a short-lived cache.
//!
//! Sources are tried in fixed priority order; a failing or malformed
//! source "declines" and the next one is tried. When every real source
//! declines, a bounded deterministic synthetic rate keeps the engine
//! functioning — flagged so no caller can mistake it for a real quote,
//! and never cached so real sources are retried on the next call.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::application::ports::PriceSourcePort;
use crate::domain::pricing::math;
use crate::domain::shared::TokenSymbol;

/// Default cache TTL, matching the original 30-second expiry.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

/// Source tag carried by synthetic fallback quotes.
pub const SYNTHETIC_SOURCE: &str = "synthetic";

/// A resolved exchange rate for one evaluation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuote {
    /// Human buy-units per one human sell-unit.
    pub rate: Decimal,
    /// Tag of the source that produced the rate.
    pub source: String,
    /// True when the rate is the synthetic fallback, not market data.
    pub synthetic: bool,
    /// When the rate was obtained.
    pub fetched_at: DateTime<Utc>,
}

/// Cache key: the unordered token pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PairKey(String, String);

impl PairKey {
    fn new(a: &TokenSymbol, b: &TokenSymbol) -> Self {
        if a.as_str() <= b.as_str() {
            Self(a.as_str().to_string(), b.as_str().to_string())
        } else {
            Self(b.as_str().to_string(), a.as_str().to_string())
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    /// Rate in the direction it was fetched: `base -> quote`.
    rate: Decimal,
    /// Sell side of the fetched direction.
    base: TokenSymbol,
    source: String,
    stored_at: Instant,
}

/// Resolves a current exchange rate for a token pair.
pub struct PriceResolver {
    sources: Vec<Arc<dyn PriceSourcePort>>,
    cache: Mutex<HashMap<PairKey, CacheEntry>>,
    ttl: Duration,
}

impl PriceResolver {
    /// Create a resolver over sources in priority order.
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn PriceSourcePort>>) -> Self {
        Self::with_ttl(sources, DEFAULT_CACHE_TTL)
    }

    /// Create a resolver with a custom cache TTL.
    #[must_use]
    pub fn with_ttl(sources: Vec<Arc<dyn PriceSourcePort>>, ttl: Duration) -> Self {
        Self {
            sources,
            cache: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Resolve the current rate for selling `sell` into `buy`.
    ///
    /// Never fails: when every source declines, the returned quote is the
    /// synthetic fallback with `synthetic == true`.
    pub async fn resolve(&self, sell: &TokenSymbol, buy: &TokenSymbol) -> PriceQuote {
        let key = PairKey::new(sell, buy);

        if let Some(quote) = self.cached(&key, sell) {
            return quote;
        }

        for source in &self.sources {
            match source.spot_price(sell, buy).await {
                Ok(rate) if rate > Decimal::ZERO => {
                    tracing::debug!(
                        source = source.name(),
                        pair = %format!("{sell}/{buy}"),
                        rate = %rate,
                        "price resolved"
                    );
                    self.store(key, sell, rate, source.name());
                    return PriceQuote {
                        rate,
                        source: source.name().to_string(),
                        synthetic: false,
                        fetched_at: Utc::now(),
                    };
                }
                Ok(rate) => {
                    tracing::debug!(
                        source = source.name(),
                        rate = %rate,
                        "source returned a non-positive rate, trying next"
                    );
                }
                Err(e) => {
                    tracing::debug!(
                        source = source.name(),
                        error = %e,
                        "price source declined, trying next"
                    );
                }
            }
        }

        tracing::warn!(
            pair = %format!("{sell}/{buy}"),
            "all price sources declined, using synthetic fallback"
        );

        PriceQuote {
            rate: Self::synthetic_rate(sell, buy),
            source: SYNTHETIC_SOURCE.to_string(),
            synthetic: true,
            fetched_at: Utc::now(),
        }
    }

    /// Drop all cached entries.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    /// Number of cached pairs.
    #[must_use]
    pub fn cached_pairs(&self) -> usize {
        self.cache.lock().len()
    }

    fn cached(&self, key: &PairKey, sell: &TokenSymbol) -> Option<PriceQuote> {
        let cache = self.cache.lock();
        let entry = cache.get(key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            return None;
        }

        // One entry serves both trade directions.
        let rate = if entry.base == *sell {
            entry.rate
        } else {
            math::inverse_price(entry.rate)
        };
        if rate <= Decimal::ZERO {
            return None;
        }

        Some(PriceQuote {
            rate,
            source: entry.source.clone(),
            synthetic: false,
            fetched_at: Utc::now(),
        })
    }

    fn store(&self, key: PairKey, sell: &TokenSymbol, rate: Decimal, source: &str) {
        self.cache.lock().insert(
            key,
            CacheEntry {
                rate,
                base: sell.clone(),
                source: source.to_string(),
                stored_at: Instant::now(),
            },
        );
    }

    /// Deterministic bounded fallback rate in `[0.5, 2.0)`, stable for a
    /// given pair and direction.
    #[must_use]
    pub fn synthetic_rate(sell: &TokenSymbol, buy: &TokenSymbol) -> Decimal {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in sell.as_str().bytes().chain([b'/']).chain(buy.as_str().bytes()) {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        // 0.500 ..= 1.999 with three decimal places.
        Decimal::new(500 + i64::try_from(hash % 1_500).unwrap_or(0), 3)
    }
}
