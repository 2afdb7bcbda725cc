//! Application services orchestrating domain logic over the ports.

mod price_resolver;

pub use price_resolver::{DEFAULT_CACHE_TTL, PriceQuote, PriceResolver, SYNTHETIC_SOURCE};
