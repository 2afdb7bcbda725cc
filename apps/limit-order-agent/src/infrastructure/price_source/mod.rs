//! Market-data adapters.

mod http;
mod onchain;
mod one_inch;
mod static_rate;

pub use http::HttpPriceSource;
pub use onchain::{OnChainPriceSource, PoolLeg};
pub use one_inch::OneInchPriceSource;
pub use static_rate::StaticRateSource;
