//! Driven ports: interfaces the core consumes.

mod chain;
mod order_log;
mod price_source;
mod token;

pub use chain::{ChainClientPort, ChainError};
pub use order_log::{NoOpOrderLog, OrderLogError, OrderLogPort};
pub use price_source::{PriceSourceError, PriceSourcePort};
pub use token::{TokenServiceError, TokenServicePort};

#[cfg(test)]
pub use chain::MockChainClientPort;
