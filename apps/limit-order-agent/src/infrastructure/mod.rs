//! Infrastructure layer: adapters behind the application ports.

pub mod chain;
pub mod order_log;
pub mod price_source;
pub mod token;
