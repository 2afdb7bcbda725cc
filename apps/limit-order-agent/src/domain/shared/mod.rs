//! Shared domain value objects.

mod identifiers;
mod symbol;

pub use identifiers::{OrderId, PoolId, TxRef};
pub use symbol::TokenSymbol;
