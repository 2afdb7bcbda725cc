//! Token metadata adapters.

mod rpc;
mod static_table;

pub use rpc::RpcTokenService;
pub use static_table::{DEFAULT_DECIMALS, StaticTokenTable};
