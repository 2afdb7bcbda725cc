//! Chain adapters: simulated venue and JSON-RPC client.

pub(crate) mod abi;
mod rpc;
mod simulated;

pub use rpc::{JsonRpcTransport, RpcChainClient};
pub use simulated::SimulatedChainClient;
