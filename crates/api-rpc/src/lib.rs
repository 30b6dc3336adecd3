//! JSON-RPC API Layer
//!
//! JSON-RPC 2.0 server exposing the producer (`product.create.v1`), the
//! resolver (`claim.resolve.v1`) and queue/admin helpers.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use handler::RpcHandler;
pub use server::{RpcServer, RpcServerConfig};
