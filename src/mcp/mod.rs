//! MCP (Model Context Protocol) server over stdio.
//!
//! - `types`: JSON-RPC and MCP wire types
//! - `transport`: newline-delimited message framing
//! - `server`: request routing onto the tool registry

pub mod server;
pub mod transport;
pub mod types;

pub use server::McpServer;
pub use transport::{MessageReader, MessageWriter, TransportError};
pub use types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId};
