//! Model Context Protocol surface
//!
//! Line-delimited JSON-RPC over stdio, routing tools/call requests to the
//! habit tools.

pub mod protocol;
pub mod server;

pub use server::{tool_definitions, McpServer};
