//! Widget-backed MCP tool servers.
//!
//! One protocol adapter (schema validation, tool dispatch, response
//! envelopes, widget resources) shared by four thin tool servers:
//! delivery, vendors, properties, ideas. Servers speak line-delimited
//! JSON-RPC over stdio or the same handler mounted over HTTP.

pub mod config;
pub mod mcp;
pub mod providers;
pub mod servers;

pub use config::Config;
pub use mcp::server::McpServer;
pub use servers::ServerKind;
