//! Apex MCP server: configuration, logging and the stdio / streamable HTTP transports around
//! [`apex_mcp_tools::ToolRegistry`].

pub mod config;
pub mod error;
pub mod logging;
pub mod server;
pub mod transport;

pub use error::{Result, ServerError};
