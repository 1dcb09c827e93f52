//! Apex API tool catalog + request proxy runtime.
//!
//! This crate is consumed by `apex-mcp-server`, which binds the [`ToolRegistry`] to the stdio and
//! streamable HTTP transports.
//!
//! It contains **no** transport code and **no** process configuration loading: callers resolve an
//! [`ApexConfig`] once and hand it to the registry.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod redact;
pub mod registry;
pub mod request;
pub mod response;
pub mod semantics;

pub use config::ApexConfig;
pub use error::{ApexToolsError, Result};
pub use registry::ToolRegistry;
