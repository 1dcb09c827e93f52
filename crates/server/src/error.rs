//! Error types for the Apex MCP server.

use apex_mcp_tools::ApexToolsError;
use thiserror::Error;

/// Main error type for the server binary.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration errors (unreadable file, invalid values, bad log filter)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors raised while building the tool registry
    #[error(transparent)]
    Tools(#[from] ApexToolsError),

    /// Startup errors (transport failed to bind or start)
    #[error("Startup error: {0}")]
    Startup(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;
