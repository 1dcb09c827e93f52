//! Error types for `apex-mcp-tools`.

use serde_json::Value;
use thiserror::Error;

/// Main error type for the tool runtime.
///
/// Only [`ApexToolsError::Config`], [`ApexToolsError::Validation`] and
/// [`ApexToolsError::UnknownTool`] ever leave [`crate::ToolRegistry::call_tool`]; remote and
/// transport failures are folded into an `isError` tool result instead.
#[derive(Error, Debug)]
pub enum ApexToolsError {
    /// Missing/empty credentials, invalid base URL, malformed tool catalog.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tool arguments failed the declared input schema.
    #[error("Invalid params: {message}")]
    Validation {
        message: String,
        violations: Vec<Value>,
    },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The remote API answered with a non-2xx status.
    #[error("API request failed ({status}): {status_text}")]
    RemoteApi { status: u16, status_text: String },

    /// Network failure, timeout, or an unparsable response body.
    #[error("HTTP transport error: {0}")]
    Transport(String),
}

impl ApexToolsError {
    pub(crate) fn validation(message: impl Into<String>, violations: Vec<Value>) -> Self {
        Self::Validation {
            message: message.into(),
            violations,
        }
    }
}

impl From<reqwest::Error> for ApexToolsError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(crate::redact::describe_transport_error(&value))
    }
}

/// Result type alias for tool runtime operations.
pub type Result<T> = std::result::Result<T, ApexToolsError>;
