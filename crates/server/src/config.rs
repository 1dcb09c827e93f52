//! Command line, environment and config-file resolution.
//!
//! Precedence: CLI flag / environment variable > YAML config file > built-in default.

use crate::error::{Result, ServerError};
use apex_mcp_tools::ApexConfig;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Newline-delimited JSON-RPC over stdin/stdout.
    Stdio,
    /// Streamable HTTP at `/mcp`.
    #[default]
    Http,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "apex-mcp", version, about = "MCP server for the Apex API")]
pub struct Cli {
    /// Optional YAML config file.
    #[arg(long, env = "APEX_MCP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bearer token for the Apex API.
    #[arg(long, env = "APEX_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Apex API base URL.
    #[arg(long, env = "APEX_API_URL")]
    pub api_url: Option<String>,

    #[arg(long, env = "MCP_TRANSPORT", value_enum)]
    pub transport: Option<TransportKind>,

    /// Listen host (HTTP transport).
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Listen port (HTTP transport).
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Default log filter; `RUST_LOG` takes precedence when set.
    #[arg(long, env = "APEX_MCP_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "APEX_MCP_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// On-disk configuration. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub transport: Option<TransportKind>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

impl FileConfig {
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML for this schema.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&raw)?)
    }
}

/// Fully resolved server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub apex: ApexConfig,
    pub transport: TransportKind,
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Merge CLI/env values over the optional config file and validate the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is unusable, the API key is missing or blank, or
    /// the API URL is not a valid http(s) URL.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let api_key = cli.api_key.clone().or(file.api_key).unwrap_or_default();
        let api_url = cli.api_url.clone().or(file.api_url);
        let apex = ApexConfig::new(api_key, api_url.as_deref())?;

        Ok(Self {
            apex,
            transport: cli.transport.or(file.transport).unwrap_or_default(),
            host: cli
                .host
                .clone()
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
        })
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}
