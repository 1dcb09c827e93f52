use crate::error::{ApexToolsError, Result};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Base URL used when no `apiUrl` is configured.
pub const DEFAULT_API_URL: &str = "https://api.apexagents.ai";

/// Credentials + endpoint of the remote Apex API.
///
/// Resolved once at startup and never mutated afterwards. Cloning is cheap, so every server
/// instance (the HTTP transport creates one per request) owns its own copy.
#[derive(Clone)]
pub struct ApexConfig {
    bearer_token: Arc<str>,
    api_url: Arc<str>,
}

impl ApexConfig {
    /// Build a config from a bearer token and an optional base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApexToolsError::Config`] if the token is empty or the base URL is not an
    /// absolute `http(s)` URL. No tool can be registered without a valid config.
    pub fn new(bearer_token: impl Into<String>, api_url: Option<&str>) -> Result<Self> {
        let bearer_token = bearer_token.into();
        let bearer_token = bearer_token.trim();
        if bearer_token.is_empty() {
            return Err(ApexToolsError::Config(
                "Apex API key is missing (set APEX_API_KEY)".to_string(),
            ));
        }

        let api_url = api_url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_API_URL);
        let parsed = Url::parse(api_url)
            .map_err(|e| ApexToolsError::Config(format!("Invalid Apex API URL '{api_url}': {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ApexToolsError::Config(format!(
                "Invalid Apex API URL '{api_url}': unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        Ok(Self {
            bearer_token: Arc::from(bearer_token),
            api_url: Arc::from(api_url.trim_end_matches('/')),
        })
    }

    #[must_use]
    pub fn bearer_token(&self) -> &str {
        &self.bearer_token
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl fmt::Debug for ApexConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApexConfig")
            .field("bearer_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}
