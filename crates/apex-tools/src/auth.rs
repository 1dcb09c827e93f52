//! Auth/header policy shared by every outbound Apex request.
//!
//! Merge order (later wins):
//! 1. policy defaults: `Consumer-Type`, and `Content-Type` when a JSON body is sent
//! 2. per-tool/caller headers
//! 3. `Authorization: Bearer <token>`, which callers can never override

use crate::config::ApexConfig;
use crate::error::{ApexToolsError, Result};
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;

/// Marker identifying this layer to the remote API.
pub const CONSUMER_TYPE_HEADER: &str = "consumer-type";
pub const CONSUMER_TYPE: &str = "mcp";

#[derive(Clone)]
pub struct AuthPolicy {
    authorization: Arc<HeaderValue>,
}

impl AuthPolicy {
    /// # Errors
    ///
    /// Returns [`ApexToolsError::Config`] if the token cannot be sent as a header value.
    pub fn new(config: &ApexConfig) -> Result<Self> {
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", config.bearer_token())).map_err(|_| {
                ApexToolsError::Config(
                    "Apex API key contains characters not allowed in an HTTP header".to_string(),
                )
            })?;
        authorization.set_sensitive(true);
        Ok(Self {
            authorization: Arc::new(authorization),
        })
    }

    /// Compute the final header set for one request.
    ///
    /// # Errors
    ///
    /// Returns [`ApexToolsError::Config`] if an extra header name or value is not valid HTTP.
    pub fn headers(
        &self,
        method: &Method,
        has_body: bool,
        extra: &[(String, String)],
    ) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(CONSUMER_TYPE_HEADER),
            HeaderValue::from_static(CONSUMER_TYPE),
        );
        if has_body && method != Method::GET {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        for (name, value) in extra {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ApexToolsError::Config(format!("Invalid header name '{name}': {e}"))
            })?;
            if name == AUTHORIZATION {
                tracing::debug!("ignoring caller-supplied Authorization header");
                continue;
            }
            let value = HeaderValue::from_str(value).map_err(|e| {
                ApexToolsError::Config(format!("Invalid value for header '{name}': {e}"))
            })?;
            headers.insert(name, value);
        }

        headers.insert(AUTHORIZATION, self.authorization.as_ref().clone());
        Ok(headers)
    }
}

impl std::fmt::Debug for AuthPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthPolicy").finish_non_exhaustive()
    }
}
