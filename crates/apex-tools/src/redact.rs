//! Redaction of outbound request details in error messages.
//!
//! Tool errors are returned verbatim to the calling agent, so they must not echo query strings
//! (search terms, cursors) or URL credentials back.

use url::Url;

/// Render a URL without userinfo, query and fragment.
#[must_use]
pub fn redacted_url(url: &Url) -> String {
    let mut u = url.clone();
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

/// Describe a `reqwest` failure for a tool result.
#[must_use]
pub fn describe_transport_error(e: &reqwest::Error) -> String {
    let kind = if e.is_timeout() {
        "request timed out"
    } else if e.is_connect() {
        "connection failed"
    } else if e.is_decode() || e.is_body() {
        "failed to read response body"
    } else {
        "request failed"
    };

    let mut detail = e.to_string();
    if let Some(u) = e.url() {
        detail = detail.replace(u.as_str(), &redacted_url(u));
    }
    format!("{kind}: {detail}")
}
