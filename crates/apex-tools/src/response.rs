//! Response normalization and conversion into MCP tool results.

use crate::error::{ApexToolsError, Result};
use reqwest::StatusCode;
use rmcp::model::{CallToolResult, Content};
use serde_json::{Value, json};

/// Normalize a completed HTTP exchange into a JSON value.
///
/// - non-2xx: [`ApexToolsError::RemoteApi`] with the canonical reason phrase
/// - 204, `Content-Length: 0`, or a blank body: `{"success": true}`
/// - otherwise the body must be JSON
///
/// # Errors
///
/// Returns [`ApexToolsError::RemoteApi`] for non-success statuses and
/// [`ApexToolsError::Transport`] for a success body that is not JSON.
pub fn normalize(status: StatusCode, content_length: Option<&str>, body: &str) -> Result<Value> {
    if !status.is_success() {
        return Err(ApexToolsError::RemoteApi {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }
    if status == StatusCode::NO_CONTENT || content_length.map(str::trim) == Some("0") {
        return Ok(empty_success());
    }
    if body.trim().is_empty() {
        return Ok(empty_success());
    }
    serde_json::from_str(body)
        .map_err(|e| ApexToolsError::Transport(format!("Invalid JSON response: {e}")))
}

/// Read and normalize a `reqwest` response.
///
/// The body is not read when the status or `Content-Length` already says it is empty.
///
/// # Errors
///
/// See [`normalize`]; body read failures become [`ApexToolsError::Transport`].
pub async fn normalize_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let content_length = response
        .headers()
        .get(reqwest::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if !status.is_success()
        || status == StatusCode::NO_CONTENT
        || content_length.as_deref().map(str::trim) == Some("0")
    {
        return normalize(status, content_length.as_deref(), "");
    }

    let body = response.text().await?;
    normalize(status, content_length.as_deref(), &body)
}

fn empty_success() -> Value {
    json!({ "success": true })
}

/// Wrap a normalized value as a single text content item.
///
/// JSON strings are passed through as raw text; everything else is pretty-printed.
#[must_use]
pub fn success_result(value: &Value) -> CallToolResult {
    let text = match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    };
    CallToolResult::success(vec![Content::text(text)])
}

#[must_use]
pub fn error_result(err: &ApexToolsError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {err}"))])
}

#[cfg(test)]
mod tests {
    use super::{error_result, normalize, success_result};
    use crate::error::ApexToolsError;
    use reqwest::StatusCode;
    use rmcp::model::CallToolResult;
    use serde_json::json;

    fn text_of(result: &CallToolResult) -> String {
        let v = serde_json::to_value(result).expect("serialize");
        v["content"][0]["text"].as_str().expect("text").to_string()
    }

    #[test]
    fn no_content_is_success() {
        let v = normalize(StatusCode::NO_CONTENT, None, "").expect("ok");
        assert_eq!(v, json!({"success": true}));
    }

    #[test]
    fn zero_content_length_is_success_even_with_200() {
        let v = normalize(StatusCode::OK, Some("0"), "").expect("ok");
        assert_eq!(v, json!({"success": true}));
    }

    #[test]
    fn blank_body_is_success() {
        let v = normalize(StatusCode::OK, None, "  \n").expect("ok");
        assert_eq!(v, json!({"success": true}));
    }

    #[test]
    fn non_success_reports_status_and_reason() {
        let err = normalize(StatusCode::NOT_FOUND, None, r#"{"detail":"nope"}"#).expect_err("404");
        assert_eq!(err.to_string(), "API request failed (404): Not Found");

        let odd = StatusCode::from_u16(599).expect("status");
        let err = normalize(odd, None, "").expect_err("599");
        assert_eq!(err.to_string(), "API request failed (599): Unknown");
    }

    #[test]
    fn invalid_json_is_a_transport_error() {
        let err = normalize(StatusCode::OK, None, "<html>").expect_err("invalid");
        assert!(matches!(err, ApexToolsError::Transport(_)));
    }

    #[test]
    fn json_bodies_are_pretty_printed_and_strings_passed_through() {
        let obj = normalize(StatusCode::OK, None, r#"{"id":"1"}"#).expect("ok");
        let r = success_result(&obj);
        assert_eq!(r.is_error, Some(false));
        assert_eq!(text_of(&r), "{\n  \"id\": \"1\"\n}");

        let s = normalize(StatusCode::OK, None, r#""a reply""#).expect("ok");
        assert_eq!(text_of(&success_result(&s)), "a reply");
    }

    #[test]
    fn error_results_are_flagged() {
        let r = error_result(&ApexToolsError::RemoteApi {
            status: 500,
            status_text: "Internal Server Error".to_string(),
        });
        assert_eq!(r.is_error, Some(true));
        assert_eq!(
            text_of(&r),
            "Error: API request failed (500): Internal Server Error"
        );
    }
}
