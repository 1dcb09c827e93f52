//! Request builder: turns a path, verb and tool input into a fully-specified outbound request.
//!
//! Nothing here touches the network. The registry feeds the result to `reqwest`.

use crate::auth::AuthPolicy;
use crate::error::{ApexToolsError, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use reqwest::Method;
use reqwest::header::HeaderMap;
use serde_json::{Map, Value};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPair {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query entries; only valid for GET/DELETE.
    pub query: Option<Map<String, Value>>,
    /// JSON body; only valid for POST/PUT.
    pub body: Option<Value>,
    pub extra_headers: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    /// Path relative to the configured base URL, already expanded.
    pub path: String,
    pub query: Vec<QueryPair>,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl RequestSpec {
    /// Encoded query string, `None` when there are no entries.
    #[must_use]
    pub fn query_string(&self) -> Option<String> {
        if self.query.is_empty() {
            return None;
        }
        let mut query = String::new();
        for (i, p) in self.query.iter().enumerate() {
            if i > 0 {
                query.push('&');
            }
            query.push_str(&encode_component(&p.key));
            query.push('=');
            query.push_str(&encode_component(&p.value));
        }
        Some(query)
    }

    /// Join with `base_url` (no trailing slash) into the final request URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApexToolsError::Config`] if the joined URL does not parse.
    pub fn url(&self, base_url: &str) -> Result<Url> {
        let joined = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        let mut url = Url::parse(&joined)
            .map_err(|e| ApexToolsError::Config(format!("Invalid request URL: {e}")))?;
        url.set_query(self.query_string().as_deref());
        Ok(url)
    }
}

#[derive(Debug, Clone)]
pub struct RequestBuilder {
    auth: AuthPolicy,
}

impl RequestBuilder {
    #[must_use]
    pub fn new(auth: AuthPolicy) -> Self {
        Self { auth }
    }

    /// Build a request description.
    ///
    /// GET/DELETE carry query parameters only; POST/PUT carry a JSON body only.
    ///
    /// # Errors
    ///
    /// Returns [`ApexToolsError::Config`] if the options mix the wrong payload with the verb, or
    /// an extra header is not valid HTTP.
    pub fn build(&self, path: &str, method: Method, options: RequestOptions) -> Result<RequestSpec> {
        let RequestOptions {
            query,
            body,
            extra_headers,
        } = options;

        let is_read = method == Method::GET || method == Method::DELETE;
        if is_read && body.is_some() {
            return Err(ApexToolsError::Config(format!(
                "{method} {path} cannot carry a request body"
            )));
        }
        if !is_read && query.as_ref().is_some_and(|q| !q.is_empty()) {
            return Err(ApexToolsError::Config(format!(
                "{method} {path} cannot carry query parameters"
            )));
        }

        let query = query.as_ref().map(encode_query_map).unwrap_or_default();
        let headers = self.auth.headers(&method, body.is_some(), &extra_headers)?;

        Ok(RequestSpec {
            method,
            path: path.to_string(),
            query,
            body,
            headers,
        })
    }
}

/// Flatten a query map into ordered pairs.
///
/// Arrays become one pair per element under the same key; `null` and empty arrays are skipped.
#[must_use]
pub fn encode_query_map(map: &Map<String, Value>) -> Vec<QueryPair> {
    let mut pairs = Vec::new();
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items.iter().filter(|v| !v.is_null()) {
                    pairs.push(QueryPair {
                        key: key.clone(),
                        value: value_to_string(item),
                    });
                }
            }
            other => pairs.push(QueryPair {
                key: key.clone(),
                value: value_to_string(other),
            }),
        }
    }
    pairs
}

/// Substitute `{name}` placeholders; each value is encoded as a single path segment.
///
/// # Errors
///
/// Returns [`ApexToolsError::Config`] if a placeholder has no value.
pub fn expand_path(template: &str, params: &[(&str, &str)]) -> Result<String> {
    let mut path = template.to_string();
    for (name, value) in params {
        path = path.replace(&format!("{{{name}}}"), &encode_component(value));
    }
    if let Some(start) = path.find('{')
        && let Some(len) = path[start..].find('}')
    {
        return Err(ApexToolsError::Config(format!(
            "No value for path parameter '{}' in '{template}'",
            &path[start + 1..start + len]
        )));
    }
    Ok(path)
}

/// Normalize an ISO-8601 date argument.
///
/// A calendar date (`2025-07-25`) is sent as-is; a date-time with an offset is converted to UTC
/// with millisecond precision (`2025-07-25T10:00:00.000Z`). Anything else is rejected.
#[must_use]
pub fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.format("%Y-%m-%d").to_string());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| {
            dt.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true)
        })
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{f:.0}")
            }
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_component(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    out
}

fn is_unreserved(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~')
}

#[cfg(test)]
mod tests {
    use super::{RequestBuilder, RequestOptions, encode_query_map, expand_path, normalize_date};
    use crate::auth::AuthPolicy;
    use crate::config::ApexConfig;
    use reqwest::Method;
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
    use serde_json::{Map, Value, json};

    fn builder() -> RequestBuilder {
        let cfg = ApexConfig::new("k", Some("https://api.example.com/")).expect("config");
        RequestBuilder::new(AuthPolicy::new(&cfg).expect("auth"))
    }

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().expect("object")
    }

    #[test]
    fn arrays_repeat_the_key_in_element_order() {
        let spec = builder()
            .build(
                "/apex/tweet/search",
                Method::GET,
                RequestOptions {
                    query: Some(obj(json!({"fromUsers": ["a", "b"], "top": true}))),
                    ..RequestOptions::default()
                },
            )
            .expect("build");
        assert_eq!(
            spec.query_string().as_deref(),
            Some("fromUsers=a&fromUsers=b&top=true")
        );
        assert_eq!(
            spec.url("https://api.example.com").expect("url").as_str(),
            "https://api.example.com/apex/tweet/search?fromUsers=a&fromUsers=b&top=true"
        );
    }

    #[test]
    fn null_and_empty_arrays_produce_no_entries() {
        let pairs = encode_query_map(&obj(json!({"a": null, "b": [], "c": 5})));
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].key, "c");
        assert_eq!(pairs[0].value, "5");
    }

    #[test]
    fn integral_floats_drop_the_fraction() {
        let pairs = encode_query_map(&obj(json!({"a": 100.0, "b": 2.5, "c": -3})));
        let values: Vec<&str> = pairs.iter().map(|p| p.value.as_str()).collect();
        assert_eq!(values, ["100", "2.5", "-3"]);
    }

    #[test]
    fn reserved_characters_are_percent_encoded() {
        let spec = builder()
            .build(
                "/apex/reply",
                Method::GET,
                RequestOptions {
                    query: Some(obj(json!({"text": "hi & bye=ok #1"}))),
                    ..RequestOptions::default()
                },
            )
            .expect("build");
        assert_eq!(
            spec.query_string().as_deref(),
            Some("text=hi%20%26%20bye%3Dok%20%231")
        );
    }

    #[test]
    fn post_body_gets_content_type_and_no_query() {
        let spec = builder()
            .build(
                "/apex/tweet",
                Method::POST,
                RequestOptions {
                    body: Some(json!({"username": "u", "text": "t"})),
                    ..RequestOptions::default()
                },
            )
            .expect("build");
        assert!(spec.query_string().is_none());
        assert_eq!(spec.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(spec.headers.get(AUTHORIZATION).unwrap(), "Bearer k");
    }

    #[test]
    fn body_on_get_and_query_on_post_are_rejected() {
        let b = builder();
        assert!(
            b.build(
                "/x",
                Method::GET,
                RequestOptions {
                    body: Some(json!({})),
                    ..RequestOptions::default()
                }
            )
            .is_err()
        );
        assert!(
            b.build(
                "/x",
                Method::POST,
                RequestOptions {
                    query: Some(obj(json!({"a": 1}))),
                    ..RequestOptions::default()
                }
            )
            .is_err()
        );
    }

    #[test]
    fn delete_without_options_has_no_content_type() {
        let spec = builder()
            .build("/apex/list/1", Method::DELETE, RequestOptions::default())
            .expect("build");
        assert!(spec.headers.get(CONTENT_TYPE).is_none());
        assert!(spec.body.is_none());
    }

    #[test]
    fn path_values_are_single_segments() {
        let p = expand_path("/apex/list/{listId}/member", &[("listId", "a/b c")]).expect("path");
        assert_eq!(p, "/apex/list/a%2Fb%20c/member");
        assert!(expand_path("/apex/list/{listId}", &[]).is_err());
    }

    #[test]
    fn dates_are_normalized() {
        assert_eq!(normalize_date("2025-07-25").as_deref(), Some("2025-07-25"));
        assert_eq!(
            normalize_date("2025-07-25T12:00:00+02:00").as_deref(),
            Some("2025-07-25T10:00:00.000Z")
        );
        assert_eq!(normalize_date("yesterday"), None);
        assert_eq!(normalize_date("2025-02-30"), None);
    }
}
