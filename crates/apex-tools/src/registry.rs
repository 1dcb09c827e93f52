//! Tool registry: advertises the catalog and runs the single generic handler.

use crate::auth::AuthPolicy;
use crate::catalog::{BodyPolicy, CATALOG, ParamKind, ParamLocation, ParamSpec, ToolDescriptor};
use crate::config::ApexConfig;
use crate::error::{ApexToolsError, Result};
use crate::request::{RequestBuilder, RequestOptions, expand_path, normalize_date};
use crate::response::{error_result, normalize_response, success_result};
use rmcp::model::{CallToolResult, JsonObject, Tool};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::Arc;

/// Arguments that passed validation: declared, non-null, type-checked, dates normalized.
///
/// Empty optional query strings are dropped; empty body strings are kept so a caller can clear
/// a field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolInput {
    values: Map<String, Value>,
}

impl ToolInput {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

struct RegisteredTool {
    descriptor: &'static ToolDescriptor,
    input_schema: Arc<JsonObject>,
    validator: jsonschema::Validator,
}

struct Inner {
    config: ApexConfig,
    client: reqwest::Client,
    builder: RequestBuilder,
    tools: Vec<RegisteredTool>,
    index: HashMap<&'static str, usize>,
}

/// Immutable, cheaply cloneable set of tools bound to one credential set.
#[derive(Clone)]
pub struct ToolRegistry {
    inner: Arc<Inner>,
}

impl ToolRegistry {
    /// Registry over the full Apex catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ApexToolsError::Config`] if the credentials cannot be used as a header or the
    /// HTTP client cannot be built.
    pub fn new(config: ApexConfig) -> Result<Self> {
        Self::with_descriptors(config, CATALOG)
    }

    /// Registry over an arbitrary descriptor set.
    ///
    /// # Errors
    ///
    /// Returns [`ApexToolsError::Config`] on duplicate tool names or an uncompilable schema.
    pub fn with_descriptors(
        config: ApexConfig,
        descriptors: &'static [ToolDescriptor],
    ) -> Result<Self> {
        let mut tools = Vec::with_capacity(descriptors.len());
        let mut index = HashMap::with_capacity(descriptors.len());

        for descriptor in descriptors {
            if index.insert(descriptor.name, tools.len()).is_some() {
                return Err(ApexToolsError::Config(format!(
                    "Duplicate tool name '{}'",
                    descriptor.name
                )));
            }
            let input_schema = build_input_schema(descriptor.params);
            let validator =
                jsonschema::validator_for(&Value::Object(input_schema.clone())).map_err(|e| {
                    ApexToolsError::Config(format!(
                        "Invalid input schema for tool '{}': {e}",
                        descriptor.name
                    ))
                })?;
            tools.push(RegisteredTool {
                descriptor,
                input_schema: Arc::new(input_schema),
                validator,
            });
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("apex-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApexToolsError::Config(format!("Failed to build HTTP client: {e}")))?;
        let builder = RequestBuilder::new(AuthPolicy::new(&config)?);

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                client,
                builder,
                tools,
                index,
            }),
        })
    }

    /// The MCP `Tool`s in catalog order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.inner
            .tools
            .iter()
            .map(|t| {
                let d = t.descriptor;
                let mut tool = Tool::new(d.name, d.description, t.input_schema.clone());
                tool.annotations = Some(crate::semantics::annotations_for_verb(d.verb, d.title));
                tool
            })
            .collect()
    }

    /// Validate `arguments` for `name` without calling the remote API.
    ///
    /// # Errors
    ///
    /// Returns [`ApexToolsError::UnknownTool`] or [`ApexToolsError::Validation`].
    pub fn validate(&self, name: &str, arguments: Option<JsonObject>) -> Result<ToolInput> {
        let tool = self.find(name)?;
        validate_input(tool, arguments.unwrap_or_default())
    }

    /// Execute one tool call.
    ///
    /// Only unknown tools and invalid arguments are returned as `Err`; every failure after
    /// validation (remote status, network, unparsable body) comes back as an `isError` result.
    ///
    /// # Errors
    ///
    /// Returns [`ApexToolsError::UnknownTool`] or [`ApexToolsError::Validation`].
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult> {
        let tool = self.find(name)?;
        let input = validate_input(tool, arguments.unwrap_or_default())?;

        tracing::debug!(tool = name, "calling Apex API");
        match self.execute(tool.descriptor, &input).await {
            Ok(value) => Ok(success_result(&value)),
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "tool call failed");
                Ok(error_result(&e))
            }
        }
    }

    fn find(&self, name: &str) -> Result<&RegisteredTool> {
        self.inner
            .index
            .get(name)
            .map(|&i| &self.inner.tools[i])
            .ok_or_else(|| ApexToolsError::UnknownTool(name.to_string()))
    }

    async fn execute(&self, d: &'static ToolDescriptor, input: &ToolInput) -> Result<Value> {
        let mut path_values: Vec<(&str, String)> = Vec::new();
        let mut query = Map::new();
        let mut body = Map::new();

        for p in d.params {
            let Some(value) = input.get(p.name) else {
                continue;
            };
            match p.location {
                ParamLocation::Path => {
                    let s = value
                        .as_str()
                        .map_or_else(|| value.to_string(), str::to_string);
                    path_values.push((p.name, s));
                }
                ParamLocation::Query => {
                    query.insert(p.wire_name().to_string(), value.clone());
                }
                ParamLocation::Body => {
                    body.insert(p.wire_name().to_string(), value.clone());
                }
            }
        }

        if let BodyPolicy::SkipWhenEmpty { message } = d.body_policy
            && body.is_empty()
        {
            tracing::debug!(tool = d.name, "nothing to update; skipping request");
            return Ok(json!({ "message": message }));
        }

        let path_refs: Vec<(&str, &str)> =
            path_values.iter().map(|(n, v)| (*n, v.as_str())).collect();
        let path = expand_path(d.path, &path_refs)?;

        let options = RequestOptions {
            query: (!d.verb.sends_body()).then_some(query),
            body: d.verb.sends_body().then(|| Value::Object(body)),
            extra_headers: d
                .extra_headers
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        };
        let spec = self.inner.builder.build(&path, d.verb.method(), options)?;
        let url = spec.url(self.inner.config.api_url())?;

        let mut request = self
            .inner
            .client
            .request(spec.method.clone(), url)
            .headers(spec.headers.clone());
        if let Some(body) = &spec.body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| ApexToolsError::Transport(format!("failed to encode body: {e}")))?;
            request = request.body(bytes);
        }

        let response = request.send().await?;
        tracing::debug!(tool = d.name, status = %response.status(), "Apex API responded");
        normalize_response(response).await
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("config", &self.inner.config)
            .field("tools", &self.inner.tools.len())
            .finish_non_exhaustive()
    }
}

fn build_input_schema(params: &[ParamSpec]) -> JsonObject {
    let mut properties = Map::new();
    let mut required: Vec<Value> = Vec::new();

    for p in params {
        let mut prop = match p.kind {
            ParamKind::String => json!({ "type": "string" }),
            ParamKind::Number => json!({ "type": "number" }),
            ParamKind::Boolean => json!({ "type": "boolean" }),
            ParamKind::StringArray => json!({ "type": "array", "items": { "type": "string" } }),
            ParamKind::Date => json!({ "type": "string" }),
        };
        if let Some(obj) = prop.as_object_mut() {
            if let Some(v) = p.min_length {
                obj.insert("minLength".to_string(), json!(v));
            }
            if let Some(v) = p.max_length {
                obj.insert("maxLength".to_string(), json!(v));
            }
            if let Some(v) = p.minimum {
                obj.insert("minimum".to_string(), json!(v));
            }
            if let Some(v) = p.maximum {
                obj.insert("maximum".to_string(), json!(v));
            }
            obj.insert("description".to_string(), json!(p.description));
        }
        properties.insert(p.name.to_string(), prop);
        if p.required {
            required.push(json!(p.name));
        }
    }

    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), Value::Array(required));
    }
    schema
}

fn validate_input(tool: &RegisteredTool, arguments: JsonObject) -> Result<ToolInput> {
    let d = tool.descriptor;
    let mut values = Map::new();

    for (key, value) in arguments {
        let Some(param) = d.params.iter().find(|p| p.name == key) else {
            let known: Vec<&str> = d.params.iter().map(|p| p.name).collect();
            let suggestion = find_similar(&key, &known);
            tracing::debug!(
                tool = d.name,
                parameter = %key,
                suggestion = suggestion.unwrap_or(""),
                "dropping undeclared argument"
            );
            continue;
        };
        if value.is_null() {
            continue;
        }
        if param.location == ParamLocation::Query
            && !param.required
            && value.as_str().is_some_and(str::is_empty)
        {
            continue;
        }
        values.insert(key, value);
    }

    let mut violations: Vec<Value> = Vec::new();

    for p in d.params.iter().filter(|p| p.required) {
        if !values.contains_key(p.name) {
            violations.push(json!({
                "type": "missing-required-parameter",
                "parameter": p.name,
            }));
        }
    }

    let instance = Value::Object(values.clone());
    for e in tool.validator.iter_errors(&instance) {
        if matches!(
            e.kind(),
            jsonschema::error::ValidationErrorKind::Required { .. }
        ) {
            continue;
        }
        violations.push(json!({
            "type": "constraint-violation",
            "message": e.to_string(),
            "instancePath": e.instance_path().to_string(),
        }));
    }

    for p in d.params.iter().filter(|p| p.kind == ParamKind::Date) {
        let Some(raw) = values.get(p.name).and_then(Value::as_str) else {
            continue;
        };
        match normalize_date(raw) {
            Some(normalized) => {
                values.insert(p.name.to_string(), Value::String(normalized));
            }
            None => violations.push(json!({
                "type": "constraint-violation",
                "message": format!("\"{raw}\" is not an ISO-8601 date"),
                "instancePath": format!("/{}", p.name),
            })),
        }
    }

    if violations.is_empty() {
        return Ok(ToolInput { values });
    }

    let message = if let Some(p) = violations
        .iter()
        .find(|v| v["type"] == "missing-required-parameter")
        .and_then(|v| v["parameter"].as_str())
    {
        format!("missing required parameter '{p}'")
    } else if let [only] = violations.as_slice()
        && let Some(m) = only["message"].as_str()
    {
        m.to_string()
    } else {
        format!("validation failed with {} error(s)", violations.len())
    };
    Err(ApexToolsError::validation(message, violations))
}

fn find_similar<'a>(unknown: &str, known: &[&'a str]) -> Option<&'a str> {
    known
        .iter()
        .map(|k| (strsim::jaro(unknown, k), *k))
        .filter(|(score, _)| *score > 0.7)
        .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, k)| k)
}
