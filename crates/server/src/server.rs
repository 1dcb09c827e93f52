//! rmcp `ServerHandler` over the Apex [`ToolRegistry`].

use apex_mcp_tools::{ApexToolsError, ToolRegistry};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, ErrorData, Implementation, ListPromptsResult,
    ListResourcesResult, ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use serde_json::json;

const INSTRUCTIONS: &str = "Tools for the Apex API: read and search tweets, generate and post \
replies, and manage X/Twitter lists. Every tool performs exactly one authenticated API call.";

/// One MCP server instance. Cheap to clone; the HTTP transport builds one per request.
#[derive(Clone, Debug)]
pub struct ApexServer {
    registry: ToolRegistry,
}

impl ApexServer {
    #[must_use]
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }
}

impl ServerHandler for ApexServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: "apex-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: self.registry.list_tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.registry
            .call_tool(&request.name, request.arguments)
            .await
            .map_err(|e| {
                tracing::debug!(tool = %request.name, error = %e, "rejected tool call");
                to_error_data(e)
            })
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult::default())
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, ErrorData> {
        Ok(ListPromptsResult::default())
    }
}

/// Map a registry rejection onto a JSON-RPC error.
///
/// The registry only rejects calls it cannot dispatch; remote and transport failures arrive
/// as `isError` results instead.
fn to_error_data(e: ApexToolsError) -> ErrorData {
    let message = e.to_string();
    match e {
        ApexToolsError::Validation { violations, .. } => ErrorData::invalid_params(
            message,
            Some(json!({
                "type": "validation-errors",
                "violations": violations,
            })),
        ),
        _ => ErrorData::invalid_params(message, None),
    }
}
