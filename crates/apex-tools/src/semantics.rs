//! HTTP semantics helpers.
//!
//! Every Apex tool maps onto exactly one HTTP call, so its MCP `ToolAnnotations` follow from the
//! RFC 9110 semantics of the verb it uses.

use crate::catalog::HttpVerb;
use rmcp::model::ToolAnnotations;

/// Generate MCP tool annotations for a tool backed by `verb`.
///
/// `openWorldHint` is always `true`: every tool talks to the remote Apex API.
#[must_use]
pub fn annotations_for_verb(verb: HttpVerb, title: &str) -> ToolAnnotations {
    let (read_only, destructive, idempotent) = match verb {
        HttpVerb::Get => (true, false, true),
        HttpVerb::Post => (false, false, false),
        HttpVerb::Put | HttpVerb::Delete => (false, true, true),
    };

    ToolAnnotations {
        title: Some(title.to_string()),
        read_only_hint: Some(read_only),
        destructive_hint: Some(destructive),
        idempotent_hint: Some(idempotent),
        open_world_hint: Some(true),
    }
}
