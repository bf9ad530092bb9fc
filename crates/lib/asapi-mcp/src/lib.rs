//! MCP server implementation for asapi-mcp.
//!
//! This crate wires the search control plane into an rmcp `ServerHandler`,
//! dispatches tool calls by name, and provides stdio and streamable HTTP
//! runners.

pub mod server;
pub mod tools;

use asapi_core::control::SearchControlPlane;
use asapi_core::provider::SymbolProvider;
use asapi_types::schema::TOOL_SEARCH_API;
use rmcp::model::{
    CallToolRequestParams,
    CallToolResult,
    JsonObject,
    ListToolsResult,
    PaginatedRequestParams,
    ServerCapabilities,
    ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler};
use tracing::{Instrument, info_span, warn};
use uuid::Uuid;

use crate::tools::ToolReply;

const SERVER_INSTRUCTIONS: &str = r"asapi-mcp searches the AngelScript API of Unreal Engine scripts.

Usage:
- Call `angelscript_searchApi` with a `query` (symbol name or fragment, e.g. `GetActorLocation`,
  `AActor`, or several words such as `actor location`; every word must appear in the symbol).
- `limit` caps the number of returned matches (1-1000, default 500). The response reports the full
  `total`, the `returned` count, and `truncated` when more matches exist than were returned.
- `includeDetails` (default true) attaches each match's declaration and documentation under
  `details`. Set it to false for a fast name-only listing.

Notes:
- Matches are ranked: exact names first, then prefixes, then other substrings.
- A match without `details` had no documentation available or its lookup failed.
- If the type database is still loading the tool says so; retry shortly.";

/// MCP server exposing the API search tool.
pub struct AngelscriptMcp<P> {
    control: SearchControlPlane<P>,
}

impl<P> Clone for AngelscriptMcp<P> {
    fn clone(&self) -> Self {
        Self {
            control: self.control.clone(),
        }
    }
}

impl<P> AngelscriptMcp<P> {
    /// Creates a server over a ready control plane.
    #[must_use]
    pub const fn new(control: SearchControlPlane<P>) -> Self {
        Self { control }
    }

    #[must_use]
    pub const fn control(&self) -> &SearchControlPlane<P> {
        &self.control
    }
}

impl<P: SymbolProvider> AngelscriptMcp<P> {
    /// Routes a tool call by name. Unknown names yield an error-flagged reply.
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> ToolReply {
        match name {
            TOOL_SEARCH_API => {
                let arguments = arguments.unwrap_or_default();
                let span = info_span!("tool_call", tool = name, invocation = %Uuid::new_v4());
                let text = self
                    .control
                    .search_api_text(&arguments)
                    .instrument(span)
                    .await;
                ToolReply::success(text)
            }
            _ => {
                warn!(tool = name, "unknown tool requested");
                ToolReply::error(format!("Unknown tool: {name}"))
            }
        }
    }
}

impl<P> ServerHandler for AngelscriptMcp<P>
where
    P: SymbolProvider + 'static,
{
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(tools::list()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(self.dispatch(&request.name, request.arguments).await.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use asapi_core::control::NO_QUERY_MESSAGE;
    use asapi_core::provider::{ProviderResult, SnapshotEntry, SnapshotIndex, SnapshotProvider};
    use asapi_core::services::ReadinessGate;
    use asapi_types::models::{Match, MatchToken, SearchPayload};
    use serde_json::{Value, json};

    /// Snapshot provider that counts how often it is contacted.
    struct CountingProvider {
        inner: SnapshotProvider,
        calls: AtomicUsize,
    }

    impl CountingProvider {
        fn new() -> Self {
            let entries = (0..30)
                .map(|index| SnapshotEntry {
                    label: format!("AActor::Method{index:02}"),
                    kind: Some("method".to_string()),
                    details: Some(format!("void Method{index:02}()")),
                })
                .collect();
            Self {
                inner: SnapshotProvider::with_index(SnapshotIndex::new(entries)),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SymbolProvider for CountingProvider {
        fn has_data(&self) -> bool {
            self.inner.has_data()
        }

        async fn search(&self, text: &str) -> ProviderResult<Vec<Match>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.search(text).await
        }

        async fn fetch_detail(&self, token: &MatchToken) -> ProviderResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_detail(token).await
        }
    }

    fn server() -> AngelscriptMcp<CountingProvider> {
        AngelscriptMcp::new(SearchControlPlane::new(
            CountingProvider::new(),
            ReadinessGate::resolved(),
        ))
    }

    fn object(value: Value) -> Option<JsonObject> {
        match value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    #[test]
    fn lists_the_search_tool() {
        let tools = tools::list();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, TOOL_SEARCH_API);
        assert!(tools[0].description.is_some());
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error_reply() {
        let server = server();
        let reply = server
            .dispatch("foo", object(json!({ "query": "AActor" })))
            .await;
        assert_eq!(reply, ToolReply::error("Unknown tool: foo"));
        assert_eq!(server.control().provider().calls(), 0);

        let result: CallToolResult = reply.into();
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn search_tool_returns_payload_text() {
        let server = server();
        let reply = server
            .dispatch(
                TOOL_SEARCH_API,
                object(json!({ "query": "method", "limit": 12.9 })),
            )
            .await;
        assert!(!reply.is_error);

        let payload: SearchPayload = serde_json::from_str(&reply.text).expect("json payload");
        assert_eq!(payload.total, 30);
        assert_eq!(payload.returned, 12);
        assert!(payload.truncated);
        assert_eq!(payload.items[0].label, "AActor::Method00");
        assert_eq!(payload.items[0].details.as_deref(), Some("void Method00()"));
        // one search plus one fetch per returned item
        assert_eq!(server.control().provider().calls(), 13);
    }

    #[tokio::test]
    async fn missing_arguments_short_circuit() {
        let server = server();
        let reply = server.dispatch(TOOL_SEARCH_API, None).await;
        assert_eq!(reply, ToolReply::success(NO_QUERY_MESSAGE));
        assert_eq!(server.control().provider().calls(), 0);

        let result: CallToolResult = reply.into();
        assert_ne!(result.is_error, Some(true));
    }

    #[test]
    fn advertises_tool_capability() {
        let info = server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.is_some());
    }
}
