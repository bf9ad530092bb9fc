//! MCP tool descriptors and replies.
//!
//! The server exposes a single tool; its descriptor is built once and shared
//! by every server instance.

pub mod search_api;

use std::sync::{Arc, LazyLock};

use rmcp::model::{CallToolResult, Content, JsonObject, Tool};

pub use search_api::SEARCH_API_TOOL;

/// Static advertisement for one tool.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameter_schema: Arc<JsonObject>,
}

impl ToolDescriptor {
    #[must_use]
    pub fn to_tool(&self) -> Tool {
        Tool::new(self.name, self.description, self.parameter_schema.clone())
    }
}

/// Every tool the server advertises, in listing order.
#[must_use]
pub fn catalog() -> Vec<&'static ToolDescriptor> {
    vec![LazyLock::force(&SEARCH_API_TOOL)]
}

/// Tools advertised by `tools/list`.
#[must_use]
pub fn list() -> Vec<Tool> {
    catalog().into_iter().map(ToolDescriptor::to_tool).collect()
}

/// Text reply from a tool call, flagged when it reports a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReply {
    pub text: String,
    pub is_error: bool,
}

impl ToolReply {
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

impl From<ToolReply> for CallToolResult {
    fn from(reply: ToolReply) -> Self {
        let content = vec![Content::text(reply.text)];
        if reply.is_error {
            Self::error(content)
        } else {
            Self::success(content)
        }
    }
}
