use std::sync::{Arc, LazyLock};

use asapi_core::control::query::{ARG_INCLUDE_DETAILS, ARG_LIMIT, ARG_QUERY};
use asapi_types::schema::{DEFAULT_LIMIT, MAX_LIMIT, MIN_LIMIT, TOOL_SEARCH_API};
use rmcp::model::JsonObject;
use serde_json::{Value, json};

use super::ToolDescriptor;

const DESCRIPTION: &str = "Search the AngelScript API (classes, structs, methods, functions, \
properties) exposed to Unreal Engine scripts. Returns ranked matches as JSON with total, \
returned and truncated counts; when includeDetails is true each match carries its declaration \
and documentation.";

pub static SEARCH_API_TOOL: LazyLock<ToolDescriptor> = LazyLock::new(|| ToolDescriptor {
    name: TOOL_SEARCH_API,
    description: DESCRIPTION,
    parameter_schema: Arc::new(parameter_schema()),
});

fn parameter_schema() -> JsonObject {
    let schema = json!({
        "type": "object",
        "properties": {
            ARG_QUERY: {
                "type": "string",
                "description": "Symbol name or fragment, e.g. `GetActorLocation` or `actor loc`."
            },
            ARG_LIMIT: {
                "type": "number",
                "description": "Maximum number of matches to return.",
                "default": DEFAULT_LIMIT,
                "minimum": MIN_LIMIT,
                "maximum": MAX_LIMIT
            },
            ARG_INCLUDE_DETAILS: {
                "type": "boolean",
                "description": "Fetch the declaration and documentation for each returned match.",
                "default": true
            }
        },
        "required": [ARG_QUERY]
    });
    match schema {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}
