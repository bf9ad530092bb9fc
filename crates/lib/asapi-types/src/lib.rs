//! Search models and schema constants for asapi-mcp.
//!
//! This crate defines the data model shared by symbol providers, the search
//! control plane, and the MCP surface.

pub mod models;
pub mod schema;

pub use models::*;
