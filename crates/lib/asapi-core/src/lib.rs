//! Core services for asapi-mcp.
//!
//! This crate owns the search control plane (request validation, base search,
//! bounded detail enrichment, payload assembly), the readiness gate that
//! guards provider access, and the snapshot-backed symbol provider.

pub mod control;
pub mod provider;
pub mod services;
