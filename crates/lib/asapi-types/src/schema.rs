pub const TOOL_SEARCH_API: &str = "angelscript_searchApi";

pub const DEFAULT_LIMIT: usize = 500;
pub const MIN_LIMIT: usize = 1;
pub const MAX_LIMIT: usize = 1000;

/// Upper bound on detail fetches in flight for one search.
pub const DEFAULT_DETAIL_CONCURRENCY: usize = 10;
