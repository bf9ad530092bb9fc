use std::{error::Error, fmt, sync::Arc, time::Duration};

use asapi_types::models::SearchPayload;
use asapi_types::schema::DEFAULT_DETAIL_CONCURRENCY;

use crate::provider::ProviderError;
use crate::services::{GateError, ReadinessGate};

pub mod enrich;
pub mod query;
pub mod search;

#[cfg(test)]
mod testing;

pub use enrich::enrich_matches;
pub use query::SearchQuery;

pub const NO_QUERY_MESSAGE: &str =
    "No query provided. Pass a non-empty `query` to search the AngelScript API.";
pub const EMPTY_DATABASE_MESSAGE: &str = "The AngelScript type database is empty. \
    Wait for the API snapshot to finish loading (or start the server with one) and try again.";

#[derive(Debug)]
pub enum ControlError {
    Provider(ProviderError),
    Gate(GateError),
    Serialize(serde_json::Error),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(err) => write!(f, "{err}"),
            Self::Gate(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize search results: {err}"),
        }
    }
}

impl Error for ControlError {}

impl From<ProviderError> for ControlError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<GateError> for ControlError {
    fn from(err: GateError) -> Self {
        Self::Gate(err)
    }
}

impl From<serde_json::Error> for ControlError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err)
    }
}

/// Tuning for the detail enrichment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichOptions {
    pub concurrency: usize,
    pub detail_timeout: Option<Duration>,
}

impl EnrichOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            concurrency: DEFAULT_DETAIL_CONCURRENCY,
            detail_timeout: None,
        }
    }

    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    #[must_use]
    pub const fn with_detail_timeout(mut self, detail_timeout: Option<Duration>) -> Self {
        self.detail_timeout = detail_timeout;
        self
    }
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal result of one search invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    NoQuery,
    DatabaseEmpty,
    NoResults { query: String },
    Found(SearchPayload),
}

impl SearchOutcome {
    /// Renders the outcome as the text handed back to the caller.
    ///
    /// # Errors
    /// Returns `ControlError::Serialize` if the payload cannot be encoded.
    pub fn into_text(self) -> Result<String, ControlError> {
        match self {
            Self::NoQuery => Ok(NO_QUERY_MESSAGE.to_string()),
            Self::DatabaseEmpty => Ok(EMPTY_DATABASE_MESSAGE.to_string()),
            Self::NoResults { query } => Ok(format!("No results found for \"{query}\".")),
            Self::Found(payload) => Ok(serde_json::to_string_pretty(&payload)?),
        }
    }
}

/// Search pipeline bound to one provider and its readiness gate.
pub struct SearchControlPlane<P> {
    provider: Arc<P>,
    gate: ReadinessGate,
    options: EnrichOptions,
}

impl<P> Clone for SearchControlPlane<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            gate: self.gate.clone(),
            options: self.options,
        }
    }
}

impl<P> SearchControlPlane<P> {
    #[must_use]
    pub fn new(provider: P, gate: ReadinessGate) -> Self {
        Self::from_arc(Arc::new(provider), gate)
    }

    #[must_use]
    pub const fn from_arc(provider: Arc<P>, gate: ReadinessGate) -> Self {
        Self {
            provider,
            gate,
            options: EnrichOptions::new(),
        }
    }

    #[must_use]
    pub const fn with_options(mut self, options: EnrichOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    #[must_use]
    pub const fn gate(&self) -> &ReadinessGate {
        &self.gate
    }

    #[must_use]
    pub const fn options(&self) -> &EnrichOptions {
        &self.options
    }
}
