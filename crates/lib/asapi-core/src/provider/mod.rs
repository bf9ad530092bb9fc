//! Symbol provider interface and implementations.
//!
//! A provider owns the symbol index: it ranks matches for a query and resolves
//! the detail document behind each match token. The control plane only
//! orchestrates calls against this trait.

pub mod snapshot;

use std::{error::Error, fmt, future::Future, time::Duration};

use asapi_types::models::{Match, MatchToken};

pub use snapshot::{SnapshotEntry, SnapshotIndex, SnapshotProvider};

#[derive(Debug)]
pub enum ProviderError {
    Unavailable(String),
    InvalidToken(String),
    DetailUnavailable(String),
    Timeout(Duration),
    Snapshot(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "symbol provider unavailable: {message}"),
            Self::InvalidToken(token) => write!(f, "invalid match token: {token}"),
            Self::DetailUnavailable(label) => write!(f, "no details available for {label}"),
            Self::Timeout(limit) => {
                write!(f, "detail fetch timed out after {}ms", limit.as_millis())
            }
            Self::Snapshot(message) => write!(f, "snapshot error: {message}"),
        }
    }
}

impl Error for ProviderError {}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Source of ranked matches and their detail documents.
pub trait SymbolProvider: Send + Sync {
    /// Whether any symbol data is loaded at all.
    fn has_data(&self) -> bool;

    /// Returns every match for `text`, best first.
    fn search(&self, text: &str) -> impl Future<Output = ProviderResult<Vec<Match>>> + Send;

    /// Resolves the detail document behind a token previously returned by `search`.
    fn fetch_detail(
        &self,
        token: &MatchToken,
    ) -> impl Future<Output = ProviderResult<String>> + Send;
}
