use std::path::Path;
use std::sync::OnceLock;

use asapi_types::models::{Match, MatchToken};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{ProviderError, ProviderResult, SymbolProvider};

const TOKEN_ENTRY_KEY: &str = "entry";

/// One symbol in an API snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub label: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Parsed API snapshot. Entry order is the index order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotIndex {
    #[serde(default)]
    pub entries: Vec<SnapshotEntry>,
}

impl SnapshotIndex {
    #[must_use]
    pub const fn new(entries: Vec<SnapshotEntry>) -> Self {
        Self { entries }
    }

    /// Parses a snapshot from JSON text.
    ///
    /// # Errors
    /// Returns `ProviderError::Snapshot` if the text is not a valid snapshot document.
    pub fn from_json(json: &str) -> ProviderResult<Self> {
        serde_json::from_str(json).map_err(|err| ProviderError::Snapshot(err.to_string()))
    }

    /// Reads and parses a snapshot file.
    ///
    /// # Errors
    /// Returns `ProviderError::Snapshot` if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> ProviderResult<Self> {
        let display = path.display();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| ProviderError::Snapshot(format!("failed to read {display}: {err}")))?;
        serde_json::from_str(&json)
            .map_err(|err| ProviderError::Snapshot(format!("failed to parse {display}: {err}")))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ranks entries against `text`: exact, then prefix, then substring.
    #[must_use]
    pub fn rank(&self, text: &str) -> Vec<Match> {
        let needle = text.trim().to_lowercase();
        let terms: Vec<&str> = needle.split_whitespace().collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<(MatchTier, usize)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let label = entry.label.to_lowercase();
                if !terms.iter().all(|term| label.contains(term)) {
                    return None;
                }
                Some((MatchTier::of(&label, &needle), index))
            })
            .collect();
        ranked.sort_by_key(|(tier, _)| *tier);

        ranked
            .into_iter()
            .map(|(_, index)| {
                let entry = &self.entries[index];
                Match::new(
                    entry.label.clone(),
                    entry.kind.clone(),
                    MatchToken::new(json!({ TOKEN_ENTRY_KEY: index })),
                )
            })
            .collect()
    }

    fn detail(&self, token: &MatchToken) -> ProviderResult<String> {
        let index = token
            .as_value()
            .get(TOKEN_ENTRY_KEY)
            .and_then(Value::as_u64)
            .and_then(|index| usize::try_from(index).ok())
            .ok_or_else(|| ProviderError::InvalidToken(token.as_value().to_string()))?;
        let entry = self
            .entries
            .get(index)
            .ok_or_else(|| ProviderError::InvalidToken(token.as_value().to_string()))?;
        entry
            .details
            .clone()
            .ok_or_else(|| ProviderError::DetailUnavailable(entry.label.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchTier {
    Exact,
    Prefix,
    Contains,
}

impl MatchTier {
    fn of(label: &str, needle: &str) -> Self {
        let short = label.rsplit(['.', ':']).next().unwrap_or(label);
        if label == needle || short == needle {
            Self::Exact
        } else if label.starts_with(needle) || short.starts_with(needle) {
            Self::Prefix
        } else {
            Self::Contains
        }
    }
}

/// Symbol provider backed by an API snapshot installed once at startup.
#[derive(Debug, Default)]
pub struct SnapshotProvider {
    index: OnceLock<SnapshotIndex>,
}

impl SnapshotProvider {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            index: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn with_index(index: SnapshotIndex) -> Self {
        let provider = Self::new();
        let _ = provider.index.set(index);
        provider
    }

    /// Installs the snapshot. Only the first install takes effect.
    ///
    /// # Errors
    /// Returns `ProviderError::Snapshot` if a snapshot is already installed.
    pub fn install(&self, index: SnapshotIndex) -> ProviderResult<usize> {
        let count = index.len();
        self.index
            .set(index)
            .map_err(|_| ProviderError::Snapshot("snapshot already installed".to_string()))?;
        Ok(count)
    }

    fn index(&self) -> ProviderResult<&SnapshotIndex> {
        self.index
            .get()
            .ok_or_else(|| ProviderError::Unavailable("snapshot not loaded".to_string()))
    }
}

impl SymbolProvider for SnapshotProvider {
    fn has_data(&self) -> bool {
        self.index.get().is_some_and(|index| !index.is_empty())
    }

    async fn search(&self, text: &str) -> ProviderResult<Vec<Match>> {
        Ok(self.index()?.rank(text))
    }

    async fn fetch_detail(&self, token: &MatchToken) -> ProviderResult<String> {
        self.index()?.detail(token)
    }
}
