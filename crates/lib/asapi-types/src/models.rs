use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provider-issued handle for fetching a match's details.
///
/// The shape is owned by whichever provider produced it. Callers hand it back
/// to the same provider unchanged and never look inside.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct MatchToken(Value);

impl MatchToken {
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }
}

/// One ranked hit returned by a symbol provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Match {
    pub label: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub token: MatchToken,
}

impl Match {
    #[must_use]
    pub fn new(label: impl Into<String>, kind: Option<String>, token: MatchToken) -> Self {
        Self {
            label: label.into(),
            kind,
            token,
        }
    }
}

/// A match paired with its detail document, when one could be fetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnrichedMatch {
    pub label: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip)]
    pub token: MatchToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl EnrichedMatch {
    #[must_use]
    pub fn with_details(matched: Match, details: Option<String>) -> Self {
        let Match { label, kind, token } = matched;
        Self {
            label,
            kind,
            token,
            details,
        }
    }
}

/// Response body for a search. Field order is the serialized key order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchPayload {
    pub query: String,
    pub total: usize,
    pub returned: usize,
    pub truncated: bool,
    pub items: Vec<EnrichedMatch>,
}
