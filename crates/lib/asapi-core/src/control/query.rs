use asapi_types::schema::{DEFAULT_LIMIT, MAX_LIMIT, MIN_LIMIT};
use serde_json::{Map, Value};

pub const ARG_QUERY: &str = "query";
pub const ARG_LIMIT: &str = "limit";
pub const ARG_INCLUDE_DETAILS: &str = "includeDetails";

/// Normalized search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub limit: usize,
    pub include_details: bool,
}

impl SearchQuery {
    /// Coerces raw tool arguments into a query.
    ///
    /// Returns `None` when there is nothing to search for. Malformed `limit`
    /// and `includeDetails` values fall back to their defaults.
    #[must_use]
    pub fn from_arguments(arguments: &Map<String, Value>) -> Option<Self> {
        let text = arguments
            .get(ARG_QUERY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())?;

        Some(Self {
            text: text.to_string(),
            limit: normalize_limit(arguments.get(ARG_LIMIT)),
            include_details: !matches!(
                arguments.get(ARG_INCLUDE_DETAILS),
                Some(Value::Bool(false))
            ),
        })
    }
}

/// Floors numeric limits and clamps them into range; anything else gets the default.
#[must_use]
pub fn normalize_limit(value: Option<&Value>) -> usize {
    value.and_then(Value::as_f64).map_or(DEFAULT_LIMIT, clamp_limit)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_limit(value: f64) -> usize {
    let floored = value.floor();
    if floored.is_nan() || floored <= 1.0 {
        MIN_LIMIT
    } else if floored >= 1000.0 {
        MAX_LIMIT
    } else {
        floored as usize
    }
}
