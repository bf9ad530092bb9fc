use asapi_types::models::{EnrichedMatch, Match, SearchPayload};
use serde_json::{Map, Value};
use tracing::{debug, error};

use super::enrich::enrich_matches;
use super::query::SearchQuery;
use super::{ControlError, SearchControlPlane, SearchOutcome};
use crate::provider::SymbolProvider;

/// Provider results cut down to the requested limit, in provider order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseResults {
    pub total: usize,
    pub items: Vec<Match>,
}

impl BaseResults {
    #[must_use]
    pub fn project(mut matches: Vec<Match>, limit: usize) -> Self {
        let total = matches.len();
        matches.truncate(limit);
        Self {
            total,
            items: matches,
        }
    }

    #[must_use]
    pub const fn returned(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn truncated(&self) -> bool {
        self.total > self.items.len()
    }

    /// Builds the response payload, attaching `details` by position.
    ///
    /// `details` may be shorter than the item list (or empty when enrichment
    /// was skipped); missing slots leave `details` absent.
    #[must_use]
    pub fn assemble(self, query: String, details: Vec<Option<String>>) -> SearchPayload {
        let returned = self.returned();
        let truncated = self.truncated();
        let mut details = details.into_iter();
        let items = self
            .items
            .into_iter()
            .map(|item| EnrichedMatch::with_details(item, details.next().flatten()))
            .collect();
        SearchPayload {
            query,
            total: self.total,
            returned,
            truncated,
            items,
        }
    }
}

impl<P: SymbolProvider> SearchControlPlane<P> {
    /// Runs the search-and-enrich pipeline over raw tool arguments.
    ///
    /// # Errors
    /// Returns `ControlError` if the readiness gate closes or the provider search fails.
    /// Per-item detail failures are absorbed and never surface here.
    pub async fn search_api(
        &self,
        arguments: &Map<String, Value>,
    ) -> Result<SearchOutcome, ControlError> {
        let Some(query) = SearchQuery::from_arguments(arguments) else {
            return Ok(SearchOutcome::NoQuery);
        };
        if !self.provider.has_data() {
            return Ok(SearchOutcome::DatabaseEmpty);
        }
        self.gate.wait().await?;

        let matches = self.provider.search(&query.text).await?;
        if matches.is_empty() {
            return Ok(SearchOutcome::NoResults { query: query.text });
        }

        let base = BaseResults::project(matches, query.limit);
        debug!(
            query = %query.text,
            total = base.total,
            returned = base.returned(),
            include_details = query.include_details,
            "search matched"
        );
        let details = if query.include_details {
            enrich_matches(self.provider.as_ref(), &base.items, &self.options).await
        } else {
            Vec::new()
        };

        Ok(SearchOutcome::Found(base.assemble(query.text, details)))
    }

    /// Runs the pipeline and renders its text response.
    ///
    /// Failures are logged and folded into a user-facing message, so this
    /// never fails.
    pub async fn search_api_text(&self, arguments: &Map<String, Value>) -> String {
        match self.search_api(arguments).await.and_then(SearchOutcome::into_text) {
            Ok(text) => text,
            Err(err) => {
                error!(error = %err, "search pipeline failed");
                format!("Error searching the AngelScript API: {err}")
            }
        }
    }
}
