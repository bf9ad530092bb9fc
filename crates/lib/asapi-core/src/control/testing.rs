use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use asapi_types::models::{Match, MatchToken};
use serde_json::json;

use crate::provider::{ProviderError, ProviderResult, SymbolProvider};

/// Deterministic per-index delay in `1..=13` ms that scrambles completion order.
pub fn jitter(index: usize) -> Duration {
    let millis = (index * 7919 + 3) % 13 + 1;
    Duration::from_millis(u64::try_from(millis).unwrap_or(1))
}

/// Provider double that serves `count` synthetic matches and records every call.
pub struct RecordingProvider {
    count: usize,
    has_data: bool,
    fail_search: bool,
    failing: Option<usize>,
    stalling: Option<usize>,
    delay: Option<fn(usize) -> Duration>,
    search_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    fetched: Mutex<Vec<usize>>,
}

impl RecordingProvider {
    pub const fn new(count: usize) -> Self {
        Self {
            count,
            has_data: true,
            fail_search: false,
            failing: None,
            stalling: None,
            delay: None,
            search_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            fetched: Mutex::new(Vec::new()),
        }
    }

    pub const fn without_data(mut self) -> Self {
        self.has_data = false;
        self
    }

    pub const fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub const fn failing_at(mut self, index: usize) -> Self {
        self.failing = Some(index);
        self
    }

    pub const fn stalling_at(mut self, index: usize) -> Self {
        self.stalling = Some(index);
        self
    }

    pub const fn with_delay(mut self, delay: fn(usize) -> Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn label_for(index: usize) -> String {
        format!("Symbol{index:03}")
    }

    pub fn detail_for(label: &str) -> String {
        format!("details of {label}")
    }

    pub fn matches(&self) -> Vec<Match> {
        (0..self.count)
            .map(|index| {
                Match::new(
                    Self::label_for(index),
                    Some("method".to_string()),
                    MatchToken::new(json!(index)),
                )
            })
            .collect()
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn fetched_tokens(&self) -> Vec<usize> {
        self.fetched.lock().map(|fetched| fetched.clone()).unwrap_or_default()
    }
}

impl SymbolProvider for RecordingProvider {
    fn has_data(&self) -> bool {
        self.has_data
    }

    async fn search(&self, _text: &str) -> ProviderResult<Vec<Match>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_search {
            return Err(ProviderError::Unavailable("index offline".to_string()));
        }
        Ok(self.matches())
    }

    async fn fetch_detail(&self, token: &MatchToken) -> ProviderResult<String> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let index = token
            .as_value()
            .as_u64()
            .and_then(|index| usize::try_from(index).ok())
            .ok_or_else(|| ProviderError::InvalidToken(token.as_value().to_string()))?;
        if let Ok(mut fetched) = self.fetched.lock() {
            fetched.push(index);
        }

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        if self.stalling == Some(index) {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay(index)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing == Some(index) {
            return Err(ProviderError::DetailUnavailable(Self::label_for(index)));
        }
        Ok(Self::detail_for(&Self::label_for(index)))
    }
}
