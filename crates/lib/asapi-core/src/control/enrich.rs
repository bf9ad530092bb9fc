//! Bounded, order-preserving detail enrichment.
//!
//! A fixed pool of workers pulls match indices from a shared cursor. Each
//! worker keeps at most one fetch outstanding, so the pool size is the
//! in-flight bound, and a worker picks up the next index as soon as its
//! current fetch settles. All workers are polled inside the calling task.
//! Results are placed by index once every worker has drained the cursor, so
//! completion order never leaks into the output.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use asapi_types::models::Match;
use futures::future::join_all;
use tracing::{debug, warn};

use super::EnrichOptions;
use crate::provider::{ProviderError, ProviderResult, SymbolProvider};

/// Fetches details for every match, returning one slot per match in input order.
///
/// A slot is `None` when its fetch failed; failures are logged and never
/// affect other slots.
pub async fn enrich_matches<P: SymbolProvider>(
    provider: &P,
    matches: &[Match],
    options: &EnrichOptions,
) -> Vec<Option<String>> {
    let mut details = vec![None; matches.len()];
    if matches.is_empty() {
        return details;
    }

    let worker_count = options.concurrency.clamp(1, matches.len());
    let cursor = &AtomicUsize::new(0);
    let timeout = options.detail_timeout;

    let workers = (0..worker_count).map(move |_| async move {
        let mut settled = Vec::new();
        loop {
            let index = cursor.fetch_add(1, Ordering::Relaxed);
            let Some(item) = matches.get(index) else {
                break;
            };
            settled.push((index, fetch_one(provider, item, timeout).await));
        }
        settled
    });

    let mut failed = 0usize;
    for (index, detail) in join_all(workers).await.into_iter().flatten() {
        if detail.is_none() {
            failed += 1;
        }
        details[index] = detail;
    }

    debug!(
        attempted = matches.len(),
        failed,
        workers = worker_count,
        "detail enrichment settled"
    );
    details
}

async fn fetch_one<P: SymbolProvider>(
    provider: &P,
    item: &Match,
    timeout: Option<Duration>,
) -> Option<String> {
    match fetch_with_timeout(provider, item, timeout).await {
        Ok(detail) => Some(detail),
        Err(err) => {
            warn!(label = %item.label, error = %err, "failed to fetch details");
            None
        }
    }
}

async fn fetch_with_timeout<P: SymbolProvider>(
    provider: &P,
    item: &Match,
    timeout: Option<Duration>,
) -> ProviderResult<String> {
    let Some(limit) = timeout else {
        return provider.fetch_detail(&item.token).await;
    };
    tokio::time::timeout(limit, provider.fetch_detail(&item.token))
        .await
        .unwrap_or(Err(ProviderError::Timeout(limit)))
}
