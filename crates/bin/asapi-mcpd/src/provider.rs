use std::path::Path;
use std::sync::Arc;

use asapi_core::control::{EnrichOptions, SearchControlPlane};
use asapi_core::provider::{ProviderResult, SnapshotIndex, SnapshotProvider};
use asapi_core::services::readiness;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::AsapiConfig;

/// Builds the control plane and starts loading the snapshot in the background.
///
/// The gate opens once loading settles. A failed load leaves the index empty.
pub fn build_control(
    config: &AsapiConfig,
) -> (SearchControlPlane<SnapshotProvider>, JoinHandle<()>) {
    let provider = Arc::new(SnapshotProvider::new());
    let (signal, gate) = readiness();
    let options = EnrichOptions::new()
        .with_concurrency(config.detail_concurrency)
        .with_detail_timeout(config.detail_timeout);
    let control = SearchControlPlane::from_arc(provider.clone(), gate).with_options(options);

    let snapshot_path = config.snapshot_path.clone();
    let loader = tokio::spawn(async move {
        load_snapshot(&provider, snapshot_path.as_deref()).await;
        signal.mark_ready();
    });
    (control, loader)
}

async fn load_snapshot(provider: &SnapshotProvider, path: Option<&Path>) {
    let Some(path) = path else {
        warn!("no API snapshot configured; searches will report an empty database");
        return;
    };
    match install_snapshot(provider, path).await {
        Ok(entries) => info!(path = %path.display(), entries, "API snapshot loaded"),
        Err(err) => error!(path = %path.display(), error = %err, "API snapshot not loaded"),
    }
}

async fn install_snapshot(provider: &SnapshotProvider, path: &Path) -> ProviderResult<usize> {
    let index = SnapshotIndex::load(path).await?;
    provider.install(index)
}
