//! Periodic reload of the cached validation rule catalog.
//!
//! Only spawned when the catalog source runs in cached mode. Each tick loads
//! the resource in full and publishes it; a failed load leaves the previous
//! snapshot in place.

use std::sync::Arc;
use std::time::Duration;

use devices_core::validation::source::CatalogSource;
use tokio_util::sync::CancellationToken;

/// Run the catalog refresh loop until `cancel` is triggered.
pub async fn run(source: Arc<CatalogSource>, every: Duration, cancel: CancellationToken) {
    tracing::info!(
        path = %source.path().display(),
        interval_secs = every.as_secs(),
        "Rule catalog refresh job started"
    );

    let mut interval = tokio::time::interval(every);
    // The first tick completes immediately; startup already loaded the catalog.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Rule catalog refresh job stopping");
                break;
            }
            _ = interval.tick() => {
                match source.reload().await {
                    Ok(catalog) => {
                        tracing::debug!(groups = catalog.len(), "Rule catalog refreshed");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Rule catalog refresh failed, keeping previous snapshot");
                    }
                }
            }
        }
    }
}
