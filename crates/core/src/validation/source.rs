//! Where the validator gets its rule catalog from.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use super::catalog::{load_catalog, CatalogError, RuleCatalog};

/// How often the catalog resource is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadMode {
    /// Read the resource on every validation.
    PerRequest,
    /// Serve the last published snapshot; refresh through [`CatalogSource::reload`].
    Cached,
}

impl FromStr for ReloadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_request" | "per-request" => Ok(Self::PerRequest),
            "cached" => Ok(Self::Cached),
            other => Err(format!(
                "unknown reload mode '{other}', expected 'per_request' or 'cached'"
            )),
        }
    }
}

/// Owner of the published rule catalog snapshot.
///
/// A snapshot is only published after a load completed, so readers always
/// see either the previous catalog or the new one in full. Every load takes a
/// generation number when it starts; a load never replaces a snapshot from a
/// later-started load.
pub struct CatalogSource {
    path: PathBuf,
    timeout: Duration,
    mode: ReloadMode,
    generation: AtomicU64,
    published: RwLock<Option<Published>>,
}

struct Published {
    generation: u64,
    catalog: Arc<RuleCatalog>,
}

impl CatalogSource {
    pub fn new(path: impl Into<PathBuf>, timeout: Duration, mode: ReloadMode) -> Self {
        Self {
            path: path.into(),
            timeout,
            mode,
            generation: AtomicU64::new(0),
            published: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> ReloadMode {
        self.mode
    }

    /// The catalog to validate the current request against.
    ///
    /// In cached mode a load is attempted only while nothing has been
    /// published yet.
    pub async fn snapshot(&self) -> Result<Arc<RuleCatalog>, CatalogError> {
        if self.mode == ReloadMode::Cached {
            if let Some(catalog) = self.current().await {
                return Ok(catalog);
            }
        }
        self.reload().await
    }

    /// Load the resource and publish the result.
    ///
    /// On failure the previously published snapshot stays in place. The
    /// returned catalog is always the one this call loaded, even when a newer
    /// load already published its own.
    pub async fn reload(&self) -> Result<Arc<RuleCatalog>, CatalogError> {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let catalog = Arc::new(load_catalog(&self.path, self.timeout).await?);
        self.publish(generation, Arc::clone(&catalog)).await;
        Ok(catalog)
    }

    async fn publish(&self, generation: u64, catalog: Arc<RuleCatalog>) {
        let mut published = self.published.write().await;
        if published
            .as_ref()
            .is_some_and(|current| current.generation > generation)
        {
            tracing::debug!(generation, "Discarding rule catalog superseded by a later load");
            return;
        }
        *published = Some(Published {
            generation,
            catalog,
        });
    }

    /// Last published snapshot, if any.
    pub async fn current(&self) -> Option<Arc<RuleCatalog>> {
        self.published
            .read()
            .await
            .as_ref()
            .map(|published| Arc::clone(&published.catalog))
    }
}
