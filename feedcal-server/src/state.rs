use std::sync::Arc;

use anyhow::{Context, Result};
use feedcal_core::config::FeedConfig;
use feedcal_core::error::FeedResult;
use feedcal_core::store::{EventStore, FileStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub config: Arc<FeedConfig>,
}

impl AppState {
    /// Open the file store under the configured data directory.
    pub fn new(config: FeedConfig) -> Result<Self> {
        let data_path = config.data_path();
        let store = FileStore::open(&data_path)
            .with_context(|| format!("Failed to open event store at {}", data_path.display()))?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    pub fn with_store(config: FeedConfig, store: Arc<dyn EventStore>) -> Self {
        AppState {
            store,
            config: Arc::new(config),
        }
    }

    /// Run a store operation on the blocking thread pool.
    pub async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn EventStore) -> FeedResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .context("Store task panicked")??;
        Ok(result)
    }
}
