pub mod api;
pub mod config;
pub mod storage;

use crate::config::{StoreBackend, StoreConfig};
use crate::storage::{CaseStore, DynamoStore, InMemoryStore};
use std::sync::Arc;

/// Build the configured case store.
pub async fn build_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn CaseStore>> {
    let store: Arc<dyn CaseStore> = match config.backend {
        StoreBackend::Dynamodb => Arc::new(DynamoStore::connect(config).await),
        StoreBackend::Memory => match &config.seed_path {
            Some(path) => Arc::new(InMemoryStore::from_json_file(path)?),
            None => Arc::new(InMemoryStore::default()),
        },
    };
    Ok(store)
}
