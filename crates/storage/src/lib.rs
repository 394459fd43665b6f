pub mod catalog_source;
pub mod file;
pub mod memory;

use std::sync::Arc;

use quotekit_core::config::{AppConfig, StorageBackend};
use quotekit_core::KeyValueStorage;

pub use catalog_source::{catalog_source_for, FileCatalogSource, HttpCatalogSource};
pub use file::FileStorage;
pub use memory::InMemoryStorage;

/// Storage backend selected by `[storage]` configuration.
pub fn storage_for(config: &AppConfig) -> Arc<dyn KeyValueStorage> {
    match config.storage.backend {
        StorageBackend::File => {
            Arc::new(FileStorage::new(&config.storage.dir).with_quota(config.storage.quota_bytes))
        }
        StorageBackend::Memory => {
            Arc::new(InMemoryStorage::default().with_quota(config.storage.quota_bytes))
        }
    }
}
