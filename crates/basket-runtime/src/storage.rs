//! Opens the snapshot store named by [`StorageSettings`].

use std::sync::Arc;

use basket_store::{KeyValueStore, MemoryStore, SqliteConfig, SqliteStore};
use tracing::info;

use crate::config::{StorageBackend, StorageSettings};
use crate::error::RuntimeResult;

/// Shared, backend-erased snapshot store.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Opens the configured backend. SQLite databases are migrated on open.
pub async fn open_store(settings: &StorageSettings) -> RuntimeResult<SharedStore> {
    match settings.backend {
        StorageBackend::Sqlite => {
            let path = settings.database_path()?;
            info!(?path, "Opening SQLite snapshot store");

            let config = SqliteConfig::new(path).max_connections(settings.max_connections);
            let store = SqliteStore::open(config).await?;
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            info!("Using in-memory snapshot store, cart will not survive restarts");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
