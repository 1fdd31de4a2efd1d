//! # Key-Value Store Contract
//!
//! The persistence collaborator the cart saves its snapshot into.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    KeyValueStore                                        │
//! │                                                                         │
//! │  save(key, bytes)  → Ok(()) | Err(StoreError)                          │
//! │  load(key)         → Ok(Some(bytes)) | Ok(None) | Err(StoreError)      │
//! │  remove(key)       → Ok(()) (missing key is not an error)              │
//! │                                                                         │
//! │  Implementations:                                                      │
//! │  • SqliteStore  - kv_snapshots table, survives restarts                │
//! │  • MemoryStore  - HashMap, for tests and ephemeral hosts               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreResult;

/// A byte store keyed by string.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Stores `bytes` under `key`, replacing any previous value.
    async fn save(&self, key: &str, bytes: &[u8]) -> StoreResult<()>;

    /// Loads the bytes stored under `key`, or `None` if absent.
    async fn load(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Deletes `key`. Missing keys are ignored.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn save(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        (**self).save(key, bytes).await
    }

    async fn load(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).load(key).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key).await
    }
}
