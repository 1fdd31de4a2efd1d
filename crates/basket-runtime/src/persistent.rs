//! # Persistent Cart
//!
//! Bridges the pure [`Cart`] to a [`KeyValueStore`].
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Several tasks may hold a handle (UI, lifecycle listener)
//! 2. Only one mutation may run at a time, so each one publishes
//!    exactly one snapshot in order
//! 3. No `.await` happens while the lock is held
//!
//! Saves are serialized separately by an async `persist_lock`, held from
//! taking the snapshot until the store answers. A later `persist()` can
//! therefore never be overwritten by an earlier, slower one.
//!
//! ## Snapshot Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Restore / Persist                                    │
//! │                                                                         │
//! │  open(store, key)                                                      │
//! │     store.load(key) ──► None ─────────────────────► empty cart         │
//! │                     ──► Some(bytes) ─► decode ────► restored cart      │
//! │                     ──► Err / undecodable ─► warn!► empty cart         │
//! │                                                                         │
//! │  persist()                                                             │
//! │     persist_lock.lock().await                                          │
//! │     cart lock ► snapshot (Arc clone) ► cart unlock                     │
//! │     encode ► store.save(key, bytes) ──► Err? warn!, return false       │
//! │     persist_lock released                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use basket_core::{
    decode_items, encode_items, Cart, CartItem, CartProduct, Snapshot, Subscription,
    DEFAULT_FEED_CAPACITY,
};
use basket_store::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::PersistenceError;
use crate::lifecycle::{persist_on_resign, LifecycleSignal};

/// A cart that restores itself from, and persists itself to, a store.
///
/// Cheap to clone; clones share the same cart and store.
pub struct PersistentCart<P, S> {
    cart: Arc<Mutex<Cart<P>>>,
    store: Arc<S>,
    key: Arc<str>,
    /// Orders store writes; never taken while `cart` is locked.
    persist_lock: Arc<AsyncMutex<()>>,
}

impl<P, S> Clone for PersistentCart<P, S> {
    fn clone(&self) -> Self {
        PersistentCart {
            cart: Arc::clone(&self.cart),
            store: Arc::clone(&self.store),
            key: Arc::clone(&self.key),
            persist_lock: Arc::clone(&self.persist_lock),
        }
    }
}

impl<P, S> PersistentCart<P, S>
where
    P: CartProduct + Serialize + DeserializeOwned + Send + Sync + 'static,
    S: KeyValueStore + 'static,
{
    /// Opens the cart stored under `key`.
    ///
    /// A missing, unreadable or corrupt snapshot yields an empty cart;
    /// the failure is logged, never returned.
    pub async fn open(store: S, key: impl Into<String>) -> Self {
        Self::open_with_capacity(store, key, DEFAULT_FEED_CAPACITY).await
    }

    /// [`PersistentCart::open`] with a custom state feed buffer.
    pub async fn open_with_capacity(store: S, key: impl Into<String>, capacity: usize) -> Self {
        let key: Arc<str> = Arc::from(key.into());

        let items = match restore::<P, S>(&store, &key).await {
            Ok(Some(items)) => {
                info!(key = %key, items = items.len(), "Restored cart snapshot");
                items
            }
            Ok(None) => {
                debug!(key = %key, "No cart snapshot found, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to restore cart snapshot, starting empty");
                Vec::new()
            }
        };

        let cart = Cart::from_items_with_capacity(items, capacity).unwrap_or_else(|e| {
            warn!(key = %key, error = %e, "Restored items rejected, starting empty");
            Cart::with_feed_capacity(capacity)
        });

        PersistentCart {
            cart: Arc::new(Mutex::new(cart)),
            store: Arc::new(store),
            key,
            persist_lock: Arc::new(AsyncMutex::new(())),
        }
    }

    /// Opens the cart and subscribes it to `signal` in one step.
    pub async fn open_attached(
        store: S,
        key: impl Into<String>,
        signal: &LifecycleSignal,
    ) -> (Self, JoinHandle<()>) {
        let cart = Self::open(store, key).await;
        let listener = cart.attach(signal);
        (cart, listener)
    }

    /// Persists on every `WillResignActive` emitted by `signal`.
    ///
    /// The returned task ends when every clone of `signal` is dropped.
    pub fn attach(&self, signal: &LifecycleSignal) -> JoinHandle<()> {
        persist_on_resign(self.clone(), signal.subscribe())
    }

    /// Saves the current snapshot, reporting any failure.
    ///
    /// Concurrent calls are applied in the order they acquire the persist
    /// lock, each saving the state current at that point.
    pub async fn try_persist(&self) -> Result<(), PersistenceError> {
        let _guard = self.persist_lock.lock().await;

        let snapshot = self.snapshot();
        let bytes = encode_items(&snapshot).map_err(PersistenceError::Encode)?;

        self.store.save(&self.key, &bytes).await?;

        debug!(
            key = %self.key,
            items = snapshot.len(),
            bytes = bytes.len(),
            "Persisted cart snapshot"
        );
        Ok(())
    }

    /// Saves the current snapshot, best effort.
    ///
    /// Failures are logged at `warn` and leave whatever the store held
    /// before. Returns whether the save succeeded.
    pub async fn persist(&self) -> bool {
        match self.try_persist().await {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to persist cart snapshot");
                false
            }
        }
    }

    /// Deletes the persisted snapshot, best effort. The in-memory cart is
    /// left untouched.
    pub async fn discard_persisted(&self) -> bool {
        let _guard = self.persist_lock.lock().await;

        match self.store.remove(&self.key).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to discard cart snapshot");
                false
            }
        }
    }
}

impl<P: CartProduct, S> PersistentCart<P, S> {
    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = cart.with_cart(|cart| cart.amount());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart<P>) -> R,
    {
        f(&*self.lock())
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart.with_cart_mut(|cart| cart.add(product, 1))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart<P>) -> R,
    {
        f(&mut *self.lock())
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Snapshot<P> {
        self.lock().snapshot()
    }

    /// Subscribes to state changes. The current snapshot arrives first.
    pub fn subscribe(&self) -> Subscription<Snapshot<P>> {
        self.lock().subscribe()
    }

    /// Returns the store key this cart persists under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // Mutations build the next item vector before publishing, so a
    // panicking closure cannot leave a half-applied state behind.
    fn lock(&self) -> MutexGuard<'_, Cart<P>> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn restore<P, S>(store: &S, key: &str) -> Result<Option<Vec<CartItem<P>>>, PersistenceError>
where
    P: CartProduct + DeserializeOwned,
    S: KeyValueStore,
{
    let Some(bytes) = store.load(key).await? else {
        return Ok(None);
    };

    let items = decode_items(&bytes).map_err(PersistenceError::Decode)?;
    Ok(Some(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogProduct;
    use basket_store::MemoryStore;

    const KEY: &str = "test.cart";

    #[tokio::test]
    async fn test_open_without_snapshot_is_empty() {
        let cart: PersistentCart<CatalogProduct, _> =
            PersistentCart::open(MemoryStore::new(), KEY).await;

        assert!(cart.with_cart(|c| c.is_empty()));
        assert_eq!(cart.key(), KEY);
    }

    #[tokio::test]
    async fn test_persist_writes_snapshot() {
        let store = MemoryStore::new();
        let cart: PersistentCart<CatalogProduct, _> =
            PersistentCart::open(store.clone(), KEY).await;

        cart.with_cart_mut(|c| c.add(CatalogProduct::new("COKE", "Coke", 1.5), 2))
            .unwrap();
        assert!(cart.persist().await);

        let bytes = store.load(KEY).await.unwrap().unwrap();
        let items: Vec<CartItem<CatalogProduct>> = decode_items(&bytes).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_restores_empty() {
        let store = MemoryStore::new();
        store.save(KEY, b"{ definitely not a cart").await.unwrap();

        let cart: PersistentCart<CatalogProduct, _> = PersistentCart::open(store, KEY).await;

        assert_eq!(cart.with_cart(|c| c.count()), 0);
    }

    #[tokio::test]
    async fn test_mutations_through_clones_are_shared() {
        let cart: PersistentCart<CatalogProduct, _> =
            PersistentCart::open(MemoryStore::new(), KEY).await;
        let other = cart.clone();
        let mut sub = cart.subscribe();
        assert!(sub.try_recv().unwrap().is_empty());

        other
            .with_cart_mut(|c| c.add(CatalogProduct::new("TEA", "Tea", 2.0), 1))
            .unwrap();

        assert_eq!(cart.with_cart(|c| c.count_quantities()), 1);
        assert_eq!(sub.try_recv().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_discard_persisted() {
        let store = MemoryStore::new();
        let cart: PersistentCart<CatalogProduct, _> =
            PersistentCart::open(store.clone(), KEY).await;

        assert!(cart.persist().await);
        assert!(cart.discard_persisted().await);
        assert!(store.is_empty().await);
    }
}
