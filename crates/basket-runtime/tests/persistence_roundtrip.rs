//! End-to-end cart persistence through the real store backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use basket_core::{decode_items, encode_items, CartError, CartItem, CART_SNAPSHOT_KEY};
use basket_runtime::{
    open_store, CatalogProduct, LifecycleEvent, LifecycleSignal, PersistentCart, StorageBackend,
    StorageSettings,
};
use basket_store::{KeyValueStore, MemoryStore, SqliteConfig, SqliteStore, StoreError, StoreResult};
use tokio::sync::Notify;

fn apple() -> CatalogProduct {
    CatalogProduct::new("APL", "Apple", 0.5)
}

fn bread() -> CatalogProduct {
    CatalogProduct::new("BRD", "Bread", 2.25)
}

fn milk() -> CatalogProduct {
    CatalogProduct::new("MLK", "Milk", 1.2)
}

/// Store whose every operation fails.
struct BrokenStore {
    attempts: AtomicUsize,
}

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn save(&self, _key: &str, _bytes: &[u8]) -> StoreResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Internal("disk on fire".into()))
    }

    async fn load(&self, _key: &str) -> StoreResult<Option<Vec<u8>>> {
        Err(StoreError::Internal("disk on fire".into()))
    }

    async fn remove(&self, _key: &str) -> StoreResult<()> {
        Err(StoreError::Internal("disk on fire".into()))
    }
}

/// Store whose first save parks until the test releases it.
#[derive(Default)]
struct GatedStore {
    inner: MemoryStore,
    saves: AtomicUsize,
    first_save_started: Notify,
    release_first_save: Notify,
}

#[async_trait]
impl KeyValueStore for GatedStore {
    async fn save(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        if self.saves.fetch_add(1, Ordering::SeqCst) == 0 {
            self.first_save_started.notify_one();
            self.release_first_save.notified().await;
        }
        self.inner.save(key, bytes).await
    }

    async fn load(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.inner.load(key).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(key).await
    }
}

fn quantities(items: &[CartItem<CatalogProduct>]) -> Vec<(String, u32)> {
    items
        .iter()
        .map(|item| (item.product.sku.clone(), item.quantity))
        .collect()
}

#[tokio::test]
async fn test_sqlite_roundtrip_preserves_order_and_quantities() {
    let store = Arc::new(SqliteStore::open(SqliteConfig::in_memory()).await.unwrap());

    let cart: PersistentCart<CatalogProduct, _> =
        PersistentCart::open(Arc::clone(&store), CART_SNAPSHOT_KEY).await;
    cart.with_cart_mut(|c| -> Result<(), CartError> {
        c.add(bread(), 1)?;
        c.add(apple(), 4)?;
        c.add(milk(), 2)?;
        c.decrement(&apple());
        Ok(())
    })
    .unwrap();
    assert!(cart.persist().await);

    let restored: PersistentCart<CatalogProduct, _> =
        PersistentCart::open(store, CART_SNAPSHOT_KEY).await;

    restored.with_cart(|c| {
        assert_eq!(
            quantities(c.items()),
            vec![("BRD".into(), 1), ("APL".into(), 3), ("MLK".into(), 2)]
        );
        assert_eq!(c.count_quantities(), 6);
        assert!((c.amount() - (2.25 + 1.5 + 2.4)).abs() < 1e-9);
    });
}

#[tokio::test]
async fn test_sqlite_file_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let settings = StorageSettings {
        database_path: Some(dir.path().join("basket.db")),
        ..StorageSettings::default()
    };

    {
        let store = open_store(&settings).await.unwrap();
        let cart: PersistentCart<CatalogProduct, _> =
            PersistentCart::open(store, settings.snapshot_key.clone()).await;
        cart.with_cart_mut(|c| c.add(milk(), 3)).unwrap();
        assert!(cart.persist().await);
    }

    let store = open_store(&settings).await.unwrap();
    let cart: PersistentCart<CatalogProduct, _> =
        PersistentCart::open(store, settings.snapshot_key.clone()).await;
    assert_eq!(cart.with_cart(|c| c.quantity_of(&milk())), 3);
}

#[tokio::test]
async fn test_memory_backend_roundtrip() {
    let settings = StorageSettings {
        backend: StorageBackend::Memory,
        ..StorageSettings::default()
    };
    let store = open_store(&settings).await.unwrap();

    let cart: PersistentCart<CatalogProduct, _> =
        PersistentCart::open(Arc::clone(&store), "k").await;
    cart.with_cart_mut(|c| c.add_one(apple())).unwrap();
    assert!(cart.persist().await);

    let restored: PersistentCart<CatalogProduct, _> = PersistentCart::open(store, "k").await;
    assert_eq!(restored.with_cart(|c| c.count()), 1);
}

#[tokio::test]
async fn test_removing_everything_persists_empty_cart() {
    let store = MemoryStore::new();
    let cart: PersistentCart<CatalogProduct, _> = PersistentCart::open(store.clone(), "k").await;

    cart.with_cart_mut(|c| c.add(bread(), 2)).unwrap();
    assert!(cart.persist().await);

    cart.with_cart_mut(|c| c.clean());
    assert!(cart.persist().await);

    let restored: PersistentCart<CatalogProduct, _> = PersistentCart::open(store, "k").await;
    assert!(restored.with_cart(|c| c.is_empty()));
}

#[tokio::test]
async fn test_failing_store_is_survivable() {
    let store = BrokenStore {
        attempts: AtomicUsize::new(0),
    };

    let cart: PersistentCart<CatalogProduct, _> = PersistentCart::open(store, "k").await;
    assert!(cart.with_cart(|c| c.is_empty()));

    cart.with_cart_mut(|c| c.add(apple(), 1)).unwrap();
    assert!(!cart.persist().await);
    assert!(cart.try_persist().await.is_err());
    assert!(!cart.discard_persisted().await);

    assert_eq!(cart.store().attempts.load(Ordering::SeqCst), 2);
    assert_eq!(cart.with_cart(|c| c.count_quantities()), 1);
}

#[tokio::test]
async fn test_overlapping_persists_keep_latest_snapshot() {
    let cart: PersistentCart<CatalogProduct, _> =
        PersistentCart::open(GatedStore::default(), "k").await;
    cart.with_cart_mut(|c| c.add(apple(), 1)).unwrap();

    let slow = tokio::spawn({
        let cart = cart.clone();
        async move { cart.persist().await }
    });
    cart.store().first_save_started.notified().await;

    cart.with_cart_mut(|c| c.add(apple(), 4)).unwrap();
    let fast = tokio::spawn({
        let cart = cart.clone();
        async move { cart.persist().await }
    });
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }

    cart.store().release_first_save.notify_one();
    assert!(slow.await.unwrap());
    assert!(fast.await.unwrap());

    let bytes = cart.store().inner.load("k").await.unwrap().unwrap();
    let items: Vec<CartItem<CatalogProduct>> = decode_items(&bytes).unwrap();
    assert_eq!(quantities(&items), vec![("APL".into(), 5)]);
    assert_eq!(cart.store().saves.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_duplicate_products_in_snapshot_restore_empty() {
    let store = MemoryStore::new();
    let items = vec![CartItem::new(apple(), 1), CartItem::new(apple(), 2)];
    store.save("k", &encode_items(&items).unwrap()).await.unwrap();

    let cart: PersistentCart<CatalogProduct, _> = PersistentCart::open(store, "k").await;
    assert!(cart.with_cart(|c| c.is_empty()));
}

#[tokio::test]
async fn test_lifecycle_resign_persists_latest_state() {
    let store = Arc::new(SqliteStore::open(SqliteConfig::in_memory()).await.unwrap());
    let signal = LifecycleSignal::new();

    let (cart, listener) = PersistentCart::<CatalogProduct, _>::open_attached(
        Arc::clone(&store),
        CART_SNAPSHOT_KEY,
        &signal,
    )
    .await;

    cart.with_cart_mut(|c| c.add(bread(), 2)).unwrap();
    cart.with_cart_mut(|c| c.increment(&bread())).unwrap();

    signal.emit(LifecycleEvent::DidBecomeActive);
    signal.emit(LifecycleEvent::WillResignActive);
    drop(signal);
    listener.await.unwrap();

    let restored: PersistentCart<CatalogProduct, _> =
        PersistentCart::open(store, CART_SNAPSHOT_KEY).await;
    assert_eq!(restored.with_cart(|c| c.quantity_of(&bread())), 3);
}

#[tokio::test]
async fn test_subscriber_sees_restored_state_first() {
    let store = MemoryStore::new();
    let items = vec![CartItem::new(milk(), 2)];
    store.save("k", &encode_items(&items).unwrap()).await.unwrap();

    let cart: PersistentCart<CatalogProduct, _> = PersistentCart::open(store, "k").await;
    let mut sub = cart.subscribe();

    let first = sub.recv().await.unwrap();
    assert_eq!(quantities(&first), vec![("MLK".into(), 2)]);

    cart.with_cart_mut(|c| c.remove(&milk()));
    let second = sub.recv().await.unwrap();
    assert!(second.is_empty());
}
