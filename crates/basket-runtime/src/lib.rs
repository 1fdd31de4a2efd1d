//! # basket-runtime: Composition Root for Basket
//!
//! Wires the pure [`Cart`](basket_core::Cart) to a
//! [`KeyValueStore`](basket_store::KeyValueStore) and to the host's
//! lifecycle, and carries the host's configuration and logging setup.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Host Startup                                         │
//! │                                                                         │
//! │  1. init_tracing()                 RUST_LOG or default filter           │
//! │  2. BasketConfig::load_or_default  basket.toml + BASKET_* overrides     │
//! │  3. open_store(&config.storage)    SQLite (migrated) or memory          │
//! │  4. PersistentCart::open_attached  restore snapshot, listen for resign │
//! │  5. UI subscribes, mutates via with_cart_mut                           │
//! │  6. WillResignActive               snapshot persisted                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,ignore
//! let signal = LifecycleSignal::new();
//! let store = open_store(&config.storage).await?;
//! let (cart, _listener) =
//!     PersistentCart::<CatalogProduct, _>::open_attached(store, CART_SNAPSHOT_KEY, &signal).await;
//!
//! cart.with_cart_mut(|c| c.add(CatalogProduct::new("COKE", "Coke", 1.5), 2))?;
//! signal.emit(LifecycleEvent::WillResignActive);
//! ```

pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod persistent;
pub mod storage;
pub mod telemetry;

pub use catalog::CatalogProduct;
pub use commands::{CartCommand, LineRef};
pub use config::{BasketConfig, FeedSettings, StorageBackend, StorageSettings};
pub use error::{PersistenceError, RuntimeError, RuntimeResult};
pub use lifecycle::{persist_on_resign, LifecycleEvent, LifecycleSignal};
pub use persistent::PersistentCart;
pub use storage::{open_store, SharedStore};
pub use telemetry::init_tracing;
