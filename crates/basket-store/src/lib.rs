//! # basket-store: Snapshot Storage for Basket
//!
//! This crate provides the key-value store the cart persists into.
//! The production backend is SQLite via sqlx; an in-memory backend
//! serves tests and hosts that do not need durability.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Basket Data Flow                                 │
//! │                                                                         │
//! │  PersistentCart::persist() (basket-runtime)                            │
//! │       │  encode_items(snapshot) → bytes                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   basket-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ KeyValueStore │    │  SqliteStore  │    │  Migrations  │  │   │
//! │  │   │   (kv.rs)     │◄───│  (pool.rs)    │    │  (embedded)  │  │   │
//! │  │   │               │    ├───────────────┤    │              │  │   │
//! │  │   │ save / load / │◄───│  MemoryStore  │    │ 001_kv_...   │  │   │
//! │  │   │ remove        │    │  (memory.rs)  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use basket_store::{KeyValueStore, SqliteConfig, SqliteStore};
//!
//! let store = SqliteStore::open(SqliteConfig::new("basket.db")).await?;
//! store.save("basket.cart.items", b"[]").await?;
//! let bytes = store.load("basket.cart.items").await?;
//! ```

pub mod error;
pub mod kv;
pub mod memory;
pub mod migrations;
pub mod pool;

pub use error::{StoreError, StoreResult};
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use pool::{SqliteConfig, SqliteStore};
