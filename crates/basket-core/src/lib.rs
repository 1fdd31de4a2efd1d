//! # basket-core: Pure Cart Logic for Basket
//!
//! This crate is the **heart** of Basket. It contains the generic cart
//! container with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Basket Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation layer (list views)                 │   │
//! │  │          subscribes to snapshots, calls cart operations         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            basket-runtime (PersistentCart, lifecycle)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ basket-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  product  │  │   cart    │  │   feed    │  │   codec   │  │   │
//! │  │   │CartProduct│  │  Cart<P>  │  │ StateFeed │  │ JSON snap │  │   │
//! │  │   │ CartItem  │  │ mutations │  │ replay-1  │  │ encode/   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 basket-store (KeyValueStore)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`product`] - `CartProduct` capability and `CartItem`
//! - [`cart`] - The `Cart<P>` container
//! - [`feed`] - Replay-latest state feed
//! - [`codec`] - Snapshot bytes for persistence
//! - [`error`] - Domain error types
//! - [`validation`] - Quantity and index rules
//!
//! ## Example Usage
//!
//! ```rust
//! use basket_core::{Cart, CartProduct};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Book(&'static str, f64);
//!
//! impl CartProduct for Book {
//!     fn price(&self) -> f64 {
//!         self.1
//!     }
//! }
//!
//! let mut cart = Cart::new();
//! cart.add(Book("dune", 9.5), 2).unwrap();
//! cart.add(Book("emma", 4.0), 1).unwrap();
//! cart.add(Book("dune", 9.5), 1).unwrap();
//!
//! assert_eq!(cart.count(), 2);
//! assert_eq!(cart.count_quantities(), 4);
//! assert_eq!(cart.amount(), 32.5);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod codec;
pub mod error;
pub mod feed;
pub mod product;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use codec::{decode_items, encode_items};
pub use error::{CartError, CartResult, CodecError, CodecResult};
pub use feed::{StateFeed, Subscription, DEFAULT_FEED_CAPACITY};
pub use product::{CartItem, CartProduct, Snapshot};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Store key under which the cart snapshot is persisted.
///
/// One cart per store key; hosts with several carts override it.
pub const CART_SNAPSHOT_KEY: &str = "basket.cart.items";
