//! # Product Capability & Cart Items
//!
//! The cart never looks inside a product. All it needs is the
//! [`CartProduct`] capability set: equality and a price.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Types                                      │
//! │                                                                         │
//! │  ┌─────────────────────┐        ┌─────────────────────────────┐        │
//! │  │  P: CartProduct     │        │       CartItem<P>           │        │
//! │  │  ─────────────────  │        │  ─────────────────────────  │        │
//! │  │  PartialEq (key)    │◄───────│  product: P                 │        │
//! │  │  Clone              │        │  quantity: u32  (>= 1)      │        │
//! │  │  price() -> f64     │        └─────────────────────────────┘        │
//! │  └─────────────────────┘                     │                         │
//! │                                              ▼                         │
//! │                         Snapshot<P> = Arc<Vec<CartItem<P>>>             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

// =============================================================================
// Product Capability
// =============================================================================

/// The capability set a product type must offer to live in a cart.
///
/// Equality (`PartialEq`) is the cart's logical key: two products that
/// compare equal share one cart item.
///
/// ## Example
/// ```rust
/// use basket_core::CartProduct;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Coffee {
///     sku: &'static str,
///     price: f64,
/// }
///
/// impl CartProduct for Coffee {
///     fn price(&self) -> f64 {
///         self.price
///     }
/// }
/// ```
pub trait CartProduct: PartialEq + Clone {
    /// Unit price as a real number. No currency semantics are implied.
    fn price(&self) -> f64;
}

// =============================================================================
// Cart Item
// =============================================================================

/// A product paired with the quantity currently in the cart.
///
/// Serialized with the field names `product` and `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem<P> {
    /// The product this line refers to.
    pub product: P,

    /// Quantity in cart. Never 0 while the item is stored in a cart.
    pub quantity: u32,
}

impl<P> CartItem<P> {
    /// Creates a new cart item.
    pub fn new(product: P, quantity: u32) -> Self {
        CartItem { product, quantity }
    }
}

impl<P: CartProduct> CartItem<P> {
    /// Line amount (unit price × quantity).
    pub fn line_amount(&self) -> f64 {
        self.product.price() * f64::from(self.quantity)
    }
}

/// The full ordered item sequence, as published to observers and
/// handed to the snapshot encoder.
pub type Snapshot<P> = Arc<Vec<CartItem<P>>>;

// =============================================================================
// Unit Tests
// =============================================================================
