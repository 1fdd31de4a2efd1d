//! # Catalog Product
//!
//! The concrete product the `basket` host stores in its cart. Identity is
//! the SKU; name and price ride along for display and totals.

use basket_core::CartProduct;
use serde::{Deserialize, Serialize};

/// A sellable catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogProduct {
    /// Stock keeping unit. Two products with the same SKU are the same
    /// cart line.
    pub sku: String,

    /// Display name, shown in logs and listings.
    pub name: String,

    /// Unit price. No currency is implied.
    pub price: f64,
}

impl CatalogProduct {
    /// Creates a catalog entry.
    pub fn new(sku: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        CatalogProduct {
            sku: sku.into(),
            name: name.into(),
            price,
        }
    }

    /// A key-only product for SKU lookups (`increment`, `decrement`,
    /// `remove`). Name and price are blank and never stored.
    pub fn with_sku(sku: impl Into<String>) -> Self {
        Self::new(sku, String::new(), 0.0)
    }
}

// Equality on SKU only: a price change must not split one line into two.
impl PartialEq for CatalogProduct {
    fn eq(&self, other: &Self) -> bool {
        self.sku == other.sku
    }
}

impl CartProduct for CatalogProduct {
    fn price(&self) -> f64 {
        self.price
    }
}
