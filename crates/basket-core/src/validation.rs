//! # Validation Module
//!
//! Quantity rules shared by every cart mutation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Quantity Rules                                     │
//! │                                                                         │
//! │  add(product, qty)                                                     │
//! │  ├── validate_quantity(qty)      qty == 0 → InvalidQuantity            │
//! │  └── add_quantity(current, qty)  overflow → QuantityOverflow           │
//! │                                                                         │
//! │  decrement(...)                                                        │
//! │  └── quantity 1 → item removed, never stored as 0                      │
//! │                                                                         │
//! │  Cart::from_items / decode_items                                       │
//! │  └── validate_items(items)       qty 0 → InvalidQuantity               │
//! │                                  repeat → DuplicateProduct             │
//! │                                                                         │
//! │  Prices and stock are NOT validated here (owned by the product type).  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use basket_core::validation::{add_quantity, validate_quantity};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_quantity(0).is_err());
//! assert_eq!(add_quantity(2, 3).unwrap(), 5);
//! ```

use crate::error::{CartError, CartResult};
use crate::product::CartItem;

/// Smallest quantity an item may hold.
pub const MIN_ITEM_QUANTITY: u32 = 1;

/// Validates a quantity passed to `add`.
///
/// ## Rules
/// - Must be at least [`MIN_ITEM_QUANTITY`]
/// - No upper bound: stock limits are out of scope
pub fn validate_quantity(quantity: u32) -> CartResult<u32> {
    if quantity < MIN_ITEM_QUANTITY {
        return Err(CartError::InvalidQuantity { quantity });
    }

    Ok(quantity)
}

/// Adds `added` to an existing item quantity without overflowing.
pub fn add_quantity(current: u32, added: u32) -> CartResult<u32> {
    current
        .checked_add(added)
        .ok_or(CartError::QuantityOverflow { current, added })
}

/// Checks a positional index against the current cart length.
pub fn check_index(index: usize, len: usize) -> CartResult<usize> {
    if index >= len {
        return Err(CartError::OutOfRange { index, len });
    }

    Ok(index)
}

/// Checks a whole item list against the cart invariants: every quantity
/// at least [`MIN_ITEM_QUANTITY`], no product twice.
pub fn validate_items<P: PartialEq>(items: &[CartItem<P>]) -> CartResult<()> {
    for (index, item) in items.iter().enumerate() {
        validate_quantity(item.quantity)?;

        // Products only offer equality, so duplicates are found pairwise.
        if let Some(first) = items[..index]
            .iter()
            .position(|prev| prev.product == item.product)
        {
            return Err(CartError::DuplicateProduct { index, first });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity(1).unwrap(), 1);
        assert_eq!(validate_quantity(1000).unwrap(), 1000);

        assert_eq!(
            validate_quantity(0),
            Err(CartError::InvalidQuantity { quantity: 0 })
        );
    }

    #[test]
    fn test_add_quantity_overflow() {
        assert_eq!(add_quantity(2, 3).unwrap(), 5);
        assert!(matches!(
            add_quantity(u32::MAX, 1),
            Err(CartError::QuantityOverflow { .. })
        ));
    }

    #[test]
    fn test_check_index() {
        assert_eq!(check_index(0, 1).unwrap(), 0);
        assert_eq!(
            check_index(1, 1),
            Err(CartError::OutOfRange { index: 1, len: 1 })
        );
        assert!(check_index(0, 0).is_err());
    }

    #[test]
    fn test_validate_items() {
        let ok = vec![CartItem::new("tea", 1), CartItem::new("milk", 4)];
        assert!(validate_items(&ok).is_ok());
        assert!(validate_items::<&str>(&[]).is_ok());

        let zero = vec![CartItem::new("tea", 2), CartItem::new("milk", 0)];
        assert_eq!(
            validate_items(&zero),
            Err(CartError::InvalidQuantity { quantity: 0 })
        );

        let repeated = vec![
            CartItem::new("tea", 1),
            CartItem::new("milk", 1),
            CartItem::new("tea", 2),
        ];
        assert_eq!(
            validate_items(&repeated),
            Err(CartError::DuplicateProduct { index: 2, first: 0 })
        );
    }
}
