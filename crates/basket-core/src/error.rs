//! # Error Types
//!
//! Domain-specific error types for basket-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  basket-core errors (this file)                                        │
//! │  ├── CartError        - Caller-visible cart failures                   │
//! │  └── CodecError       - Snapshot encode/decode failures                │
//! │                                                                         │
//! │  basket-store errors (separate crate)                                  │
//! │  └── StoreError       - Key-value store failures                       │
//! │                                                                         │
//! │  basket-runtime errors                                                 │
//! │  └── PersistenceError - Always recovered locally, logged, never raised │
//! │                                                                         │
//! │  Flow: CodecError/StoreError → PersistenceError → tracing::warn!       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (index, length, quantity)
//! 3. Errors are enum variants, never String
//! 4. Product-keyed operations never fail: a miss is a no-op

use thiserror::Error;

// =============================================================================
// Cart Error
// =============================================================================

/// Errors raised by cart operations.
///
/// Only index-based accessors/mutators and `add` can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Index outside `[0, len)`.
    ///
    /// ## When This Occurs
    /// - `item`, `increment_at`, `decrement_at` or `remove_at` called with a
    ///   stale index (e.g. after a removal shifted positions)
    /// - Any positional call on an empty cart
    #[error("Index {index} out of range for cart with {len} items")]
    OutOfRange { index: usize, len: usize },

    /// Quantity passed to `add` is not a positive number.
    #[error("Quantity must be at least 1, got {quantity}")]
    InvalidQuantity { quantity: u32 },

    /// Adding would overflow the per-item quantity counter.
    #[error("Quantity {current} + {added} overflows the item counter")]
    QuantityOverflow { current: u32, added: u32 },

    /// A seeded item list holds the same product twice.
    ///
    /// ## When This Occurs
    /// - `Cart::from_items` given a hand-built list with a repeated product
    /// - A snapshot whose records were edited outside the cart
    #[error("Item {index} repeats the product at position {first}")]
    DuplicateProduct { index: usize, first: usize },
}

// =============================================================================
// Codec Error
// =============================================================================

/// Snapshot encoding/decoding errors.
#[derive(Debug, Error)]
pub enum CodecError {
    /// JSON (de)serialization failed.
    #[error("Snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Decoded records violate the cart invariants.
    ///
    /// ## When This Occurs
    /// - A record has `quantity: 0`
    /// - Two records hold equal products
    #[error("Snapshot violates cart invariants: {0}")]
    Invariant(#[from] CartError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

/// Convenience type alias for Results with CodecError.
pub type CodecResult<T> = Result<T, CodecError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CartError::OutOfRange { index: 3, len: 2 };
        assert_eq!(err.to_string(), "Index 3 out of range for cart with 2 items");

        let err = CartError::InvalidQuantity { quantity: 0 };
        assert_eq!(err.to_string(), "Quantity must be at least 1, got 0");
    }

    #[test]
    fn test_json_error_converts_to_codec_error() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let codec_err: CodecError = json_err.into();
        assert!(matches!(codec_err, CodecError::Json(_)));
    }

    #[test]
    fn test_cart_error_converts_to_invariant() {
        let codec_err: CodecError = CartError::DuplicateProduct { index: 2, first: 0 }.into();
        assert_eq!(
            codec_err.to_string(),
            "Snapshot violates cart invariants: Item 2 repeats the product at position 0"
        );
    }
}
