//! # Snapshot Codec
//!
//! Converts the cart's item sequence to and from the bytes handed to a
//! key-value store.
//!
//! ## Wire Format
//! A JSON array of records, in cart order:
//! ```json
//! [
//!   { "product": { "sku": "COKE-330", "price": 1.5 }, "quantity": 2 },
//!   { "product": { "sku": "CHIPS", "price": 0.99 }, "quantity": 1 }
//! ]
//! ```
//! The product's own serde representation is embedded as-is.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecResult;
use crate::product::{CartItem, CartProduct};
use crate::validation::validate_items;

/// Encodes the item sequence into snapshot bytes.
pub fn encode_items<P: Serialize>(items: &[CartItem<P>]) -> CodecResult<Vec<u8>> {
    Ok(serde_json::to_vec(items)?)
}

/// Decodes snapshot bytes back into an item sequence.
///
/// ## Errors
/// - [`CodecError::Json`](crate::CodecError::Json) for malformed bytes or an incompatible product shape
/// - [`CodecError::Invariant`](crate::CodecError::Invariant) for zero
///   quantities or duplicate products
pub fn decode_items<P>(bytes: &[u8]) -> CodecResult<Vec<CartItem<P>>>
where
    P: CartProduct + DeserializeOwned,
{
    let items: Vec<CartItem<P>> = serde_json::from_slice(bytes)?;
    validate_items(&items)?;
    Ok(items)
}

// =============================================================================
// Unit Tests
// =============================================================================
