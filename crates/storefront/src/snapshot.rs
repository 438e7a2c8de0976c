//! Cart snapshot encoding.
//!
//! A snapshot is the whole cart as a single JSON array of line items:
//!
//! ```json
//! [{"id":"p1","title":"T","image_url":"u","price":10.0,"quantity":1}]
//! ```
//!
//! Decoding takes the lines as they are. It does not deduplicate ids or
//! otherwise repair a snapshot.

use go_marketplace_core::CartItem;
use thiserror::Error;

use crate::cart::Cart;

/// Snapshot encoding errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode cart snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode cart snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Serialize the whole cart.
///
/// # Errors
///
/// Returns `SnapshotError::Encode` if serialization fails.
pub fn encode(cart: &Cart) -> Result<String, SnapshotError> {
    serde_json::to_string(cart.items()).map_err(SnapshotError::Encode)
}

/// Parse a stored snapshot back into a cart.
///
/// # Errors
///
/// Returns `SnapshotError::Decode` if `raw` is not a JSON array of cart items.
pub fn decode(raw: &str) -> Result<Cart, SnapshotError> {
    let items: Vec<CartItem> = serde_json::from_str(raw).map_err(SnapshotError::Decode)?;
    Ok(Cart::from_items(items))
}
