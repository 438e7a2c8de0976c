//! Unified error handling for cart operations.
//!
//! Mutating a product that is not in the cart is a no-op, so there is no
//! not-found variant.

use thiserror::Error;

use crate::config::ConfigError;
use crate::snapshot::SnapshotError;
use crate::storage::StorageError;

/// Error type for the cart store and its consumers.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart was looked up while no store is installed.
    #[error("use_cart must be called while a CartProvider is installed")]
    NoProvider,

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The durable store rejected a read or write.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be turned into a snapshot.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl CartError {
    /// Whether the caller can carry on with the current in-memory cart.
    ///
    /// Storage and snapshot failures leave the store usable; a missing
    /// provider or bad configuration means the calling code path is wired
    /// up wrong.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Snapshot(_))
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
