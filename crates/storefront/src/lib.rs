//! Go Marketplace Storefront - Persistent shopping cart.
//!
//! This crate holds the cart that the storefront UI renders and edits. The
//! cart lives in memory, is mirrored to a durable key-value slot after every
//! change, and is hydrated from that slot once when the store starts.
//!
//! # Architecture
//!
//! - [`cart::Cart`] is an immutable value; every change produces a new one
//! - [`store::CartStore`] serializes mutations and publishes each new cart
//!   through a `tokio::sync::watch` channel
//! - [`storage::KeyValueStore`] abstracts the device storage, with in-memory
//!   and file-backed implementations
//! - [`provider`] holds the process-wide cart handle that UI code looks up
//!
//! # Example
//!
//! ```
//! use go_marketplace_core::{NewCartItem, Price};
//! use go_marketplace_storefront::{CartStore, MemoryStorage};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> go_marketplace_storefront::Result<()> {
//! let cart = CartStore::open(MemoryStorage::new(), "@cart/GoMarketPlace").await;
//!
//! let shirt = NewCartItem::new("p1", "Shirt", "https://example.com/shirt.png", Price::from_cents(1999));
//! cart.add_to_cart(shirt).await?;
//! cart.increment("p1").await?;
//!
//! assert_eq!(cart.cart().item_count(), 2);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod provider;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use cart::Cart;
pub use config::{CartConfig, ConfigError, StorageBackendKind};
pub use error::{CartError, Result};
pub use provider::{CartProvider, ProviderGuard, use_cart};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageBackend, StorageError};
pub use store::{CartHandle, CartState, CartStore, Readiness};
