//! Integration tests for Go Marketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p go-marketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - File-backed store across simulated app restarts
//! - `cart_provider` - Process-wide provider wiring
//!
//! The helpers below give each test its own storage directory so tests can
//! run in parallel.

use go_marketplace_core::{NewCartItem, Price};
use go_marketplace_storefront::{CartConfig, CartHandle, CartStore, StorageBackendKind};
use tempfile::TempDir;

/// A temporary storage directory plus the config pointing at it.
pub struct TestContext {
    pub dir: TempDir,
    pub config: CartConfig,
}

impl TestContext {
    /// Create a context with a fresh, empty storage directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = CartConfig {
            backend: StorageBackendKind::File,
            storage_dir: dir.path().to_path_buf(),
            ..CartConfig::default()
        };
        Self { dir, config }
    }

    /// Open a hydrated store, as the app does on every launch.
    pub async fn launch(&self) -> CartHandle {
        let store = CartStore::from_config(&self.config);
        store.initialize().await;
        store
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A product descriptor with fixed display fields.
#[must_use]
pub fn product(id: &str, cents: i64) -> NewCartItem {
    NewCartItem::new(
        id,
        format!("Product {id}"),
        format!("https://cdn.example.com/{id}.png"),
        Price::from_cents(cents),
    )
}
