//! The cart store.
//!
//! [`CartStore`] owns the current [`Cart`], mirrors it to a
//! [`KeyValueStore`] after every change and publishes each new value on a
//! `tokio::sync::watch` channel for UI subscribers.
//!
//! # Ordering
//!
//! Mutations run one at a time behind a single writer lock. Each one reads
//! the latest cart, computes the next value, writes the full snapshot and
//! only then publishes, so the in-memory cart never runs ahead of what is
//! on disk and concurrent callers cannot lose each other's updates.
//!
//! Mutating a product that is not in the cart (or decrementing a line that
//! is already at zero) changes nothing and writes nothing.

use std::sync::Arc;

use go_marketplace_core::NewCartItem;
use tokio::sync::{Mutex, OnceCell, watch};
use tracing::{debug, info, instrument, warn};

use crate::cart::Cart;
use crate::config::CartConfig;
use crate::error::Result;
use crate::snapshot;
use crate::storage::{KeyValueStore, StorageBackend};

/// Whether the persisted cart has been loaded yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Readiness {
    /// Hydration from storage has not finished; the cart shown is empty.
    #[default]
    Loading,
    /// The cart reflects the persisted snapshot and all later changes.
    Ready,
}

/// What subscribers observe: readiness plus the current cart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartState {
    pub readiness: Readiness,
    pub cart: Cart,
}

/// Cart store backed by the configured storage backend.
///
/// This is the handle type the provider hands out to consumers.
pub type CartHandle = CartStore<StorageBackend>;

/// Shopping-cart state container with durable persistence.
///
/// Cheaply cloneable via `Arc`; every clone refers to the same cart.
pub struct CartStore<S> {
    inner: Arc<CartStoreInner<S>>,
}

struct CartStoreInner<S> {
    storage: S,
    key: String,
    state: watch::Sender<CartState>,
    writer: Mutex<()>,
    hydrated: OnceCell<()>,
}

impl<S> Clone for CartStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("readiness", &state.readiness)
            .field("lines", &state.cart.len())
            .finish_non_exhaustive()
    }
}

impl CartStore<StorageBackend> {
    /// Create a store for the configured backend and key.
    ///
    /// The store is not hydrated yet; call [`CartStore::initialize`].
    #[must_use]
    pub fn from_config(config: &CartConfig) -> Self {
        Self::new(config.build_storage(), config.storage_key.clone())
    }
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create an empty, not yet hydrated store.
    #[must_use]
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        let (state, _) = watch::channel(CartState::default());

        Self {
            inner: Arc::new(CartStoreInner {
                storage,
                key: key.into(),
                state,
                writer: Mutex::new(()),
                hydrated: OnceCell::new(),
            }),
        }
    }

    /// Create a store and hydrate it from storage before returning.
    pub async fn open(storage: S, key: impl Into<String>) -> Self {
        let store = Self::new(storage, key);
        store.initialize().await;
        store
    }

    /// Storage key the snapshot is written to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// The underlying storage.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.inner.storage
    }

    /// The current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner.state.borrow().cart.clone()
    }

    /// The current readiness and cart.
    #[must_use]
    pub fn state(&self) -> CartState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn readiness(&self) -> Readiness {
        self.inner.state.borrow().readiness
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.readiness() == Readiness::Ready
    }

    /// Subscribe to cart changes.
    ///
    /// The receiver is notified once when hydration finishes and once per
    /// mutation that actually changed the cart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.inner.state.subscribe()
    }

    /// Wait until hydration has finished, without triggering it.
    pub async fn wait_until_ready(&self) {
        let mut rx = self.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel
        let _ = rx.wait_for(|state| state.readiness == Readiness::Ready).await;
    }

    /// Hydrate the cart from storage.
    ///
    /// Runs at most once per store; later calls wait for the first to finish
    /// and then return. A missing snapshot yields an empty cart. An
    /// unreadable or malformed snapshot is logged and also yields an empty
    /// cart.
    #[instrument(skip(self), fields(key = %self.inner.key))]
    pub async fn initialize(&self) {
        self.inner
            .hydrated
            .get_or_init(|| async { self.hydrate().await })
            .await;
    }

    async fn hydrate(&self) {
        let cart = match self.inner.storage.get(&self.inner.key).await {
            Ok(Some(raw)) => match snapshot::decode(&raw) {
                Ok(cart) => {
                    info!(
                        lines = cart.len(),
                        item_count = cart.item_count(),
                        "Cart hydrated from snapshot"
                    );
                    cart
                }
                Err(e) => {
                    warn!(error = %e, "Stored cart snapshot is malformed, starting with an empty cart");
                    Cart::new()
                }
            },
            Ok(None) => {
                debug!("No stored cart snapshot, starting with an empty cart");
                Cart::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read cart snapshot, starting with an empty cart");
                Cart::new()
            }
        };

        self.inner.state.send_replace(CartState {
            readiness: Readiness::Ready,
            cart,
        });
    }

    /// Add a product, or one more unit of it if it is already in the cart.
    ///
    /// Returns the cart as it is after the call.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the snapshot cannot be written. The
    /// in-memory cart is left unchanged in that case.
    #[instrument(skip(self, item), fields(product_id = %item.id))]
    pub async fn add_to_cart(&self, item: NewCartItem) -> Result<Cart> {
        self.mutate("add_to_cart", |cart| cart.with_added(item)).await
    }

    /// One more unit of `id`. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the snapshot cannot be written.
    #[instrument(skip(self))]
    pub async fn increment(&self, id: &str) -> Result<Cart> {
        self.mutate("increment", |cart| cart.with_incremented(id)).await
    }

    /// One less unit of `id`, never going below zero. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the snapshot cannot be written.
    #[instrument(skip(self))]
    pub async fn decrement(&self, id: &str) -> Result<Cart> {
        self.mutate("decrement", |cart| cart.with_decremented(id)).await
    }

    /// Read-modify-persist-publish under the writer lock.
    ///
    /// `change` returns `None` when the cart would not change; nothing is
    /// written or published then.
    async fn mutate<F>(&self, operation: &'static str, change: F) -> Result<Cart>
    where
        F: FnOnce(&Cart) -> Option<Cart>,
    {
        // A mutation before hydration would overwrite the stored cart with an empty one
        self.initialize().await;

        let _writer = self.inner.writer.lock().await;
        let current = self.cart();

        let Some(next) = change(&current) else {
            debug!(operation, "Cart unchanged, nothing to persist");
            return Ok(current);
        };

        let next = self.persist(&next).await?;

        self.inner.state.send_modify(|state| state.cart = next.clone());
        info!(
            operation,
            lines = next.len(),
            item_count = next.item_count(),
            "Cart updated"
        );

        Ok(next)
    }

    /// Write `cart` and return it as it reads back from the snapshot.
    ///
    /// Prices go through a JSON number on the way out, so the stored copy can
    /// differ from `cart` in digits an `f64` does not keep. The read-back
    /// form is what gets published, keeping memory equal to what a restart
    /// would hydrate.
    async fn persist(&self, cart: &Cart) -> Result<Cart> {
        let raw = snapshot::encode(cart)?;
        let stored = snapshot::decode(&raw)?;

        if let Err(e) = self.inner.storage.set(&self.inner.key, &raw).await {
            warn!(error = %e, "Failed to persist cart snapshot, keeping previous cart");
            return Err(e.into());
        }

        debug!(bytes = raw.len(), "Cart snapshot persisted");
        Ok(stored)
    }
}
