//! Process-wide cart provider.
//!
//! Screens deep in the UI tree need the one cart without having it threaded
//! through every constructor. The app installs its [`CartHandle`] once at
//! startup; anything can then call [`use_cart`] to get a clone of it.
//!
//! Installing returns a [`ProviderGuard`]. Dropping the guard tears that
//! provider down again. Installs nest like scopes: the most recent live
//! install wins, and dropping a guard only removes its own install, so an
//! outer guard dropped early never brings back a handle that is gone.
//! Calling [`use_cart`] with nothing installed is a wiring bug and returns
//! [`CartError::NoProvider`] instead of a default cart.
//!
//! Code that already has a handle should pass it along directly; the
//! provider is for the places that do not.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use tracing::{debug, warn};

use crate::error::{CartError, Result};
use crate::store::CartHandle;

/// Live installs, oldest first.
static PROVIDERS: RwLock<Vec<(u64, CartHandle)>> = RwLock::new(Vec::new());
static NEXT_TOKEN: AtomicU64 = AtomicU64::new(0);

/// Installs the process-wide cart handle.
pub struct CartProvider;

impl CartProvider {
    /// Make `handle` the cart returned by [`use_cart`] until the guard drops.
    #[must_use = "dropping the guard uninstalls the cart provider immediately"]
    pub fn install(handle: CartHandle) -> ProviderGuard {
        let token = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
        let mut providers = PROVIDERS.write().unwrap_or_else(PoisonError::into_inner);

        if providers.is_empty() {
            debug!(key = handle.key(), "Cart provider installed");
        } else {
            warn!(key = handle.key(), "Cart provider installed over an existing one");
        }
        providers.push((token, handle));

        ProviderGuard { token }
    }

    /// Whether a cart handle is currently installed.
    #[must_use]
    pub fn is_installed() -> bool {
        !PROVIDERS
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

/// Keeps a cart provider installed; uninstalls it on drop.
#[derive(Debug)]
pub struct ProviderGuard {
    token: u64,
}

impl Drop for ProviderGuard {
    fn drop(&mut self) {
        PROVIDERS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(token, _)| *token != self.token);
        debug!("Cart provider uninstalled");
    }
}

/// Get the installed cart handle.
///
/// # Errors
///
/// Returns `CartError::NoProvider` if no provider is installed.
pub fn use_cart() -> Result<CartHandle> {
    PROVIDERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .last()
        .map(|(_, handle)| handle.clone())
        .ok_or(CartError::NoProvider)
}
