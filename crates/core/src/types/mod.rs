//! Core types for Go Marketplace.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart_item;
pub mod id;
pub mod price;

pub use cart_item::{CartItem, NewCartItem};
pub use id::{ProductId, ProductIdError};
pub use price::{Price, PriceError};
