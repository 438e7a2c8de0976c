//! Go Marketplace Core - Shared cart domain types.
//!
//! This crate provides the types used across all Go Marketplace components:
//! - `storefront` - Cart state container with durable persistence
//! - `cli` - Command-line client for inspecting and editing the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no async
//! runtime. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs and prices, plus cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
