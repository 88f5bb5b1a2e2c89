//! RocketShoes Core - Shared types library.
//!
//! This crate provides the types shared by every RocketShoes component:
//! - `cart` - Cart store library (stock validation, persistence)
//! - `cli` - Command-line driver for the cart store
//!
//! # Architecture
//!
//! The core crate contains only types and pure cart transitions - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it to
//! be used anywhere, including in the browser.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, catalog records, and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
