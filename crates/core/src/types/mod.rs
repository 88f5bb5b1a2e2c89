//! Core types for RocketShoes.
//!
//! This module provides type-safe wrappers for the catalog and the cart.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{Cart, LineItem};
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{Product, Stock};
