//! Inventory service port and HTTP client.
//!
//! # Endpoints
//!
//! - `GET /products/{id}` - catalog record `{id, title, price, image}`
//! - `GET /stock/{id}` - available quantity `{id, amount}`
//!
//! The cart store is generic over [`Inventory`] so tests can substitute an
//! in-memory catalog for [`InventoryClient`].

mod client;

use std::future::Future;

use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

pub use client::InventoryClient;

/// Errors that can occur when talking to the inventory service.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// HTTP request failed (connect, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered 404 for this resource.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The service answered with any other non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Source of catalog records and stock levels.
pub trait Inventory: Send + Sync {
    /// Fetch the current stock record for a product.
    fn stock(&self, id: ProductId) -> impl Future<Output = Result<Stock, InventoryError>> + Send;

    /// Fetch the catalog record for a product.
    fn product(&self, id: ProductId)
    -> impl Future<Output = Result<Product, InventoryError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_error_display() {
        let err = InventoryError::NotFound("stock/42".to_string());
        assert_eq!(err.to_string(), "Not found: stock/42");

        let err = InventoryError::Api {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - maintenance");
    }
}
