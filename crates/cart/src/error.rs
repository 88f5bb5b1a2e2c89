//! Cart error taxonomy.
//!
//! Every cart operation fails with a [`CartError`]. Infrastructure errors
//! (inventory transport, storage) are folded into it at the store boundary so
//! callers branch on kind instead of parsing message text.

use thiserror::Error;

use crate::inventory::InventoryError;
use crate::storage::StorageError;

const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity is out of stock";

/// Error returned by cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The requested quantity exceeds available stock.
    #[error("Requested quantity is out of stock")]
    OutOfStock,

    /// The product is not in the cart or not in the catalog.
    #[error("Product not found")]
    NotFound,

    /// Anything else: transport failures, storage failures, bad payloads.
    #[error("{0}")]
    Unknown(String),
}

/// The cart mutation an error was raised from.
///
/// Determines the fallback message shown when the error carries no
/// user-facing text of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    UpdateAmount,
}

impl Operation {
    /// Generic message shown for failures without a domain message.
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::Add => "Error adding product",
            Self::Remove => "Error removing product",
            Self::UpdateAmount => "Error updating product amount",
        }
    }
}

impl CartError {
    /// Message to show the shopper for this error.
    ///
    /// Only out-of-stock failures have their own text; everything else uses the
    /// operation's fallback so internal details never reach the UI.
    #[must_use]
    pub const fn user_message(&self, operation: Operation) -> &'static str {
        match self {
            Self::OutOfStock => OUT_OF_STOCK_MESSAGE,
            Self::NotFound | Self::Unknown(_) => operation.fallback_message(),
        }
    }
}

impl From<InventoryError> for CartError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound(_) => Self::NotFound,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<StorageError> for CartError {
    fn from(err: StorageError) -> Self {
        Self::Unknown(err.to_string())
    }
}

impl From<serde_json::Error> for CartError {
    fn from(err: serde_json::Error) -> Self {
        Self::Unknown(format!("Serialization error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_out_of_stock() {
        for op in [Operation::Add, Operation::UpdateAmount] {
            assert_eq!(
                CartError::OutOfStock.user_message(op),
                "Requested quantity is out of stock"
            );
        }
    }

    #[test]
    fn test_user_message_falls_back_per_operation() {
        let err = CartError::Unknown("connection refused".to_string());
        assert_eq!(err.user_message(Operation::Add), "Error adding product");
        assert_eq!(err.user_message(Operation::Remove), "Error removing product");
        assert_eq!(
            err.user_message(Operation::UpdateAmount),
            "Error updating product amount"
        );
        assert_eq!(
            CartError::NotFound.user_message(Operation::Remove),
            "Error removing product"
        );
    }

    #[test]
    fn test_inventory_not_found_maps_to_not_found() {
        let err = CartError::from(InventoryError::NotFound("stock/42".to_string()));
        assert_eq!(err, CartError::NotFound);
    }

    #[test]
    fn test_inventory_api_error_maps_to_unknown() {
        let err = CartError::from(InventoryError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(matches!(err, CartError::Unknown(msg) if msg.contains("500")));
    }

    #[test]
    fn test_storage_error_maps_to_unknown() {
        let err = CartError::from(StorageError::Poisoned);
        assert!(matches!(err, CartError::Unknown(_)));
    }
}
