//! Catalog records served by the inventory service.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as served by `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(alias = "name")]
    pub title: String,
    pub price: Price,
    pub image: String,
}

/// Available quantity of a product, as served by `GET /stock/{id}`.
///
/// Never cached: every quantity check fetches a fresh record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

impl Stock {
    /// Whether `requested` units can be served from this stock.
    #[must_use]
    pub const fn covers(&self, requested: u32) -> bool {
        self.amount >= requested
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_catalog_json() {
        let json = r#"{
            "id": 1,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "image": "https://example.com/shoe-1.jpg"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price.to_string(), "$179.90");
    }

    #[test]
    fn test_product_accepts_name_alias() {
        let json = r#"{"id": 2, "name": "Runner", "price": 99, "image": "x.jpg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.title, "Runner");
    }

    #[test]
    fn test_stock_covers() {
        let stock = Stock {
            id: ProductId::new(1),
            amount: 3,
        };
        assert!(stock.covers(3));
        assert!(!stock.covers(4));
    }

    #[test]
    fn test_negative_stock_is_rejected() {
        assert!(serde_json::from_str::<Stock>(r#"{"id": 1, "amount": -1}"#).is_err());
    }
}
