//! HTTP client for the inventory service.

use reqwest::StatusCode;
use rocketshoes_core::{Product, ProductId, Stock};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::{Inventory, InventoryError};
use crate::config::InventoryConfig;

/// Inventory service client backed by `reqwest`.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    client: reqwest::Client,
    base_url: Url,
}

impl InventoryClient {
    /// Create a new inventory client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &InventoryConfig) -> Result<Self, InventoryError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET a JSON resource relative to the base URL.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, InventoryError> {
        let url = self.base_url.join(path)?;

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(InventoryError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(InventoryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

impl Inventory for InventoryClient {
    #[instrument(skip_all, fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<Stock, InventoryError> {
        let stock: Stock = self.get_json(&format!("stock/{id}")).await?;
        tracing::debug!(available = stock.amount, "Fetched stock");
        Ok(stock)
    }

    #[instrument(skip_all, fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, InventoryError> {
        self.get_json(&format!("products/{id}")).await
    }
}
