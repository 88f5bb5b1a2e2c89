//! Integration tests for RocketShoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! Tests talk to a [`TestInventory`]: an in-process `axum` server that serves
//! the inventory endpoints (`/products/{id}`, `/stock/{id}`) from a mutable
//! catalog, bound to an ephemeral localhost port.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_cart::InventoryConfig;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Default)]
struct Catalog {
    products: HashMap<i32, Value>,
    stock: HashMap<i32, i64>,
    forced_status: Option<StatusCode>,
    requests: Vec<String>,
}

type SharedCatalog = Arc<Mutex<Catalog>>;

/// In-process inventory service.
///
/// The server task is aborted when the value is dropped.
pub struct TestInventory {
    addr: SocketAddr,
    catalog: SharedCatalog,
    task: JoinHandle<()>,
}

impl TestInventory {
    /// Bind to `127.0.0.1:0` and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::expect_used)]
    pub async fn start() -> Self {
        let catalog = SharedCatalog::default();

        let app = Router::new()
            .route("/products/{id}", get(product))
            .route("/stock/{id}", get(stock))
            .with_state(Arc::clone(&catalog));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test inventory");
        let addr = listener.local_addr().expect("Listener has no local address");

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            catalog,
            task,
        }
    }

    /// Base URL of the server.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configuration pointing at this server.
    ///
    /// # Panics
    ///
    /// Panics if the base URL is rejected (it never is for a bound socket).
    #[allow(clippy::expect_used)]
    #[must_use]
    pub fn config(&self) -> InventoryConfig {
        InventoryConfig::new(&self.base_url(), Duration::from_secs(5))
            .expect("Test inventory URL is valid")
    }

    /// Add a product to the catalog with the given stock level.
    pub fn add_product(&self, id: i32, title: &str, price: f64, stock: i64) {
        self.with_catalog(|catalog| {
            catalog.products.insert(
                id,
                json!({
                    "id": id,
                    "title": title,
                    "price": price,
                    "image": format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{id}.jpg"),
                }),
            );
            catalog.stock.insert(id, stock);
        });
    }

    /// Change a product's stock level.
    pub fn set_stock(&self, id: i32, amount: i64) {
        self.with_catalog(|catalog| {
            catalog.stock.insert(id, amount);
        });
    }

    /// Answer every request with `status` until cleared with `None`.
    pub fn force_status(&self, status: Option<StatusCode>) {
        self.with_catalog(|catalog| catalog.forced_status = status);
    }

    /// Paths requested so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.with_catalog(|catalog| catalog.requests.clone())
    }

    fn with_catalog<T>(&self, f: impl FnOnce(&mut Catalog) -> T) -> T {
        let mut catalog = self.catalog.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut catalog)
    }
}

impl Drop for TestInventory {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn product(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, StatusCode> {
    let mut catalog = catalog.lock().unwrap_or_else(PoisonError::into_inner);
    catalog.requests.push(format!("/products/{id}"));

    if let Some(status) = catalog.forced_status {
        return Err(status);
    }
    catalog
        .products
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn stock(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, StatusCode> {
    let mut catalog = catalog.lock().unwrap_or_else(PoisonError::into_inner);
    catalog.requests.push(format!("/stock/{id}"));

    if let Some(status) = catalog.forced_status {
        return Err(status);
    }
    catalog
        .stock
        .get(&id)
        .map(|amount| Json(json!({ "id": id, "amount": amount })))
        .ok_or(StatusCode::NOT_FOUND)
}
