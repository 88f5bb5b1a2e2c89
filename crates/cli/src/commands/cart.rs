//! Cart commands.
//!
//! # Environment Variables
//!
//! - `INVENTORY_API_URL` - Inventory service base URL
//! - `CART_STORAGE_PATH` - JSON file holding the persisted cart

use std::fmt::Write as _;

use rocketshoes_cart::{
    CartConfig, CartError, CartStore, FileStore, InventoryClient, InventoryError, StorageError,
    TracingNotifier, UpdateProductAmount,
};
use rocketshoes_core::{Cart, ProductId};
use thiserror::Error;

/// Cart store wired to the HTTP inventory and the file-backed slot.
pub type CliStore = CartStore<InventoryClient, FileStore, TracingNotifier>;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Inventory client could not be built.
    #[error("Inventory client error: {0}")]
    Inventory(#[from] InventoryError),

    /// Persisted cart could not be read.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A cart operation was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Cart could not be rendered as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Open the cart store described by `config`.
///
/// # Errors
///
/// Returns `CommandError` if the HTTP client cannot be built or the storage
/// file cannot be read.
pub fn open_store(config: &CartConfig) -> Result<CliStore, CommandError> {
    let inventory = InventoryClient::new(&config.inventory)?;
    let storage = FileStore::new(&config.storage_path);
    tracing::debug!(path = %storage.path().display(), "Opening cart storage");
    Ok(CartStore::open(inventory, storage, TracingNotifier)?)
}

/// Print the cart.
///
/// # Errors
///
/// Returns `CommandError::Json` if JSON output was requested and fails.
pub fn show(store: &CliStore, json: bool) -> Result<(), CommandError> {
    let output = if json {
        serde_json::to_string_pretty(store.cart())?
    } else {
        render_table(store.cart())
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}

/// Set a product's quantity. Zero or negative amounts leave the cart as is.
///
/// # Errors
///
/// Returns `CommandError::Cart` if the update is rejected.
pub async fn update(
    store: &mut CliStore,
    product_id: ProductId,
    amount: i64,
) -> Result<(), CommandError> {
    store
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await?;
    Ok(())
}

/// Render the cart as a plain-text table with a total line.
fn render_table(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:<40}  {:>6}  {:>10}  {:>10}",
        "ID", "PRODUCT", "QTY", "PRICE", "SUBTOTAL"
    );
    for item in cart {
        let _ = writeln!(
            out,
            "{:>6}  {:<40}  {:>6}  {:>10}  {:>10}",
            item.id.as_i32(),
            truncate(&item.title, 40),
            item.amount,
            item.price.to_string(),
            item.subtotal().to_string()
        );
    }
    let _ = write!(
        out,
        "{} item(s), {} unit(s), total {}",
        cart.len(),
        cart.total_amount(),
        cart.total()
    );
    out
}

/// Shorten `s` to at most `max` characters.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut short: String = s.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}
