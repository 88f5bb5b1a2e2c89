//! Cart store: stock-validated mutations mirrored to a key-value slot.
//!
//! # Flow
//!
//! Every mutation follows the same steps:
//! 1. Validate the request (cart contents, then a fresh stock lookup)
//! 2. Compute the next [`Cart`] without touching the current one
//! 3. Write the next cart to [`CART_STORAGE_KEY`]
//! 4. Replace the in-memory cart
//!
//! A failure at any step leaves both copies as they were, notifies the
//! shopper, and returns the tagged [`CartError`].

use std::sync::Arc;

use rocketshoes_core::{Cart, LineItem, ProductId, Stock};
use tokio::sync::Mutex;
use tracing::instrument;

use crate::error::{CartError, Operation};
use crate::inventory::{Inventory, InventoryError};
use crate::notify::{Notifier, TracingNotifier};
use crate::storage::{KeyValueStore, StorageError};

/// Storage slot holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Request to set a line-item's quantity.
///
/// `amount` is signed so that zero and negative requests (e.g. a decrement
/// button pressed at 1) arrive intact and are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Owns the cart and its collaborators.
pub struct CartStore<I, S, N = TracingNotifier> {
    cart: Cart,
    inventory: I,
    storage: S,
    notifier: N,
}

impl<I, S, N> CartStore<I, S, N>
where
    I: Inventory,
    S: KeyValueStore,
    N: Notifier,
{
    /// Create a store, hydrating the cart from [`CART_STORAGE_KEY`].
    ///
    /// A slot that was never written yields an empty cart. A slot holding data
    /// that does not parse as a cart is logged and also yields an empty cart;
    /// it is overwritten by the next successful mutation.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be read.
    pub fn open(inventory: I, storage: S, notifier: N) -> Result<Self, StorageError> {
        let cart = match storage.get(CART_STORAGE_KEY)? {
            Some(bytes) => serde_json::from_slice::<Cart>(&bytes).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable persisted cart");
                Cart::new()
            }),
            None => Cart::new(),
        };

        tracing::debug!(items = cart.len(), "Cart hydrated");

        Ok(Self {
            cart,
            inventory,
            storage,
            notifier,
        })
    }

    /// Current cart snapshot.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Fetch the current stock record for a product.
    ///
    /// # Errors
    ///
    /// Propagates any inventory failure unchanged.
    pub async fn stock(&self, id: ProductId) -> Result<Stock, InventoryError> {
        self.inventory.stock(id).await
    }

    /// Add one unit of a product.
    ///
    /// An existing line-item is incremented if stock covers one more unit. A new
    /// product is looked up in the catalog and appended with amount 1 if any
    /// stock is available.
    ///
    /// # Errors
    ///
    /// - `CartError::OutOfStock` if stock does not cover the new amount
    /// - `CartError::NotFound` if the inventory has no such product
    /// - `CartError::Unknown` for transport or storage failures
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn add_product(&mut self, id: ProductId) -> Result<(), CartError> {
        let result = self.try_add_product(id).await;
        self.settle(Operation::Add, result)
    }

    /// Remove a product's line-item.
    ///
    /// # Errors
    ///
    /// - `CartError::NotFound` if the product is not in the cart
    /// - `CartError::Unknown` for storage failures
    #[instrument(skip_all, fields(product_id = %id))]
    pub fn remove_product(&mut self, id: ProductId) -> Result<(), CartError> {
        let result = self
            .cart
            .removed(id)
            .ok_or(CartError::NotFound)
            .and_then(|next| self.commit(next));
        self.settle(Operation::Remove, result)
    }

    /// Set a line-item to an exact quantity.
    ///
    /// Requests for zero or fewer units are ignored and succeed without
    /// touching the cart or the inventory.
    ///
    /// # Errors
    ///
    /// - `CartError::OutOfStock` if stock is below the requested amount
    /// - `CartError::NotFound` if the product is not in the cart
    /// - `CartError::Unknown` for transport or storage failures
    #[instrument(skip_all, fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn update_product_amount(
        &mut self,
        request: UpdateProductAmount,
    ) -> Result<(), CartError> {
        if request.amount <= 0 {
            tracing::debug!("Ignoring non-positive amount");
            return Ok(());
        }

        let result = self.try_update_product_amount(request).await;
        self.settle(Operation::UpdateAmount, result)
    }

    async fn try_add_product(&mut self, id: ProductId) -> Result<(), CartError> {
        if let Some(existing) = self.cart.get(id) {
            let current = existing.amount;
            let stock = self.stock(id).await?;

            if current >= stock.amount {
                return Err(CartError::OutOfStock);
            }

            let next = self.cart.incremented(id).ok_or(CartError::OutOfStock)?;
            return self.commit(next);
        }

        let stock = self.stock(id).await?;
        if stock.amount == 0 {
            return Err(CartError::OutOfStock);
        }

        let product = self.inventory.product(id).await?;
        let next = self
            .cart
            .appended(LineItem::from_product(product, 1))
            .ok_or_else(|| CartError::Unknown(format!("Product {id} already in cart")))?;
        self.commit(next)
    }

    async fn try_update_product_amount(
        &mut self,
        request: UpdateProductAmount,
    ) -> Result<(), CartError> {
        let UpdateProductAmount { product_id, amount } = request;

        if !self.cart.contains(product_id) {
            return Err(CartError::NotFound);
        }

        // Anything beyond u32 cannot be in stock
        let amount = u32::try_from(amount).map_err(|_| CartError::OutOfStock)?;

        let stock = self.stock(product_id).await?;
        if !stock.covers(amount) {
            return Err(CartError::OutOfStock);
        }

        let next = self
            .cart
            .with_amount(product_id, amount)
            .ok_or(CartError::NotFound)?;
        self.commit(next)
    }

    /// Persist `next`, then make it the current cart.
    fn commit(&mut self, next: Cart) -> Result<(), CartError> {
        let bytes = serde_json::to_vec(&next)?;
        self.storage.set(CART_STORAGE_KEY, &bytes)?;
        self.cart = next;
        tracing::debug!(items = self.cart.len(), "Cart persisted");
        Ok(())
    }

    /// Report a failed operation to the shopper and pass the result through.
    fn settle(&self, operation: Operation, result: Result<(), CartError>) -> Result<(), CartError> {
        if let Err(err) = &result {
            match err {
                CartError::OutOfStock | CartError::NotFound => {
                    tracing::info!(?operation, error = %err, "Cart operation rejected");
                }
                CartError::Unknown(_) => {
                    tracing::error!(?operation, error = %err, "Cart operation failed");
                }
            }
            self.notifier.error(err.user_message(operation));
        }
        result
    }
}

/// Cloneable handle to a [`CartStore`] shared between tasks.
///
/// Operations are serialized by an async mutex, so two concurrent mutations
/// can never validate against the same snapshot and overwrite each other.
pub struct SharedCart<I, S, N = TracingNotifier> {
    inner: Arc<Mutex<CartStore<I, S, N>>>,
}

impl<I, S, N> Clone for SharedCart<I, S, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I, S, N> SharedCart<I, S, N>
where
    I: Inventory,
    S: KeyValueStore,
    N: Notifier,
{
    /// Wrap a store for shared use.
    #[must_use]
    pub fn new(store: CartStore<I, S, N>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Copy of the current cart.
    pub async fn snapshot(&self) -> Cart {
        self.inner.lock().await.cart().clone()
    }

    /// See [`CartStore::add_product`].
    ///
    /// # Errors
    ///
    /// Same as [`CartStore::add_product`].
    pub async fn add_product(&self, id: ProductId) -> Result<(), CartError> {
        self.inner.lock().await.add_product(id).await
    }

    /// See [`CartStore::remove_product`].
    ///
    /// # Errors
    ///
    /// Same as [`CartStore::remove_product`].
    pub async fn remove_product(&self, id: ProductId) -> Result<(), CartError> {
        self.inner.lock().await.remove_product(id)
    }

    /// See [`CartStore::update_product_amount`].
    ///
    /// # Errors
    ///
    /// Same as [`CartStore::update_product_amount`].
    pub async fn update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> Result<(), CartError> {
        self.inner.lock().await.update_product_amount(request).await
    }
}
