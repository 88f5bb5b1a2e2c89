//! RocketShoes cart library.
//!
//! A shopping-cart state container: it tracks selected products and
//! quantities, mirrors every successful change to a key-value store, and
//! validates quantities against the inventory service before committing.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{CartStore, InventoryClient, FileStore, TracingNotifier};
//!
//! let inventory = InventoryClient::new(&config.inventory)?;
//! let storage = FileStore::new(&config.storage_path);
//! let mut store = CartStore::open(inventory, storage, TracingNotifier)?;
//!
//! store.add_product(ProductId::new(42)).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod inventory;
pub mod notify;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError, InventoryConfig};
pub use error::{CartError, Operation};
pub use inventory::{Inventory, InventoryClient, InventoryError};
pub use notify::{Notifier, RecordingNotifier, TracingNotifier};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CART_STORAGE_KEY, CartStore, SharedCart, UpdateProductAmount};
