//! Document storage for inventory items.
//!
//! The store is a dumb collection: it persists whole documents and never
//! applies business rules. Validation happens in `barstock-inventory` before a
//! document reaches it.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use barstock_core::ItemId;
use barstock_inventory::InventoryItem;

pub use in_memory::InMemoryInventoryStore;
#[cfg(feature = "postgres")]
pub use postgres::{PostgresInventoryStore, PostgresPosConfigStore, ensure_schema};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("stored document is malformed: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn list(&self) -> Result<Vec<InventoryItem>, StoreError>;

    async fn get(&self, id: ItemId) -> Result<Option<InventoryItem>, StoreError>;

    /// Insert or replace the whole document.
    async fn put(&self, item: &InventoryItem) -> Result<(), StoreError>;

    /// Returns whether a document was removed.
    async fn delete(&self, id: ItemId) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn list(&self) -> Result<Vec<InventoryItem>, StoreError> {
        (**self).list().await
    }

    async fn get(&self, id: ItemId) -> Result<Option<InventoryItem>, StoreError> {
        (**self).get(id).await
    }

    async fn put(&self, item: &InventoryItem) -> Result<(), StoreError> {
        (**self).put(item).await
    }

    async fn delete(&self, id: ItemId) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }
}
