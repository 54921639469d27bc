use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use barstock_core::{Entity, ItemId};
use barstock_inventory::InventoryItem;

use super::{InventoryStore, StoreError};

/// In-memory inventory collection for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    inner: RwLock<HashMap<ItemId, InventoryItem>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = InventoryItem>) -> Self {
        Self {
            inner: RwLock::new(items.into_iter().map(|i| (*i.id(), i)).collect()),
        }
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn list(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().cloned().collect())
    }

    async fn get(&self, id: ItemId) -> Result<Option<InventoryItem>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn put(&self, item: &InventoryItem) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(*item.id(), item.clone());
        Ok(())
    }

    async fn delete(&self, id: ItemId) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use barstock_inventory::NewItem;

    use super::*;

    fn item(name: &str) -> InventoryItem {
        let input = NewItem {
            name: name.to_string(),
            category: "wine".to_string(),
            ..Default::default()
        };
        InventoryItem::create(ItemId::new(), input, "seed", Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn put_get_delete() {
        let store = InMemoryInventoryStore::new();
        let merlot = item("Merlot");

        store.put(&merlot).await.unwrap();
        assert_eq!(store.get(merlot.id).await.unwrap(), Some(merlot.clone()));
        assert_eq!(store.list().await.unwrap().len(), 1);

        assert!(store.delete(merlot.id).await.unwrap());
        assert!(!store.delete(merlot.id).await.unwrap());
        assert_eq!(store.get(merlot.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_replaces_whole_document() {
        let mut rioja = item("Rioja");
        let store = InMemoryInventoryStore::with_items([rioja.clone()]);

        rioja.stock = 12;
        store.put(&rioja).await.unwrap();
        assert_eq!(store.get(rioja.id).await.unwrap().unwrap().stock, 12);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
