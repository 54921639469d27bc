//! Inventory CRUD over a document store, with change notifications.

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;

use barstock_core::{DomainError, DomainResult, ItemId};
use barstock_events::{ChangeKind, EventBus, InventoryChange, Subscription};
use barstock_inventory::{
    ClassifiedItem, InventoryItem, ItemFilter, ItemPatch, NewItem, PriorityUpdate, StockChange, classify_table,
};

use crate::store::{InventoryStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Application service for inventory documents.
///
/// Every committed write publishes an [`InventoryChange`]. Writes are
/// serialized in-process so a read-modify-write (stock delta) cannot
/// interleave with another one; across processes the store's last write wins.
pub struct InventoryService<S, B> {
    store: S,
    bus: B,
    write_lock: Mutex<()>,
}

impl<S, B> InventoryService<S, B>
where
    S: InventoryStore,
    B: EventBus<InventoryChange>,
{
    pub fn new(store: S, bus: B) -> Self {
        Self {
            store,
            bus,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn subscribe(&self) -> Subscription<InventoryChange> {
        self.bus.subscribe()
    }

    /// Every item, unsorted.
    pub async fn all(&self) -> Result<Vec<InventoryItem>, ServiceError> {
        Ok(self.store.list().await?)
    }

    /// Classified, filtered and table-sorted items.
    pub async fn list(&self, filter: &ItemFilter) -> Result<Vec<ClassifiedItem>, ServiceError> {
        let items = self.store.list().await?;
        Ok(classify_table(&items, filter))
    }

    pub async fn get(&self, id: ItemId) -> Result<InventoryItem, ServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::Domain(DomainError::not_found()))
    }

    pub async fn create(&self, input: NewItem, actor: &str) -> Result<InventoryItem, ServiceError> {
        let item = InventoryItem::create(ItemId::new(), input, actor, Utc::now())?;

        let _guard = self.write_lock.lock().await;
        self.store.put(&item).await?;
        self.notify(ChangeKind::Created, item.id, actor);

        tracing::info!(item_id = %item.id, name = %item.name, actor, "inventory item created");
        Ok(item)
    }

    pub async fn update(&self, id: ItemId, patch: ItemPatch, actor: &str) -> Result<InventoryItem, ServiceError> {
        self.mutate(id, ChangeKind::Updated, actor, |item| item.apply_patch(patch, actor, Utc::now()))
            .await
    }

    pub async fn update_priority(
        &self,
        id: ItemId,
        update: PriorityUpdate,
        actor: &str,
    ) -> Result<InventoryItem, ServiceError> {
        self.mutate(id, ChangeKind::Updated, actor, |item| {
            item.apply_priority_update(update, actor, Utc::now())
        })
        .await
    }

    /// Apply `{quantity, action}`. Fails, leaving the stored document as it
    /// was, when the result would be negative.
    pub async fn adjust_stock(
        &self,
        id: ItemId,
        change: StockChange,
        actor: &str,
    ) -> Result<InventoryItem, ServiceError> {
        let item = self
            .mutate(id, ChangeKind::StockAdjusted, actor, |item| {
                item.adjust_stock(change, actor, Utc::now()).map(|_| ())
            })
            .await?;
        tracing::info!(item_id = %id, stock = item.stock, ?change, actor, "stock adjusted");
        Ok(item)
    }

    /// Clear the item's `posItemId` if it is still `pos_item_id`. Returns
    /// whether the link was cleared; a missing item counts as not linked.
    pub async fn unlink_pos_item(&self, id: ItemId, pos_item_id: &str, actor: &str) -> Result<bool, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let Some(mut item) = self.store.get(id).await? else {
            return Ok(false);
        };
        if item.pos_item_id.as_deref() != Some(pos_item_id) {
            return Ok(false);
        }

        let patch = ItemPatch {
            pos_item_id: Some(String::new()),
            ..Default::default()
        };
        item.apply_patch(patch, actor, Utc::now())?;
        self.store.put(&item).await?;
        self.notify(ChangeKind::Updated, id, actor);
        Ok(true)
    }

    pub async fn delete(&self, id: ItemId, actor: &str) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;
        if !self.store.delete(id).await? {
            return Err(DomainError::not_found().into());
        }
        self.notify(ChangeKind::Deleted, id, actor);

        tracing::info!(item_id = %id, actor, "inventory item deleted");
        Ok(())
    }

    async fn mutate<F>(&self, id: ItemId, kind: ChangeKind, actor: &str, f: F) -> Result<InventoryItem, ServiceError>
    where
        F: FnOnce(&mut InventoryItem) -> DomainResult<()>,
    {
        let _guard = self.write_lock.lock().await;
        let mut item = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::Domain(DomainError::not_found()))?;

        f(&mut item)?;
        self.store.put(&item).await?;
        self.notify(kind, id, actor);
        Ok(item)
    }

    fn notify(&self, kind: ChangeKind, id: ItemId, actor: &str) {
        let change = InventoryChange::new(kind, id, actor, Utc::now());
        if let Err(e) = self.bus.publish(change) {
            // The write is committed; subscribers resync on their next change.
            tracing::warn!(item_id = %id, error = ?e, "failed to publish inventory change");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use barstock_events::InMemoryEventBus;
    use barstock_inventory::{Priority, StockAction, StockStatus};

    use super::*;
    use crate::store::InMemoryInventoryStore;

    type TestService = InventoryService<Arc<InMemoryInventoryStore>, Arc<InMemoryEventBus<InventoryChange>>>;

    fn service() -> TestService {
        InventoryService::new(Arc::new(InMemoryInventoryStore::new()), Arc::new(InMemoryEventBus::new()))
    }

    fn new_item(name: &str, category: &str, stock: i64) -> NewItem {
        NewItem {
            name: name.to_string(),
            category: category.to_string(),
            stock,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_publishes_and_applies_defaults() {
        let svc = service();
        let mut sub = svc.subscribe();

        let item = svc.create(new_item("Hendrick's", "Spirits", 10), "mgr@bar.test").await.unwrap();
        assert_eq!(item.priority, Some(Priority::High));
        assert_eq!(item.alert_threshold, Some(3));

        let change = sub.recv().await.unwrap();
        assert_eq!(change.kind, ChangeKind::Created);
        assert_eq!(change.item_id, item.id);
        assert_eq!(change.actor, "mgr@bar.test");
    }

    #[tokio::test]
    async fn overdrawn_stock_is_rejected_and_not_stored() {
        let svc = service();
        let item = svc.create(new_item("Campari", "spirits", 2), "x").await.unwrap();
        let mut sub = svc.subscribe();

        let change = StockChange {
            quantity: 5,
            action: StockAction::Subtract,
        };
        let err = svc.adjust_stock(item.id, change, "staff@bar.test").await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::InvariantViolation(_))));

        assert_eq!(svc.get(item.id).await.unwrap().stock, 2);
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn adjust_stamps_actor() {
        let svc = service();
        let item = svc.create(new_item("Aperol", "spirits", 2), "mgr").await.unwrap();
        let change = StockChange {
            quantity: 4,
            action: StockAction::Add,
        };
        let updated = svc.adjust_stock(item.id, change, "staff@bar.test").await.unwrap();
        assert_eq!(updated.stock, 6);
        assert_eq!(updated.updated_by, "staff@bar.test");
    }

    #[tokio::test]
    async fn missing_items_are_not_found() {
        let svc = service();
        let id = ItemId::new();
        assert!(matches!(svc.get(id).await, Err(ServiceError::Domain(DomainError::NotFound))));
        assert!(matches!(svc.delete(id, "x").await, Err(ServiceError::Domain(DomainError::NotFound))));
        assert!(matches!(
            svc.update(id, ItemPatch::default(), "x").await,
            Err(ServiceError::Domain(DomainError::NotFound))
        ));
    }

    #[tokio::test]
    async fn list_filters_by_derived_status() {
        let svc = service();
        svc.create(new_item("Lager", "beer", 1), "x").await.unwrap();
        svc.create(new_item("Stout", "beer", 100), "x").await.unwrap();

        let filter = ItemFilter {
            status: Some(StockStatus::Urgent),
            ..Default::default()
        };
        let rows = svc.list(&filter).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item.name, "Lager");
    }

    #[tokio::test]
    async fn priority_update_changes_classification() {
        let svc = service();
        let item = svc.create(new_item("Lemons", "garnishes", 2), "x").await.unwrap();
        let update = PriorityUpdate {
            priority: Some(Priority::High),
            alert_threshold: None,
        };
        let updated = svc.update_priority(item.id, update, "admin").await.unwrap();
        assert_eq!(barstock_inventory::classify_item(&updated), StockStatus::Urgent);
    }
}
