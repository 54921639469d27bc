use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use barstock_core::DomainError;
use barstock_events::{EventBus, InventoryChange};
use barstock_inventory::ItemPatch;

use super::PosError;
use super::client::PosClient;
use super::config::{PosConfig, PosConfigStore, PosConfigUpdate, PosMapping};
use crate::inventory_service::{InventoryService, ServiceError};
use crate::store::InventoryStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosSyncStatus {
    pub items_synced: u64,
    pub sync_count: u64,
    pub last_sync: DateTime<Utc>,
}

/// Settings, sync and item mappings for the connected POS.
///
/// Config writes are serialized; a sync holds the lock for its whole round
/// trip so two concurrent syncs count once each.
pub struct PosService<C, S> {
    client: C,
    store: S,
    lock: Mutex<()>,
}

impl<C, S> PosService<C, S>
where
    C: PosClient,
    S: PosConfigStore,
{
    pub fn new(client: C, store: S) -> Self {
        Self {
            client,
            store,
            lock: Mutex::new(()),
        }
    }

    /// Stored settings with the key masked.
    pub async fn config(&self) -> Result<PosConfig, PosError> {
        Ok(self.store.load().await?.masked())
    }

    pub async fn save(&self, update: PosConfigUpdate) -> Result<PosConfig, PosError> {
        let _guard = self.lock.lock().await;
        let mut config = self.store.load().await?;
        config.apply_update(update).map_err(PosError::Validation)?;
        self.store.save(&config).await?;

        tracing::info!(system = ?config.system, "POS settings saved");
        Ok(config.masked())
    }

    /// Forget the connection entirely (mappings included).
    pub async fn disconnect(&self) -> Result<PosConfig, PosError> {
        let _guard = self.lock.lock().await;
        let config = PosConfig::default();
        self.store.save(&config).await?;

        tracing::info!("POS disconnected");
        Ok(config)
    }

    pub async fn sync(&self) -> Result<PosSyncStatus, PosError> {
        let _guard = self.lock.lock().await;
        let mut config = self.store.load().await?;
        if !config.connected {
            return Err(PosError::NotConnected);
        }

        let report = self.client.sync(&config).await?;
        config.sync_count = config.sync_count.saturating_add(report.items_synced);
        config.last_sync = Some(report.synced_at);
        self.store.save(&config).await?;

        tracing::info!(items = report.items_synced, total = config.sync_count, "POS sync complete");
        Ok(PosSyncStatus {
            items_synced: report.items_synced,
            sync_count: config.sync_count,
            last_sync: report.synced_at,
        })
    }

    pub async fn mappings(&self) -> Result<Vec<PosMapping>, PosError> {
        let config = self.store.load().await?;
        Ok(config
            .mapped_items
            .into_iter()
            .map(|(pos_item_id, item_id)| PosMapping { item_id, pos_item_id })
            .collect())
    }

    /// Link a POS item id to an inventory item, replacing whatever either
    /// side was linked to before.
    pub async fn map_item<IS, B>(
        &self,
        inventory: &InventoryService<IS, B>,
        mapping: PosMapping,
        actor: &str,
    ) -> Result<PosMapping, PosError>
    where
        IS: InventoryStore,
        B: EventBus<InventoryChange>,
    {
        let pos_item_id = mapping.pos_item_id.trim().to_string();
        if pos_item_id.is_empty() {
            return Err(PosError::Validation("posItemId is required".to_string()));
        }

        let _guard = self.lock.lock().await;
        let item = inventory.get(mapping.item_id).await.map_err(inventory_error)?;
        let mut config = self.store.load().await?;

        if let Some(previous) = config.mapped_items.insert(pos_item_id.clone(), item.id) {
            if previous != item.id {
                inventory
                    .unlink_pos_item(previous, &pos_item_id, actor)
                    .await
                    .map_err(inventory_error)?;
            }
        }
        if let Some(old_key) = item.pos_item_id.as_ref().filter(|k| **k != pos_item_id) {
            config.mapped_items.remove(old_key);
        }

        let patch = ItemPatch {
            pos_item_id: Some(pos_item_id.clone()),
            ..Default::default()
        };
        inventory.update(item.id, patch, actor).await.map_err(inventory_error)?;
        self.store.save(&config).await?;

        Ok(PosMapping {
            item_id: item.id,
            pos_item_id,
        })
    }

    /// Remove a mapping. Returns `false` when the POS id was not mapped.
    pub async fn unmap_item<IS, B>(
        &self,
        inventory: &InventoryService<IS, B>,
        pos_item_id: &str,
        actor: &str,
    ) -> Result<bool, PosError>
    where
        IS: InventoryStore,
        B: EventBus<InventoryChange>,
    {
        let _guard = self.lock.lock().await;
        let mut config = self.store.load().await?;
        let Some(item_id) = config.mapped_items.remove(pos_item_id) else {
            return Ok(false);
        };
        inventory
            .unlink_pos_item(item_id, pos_item_id, actor)
            .await
            .map_err(inventory_error)?;
        self.store.save(&config).await?;
        Ok(true)
    }
}

fn inventory_error(err: ServiceError) -> PosError {
    match err {
        ServiceError::Domain(DomainError::NotFound) => PosError::Validation("inventory item not found".to_string()),
        ServiceError::Domain(e) => PosError::Validation(e.to_string()),
        ServiceError::Store(e) => PosError::Store(e),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use barstock_core::ItemId;
    use barstock_events::InMemoryEventBus;
    use barstock_inventory::NewItem;

    use super::*;
    use crate::pos::{InMemoryPosConfigStore, SimulatedPosClient};
    use crate::store::InMemoryInventoryStore;

    type Inventory = InventoryService<Arc<InMemoryInventoryStore>, Arc<InMemoryEventBus<InventoryChange>>>;

    fn services() -> (PosService<SimulatedPosClient, InMemoryPosConfigStore>, Inventory) {
        let pos = PosService::new(SimulatedPosClient::new(Duration::ZERO), InMemoryPosConfigStore::new());
        let inventory = InventoryService::new(Arc::new(InMemoryInventoryStore::new()), Arc::new(InMemoryEventBus::new()));
        (pos, inventory)
    }

    fn connect() -> PosConfigUpdate {
        PosConfigUpdate {
            system: "square".to_string(),
            api_key: Some("key-9876".to_string()),
            ..Default::default()
        }
    }

    async fn add_item(inventory: &Inventory, name: &str) -> ItemId {
        let input = NewItem {
            name: name.to_string(),
            category: "beer".to_string(),
            stock: 12,
            ..Default::default()
        };
        inventory.create(input, "mgr").await.unwrap().id
    }

    #[tokio::test]
    async fn sync_requires_connection() {
        let (pos, _) = services();
        assert!(matches!(pos.sync().await, Err(PosError::NotConnected)));
    }

    #[tokio::test]
    async fn sync_accumulates_count() {
        let (pos, _) = services();
        pos.save(connect()).await.unwrap();

        let first = pos.sync().await.unwrap();
        let second = pos.sync().await.unwrap();
        assert_eq!(second.sync_count, first.items_synced + second.items_synced);
        assert!(pos.config().await.unwrap().last_sync.is_some());
    }

    #[tokio::test]
    async fn saved_key_is_never_returned_in_full() {
        let (pos, _) = services();
        let saved = pos.save(connect()).await.unwrap();
        assert_eq!(saved.api_key.as_deref(), Some("****9876"));
        assert_eq!(pos.config().await.unwrap().api_key.as_deref(), Some("****9876"));
    }

    #[tokio::test]
    async fn disconnect_resets_settings() {
        let (pos, _) = services();
        pos.save(connect()).await.unwrap();
        let config = pos.disconnect().await.unwrap();
        assert_eq!(config, PosConfig::default());
        assert!(matches!(pos.sync().await, Err(PosError::NotConnected)));
    }

    #[tokio::test]
    async fn mapping_links_item_and_can_be_removed() {
        let (pos, inventory) = services();
        let id = add_item(&inventory, "Lager").await;

        let mapping = PosMapping {
            item_id: id,
            pos_item_id: "sq-100".to_string(),
        };
        pos.map_item(&inventory, mapping.clone(), "mgr").await.unwrap();
        assert_eq!(pos.mappings().await.unwrap(), vec![mapping]);
        assert_eq!(inventory.get(id).await.unwrap().pos_item_id.as_deref(), Some("sq-100"));

        assert!(pos.unmap_item(&inventory, "sq-100", "mgr").await.unwrap());
        assert!(pos.mappings().await.unwrap().is_empty());
        assert_eq!(inventory.get(id).await.unwrap().pos_item_id, None);
        assert!(!pos.unmap_item(&inventory, "sq-100", "mgr").await.unwrap());
    }

    #[tokio::test]
    async fn remapping_a_pos_id_moves_the_link() {
        let (pos, inventory) = services();
        let lager = add_item(&inventory, "Lager").await;
        let stout = add_item(&inventory, "Stout").await;

        for item_id in [lager, stout] {
            let mapping = PosMapping {
                item_id,
                pos_item_id: "sq-1".to_string(),
            };
            pos.map_item(&inventory, mapping, "mgr").await.unwrap();
        }

        assert_eq!(inventory.get(lager).await.unwrap().pos_item_id, None);
        assert_eq!(inventory.get(stout).await.unwrap().pos_item_id.as_deref(), Some("sq-1"));
        assert_eq!(pos.mappings().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unmapping_a_stale_id_keeps_the_current_link() {
        let (pos, inventory) = services();
        let id = add_item(&inventory, "Lager").await;
        let mapping = PosMapping {
            item_id: id,
            pos_item_id: "sq-a".to_string(),
        };
        pos.map_item(&inventory, mapping, "mgr").await.unwrap();

        let relink = ItemPatch {
            pos_item_id: Some("sq-z".to_string()),
            ..Default::default()
        };
        inventory.update(id, relink, "mgr").await.unwrap();

        assert!(pos.unmap_item(&inventory, "sq-a", "mgr").await.unwrap());
        assert_eq!(inventory.get(id).await.unwrap().pos_item_id.as_deref(), Some("sq-z"));
    }

    #[tokio::test]
    async fn unmapping_after_item_deleted_still_removes_mapping() {
        let (pos, inventory) = services();
        let id = add_item(&inventory, "Cider").await;
        let mapping = PosMapping {
            item_id: id,
            pos_item_id: "sq-c".to_string(),
        };
        pos.map_item(&inventory, mapping, "mgr").await.unwrap();
        inventory.delete(id, "mgr").await.unwrap();

        assert!(pos.unmap_item(&inventory, "sq-c", "mgr").await.unwrap());
        assert!(pos.mappings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mapping_unknown_item_is_rejected() {
        let (pos, inventory) = services();
        let mapping = PosMapping {
            item_id: ItemId::new(),
            pos_item_id: "sq-1".to_string(),
        };
        assert!(matches!(
            pos.map_item(&inventory, mapping, "mgr").await,
            Err(PosError::Validation(_))
        ));
    }
}
