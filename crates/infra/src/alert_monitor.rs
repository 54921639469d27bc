//! Live alert view: recomputed from the store whenever the inventory changes.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;

use barstock_events::{InventoryChange, RecvError, Subscription};
use barstock_inventory::{Alert, AlertCounts, InventoryItem, generate_alerts};

use crate::store::{InventoryStore, StoreError};

/// Alerts derived from one consistent read of the collection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSnapshot {
    #[serde(skip)]
    pub items: Vec<InventoryItem>,
    pub alerts: Vec<Alert>,
    pub counts: AlertCounts,
    pub refreshed_at: DateTime<Utc>,
    /// Incremented on every recompute.
    pub version: u64,
}

impl AlertSnapshot {
    fn build(items: Vec<InventoryItem>, version: u64) -> Self {
        Self {
            alerts: generate_alerts(&items),
            counts: AlertCounts::tally(&items),
            items,
            refreshed_at: Utc::now(),
            version,
        }
    }
}

/// Holds the latest [`AlertSnapshot`] and replaces it wholesale on change.
pub struct AlertMonitor<S> {
    store: S,
    current: RwLock<Arc<AlertSnapshot>>,
}

impl<S: InventoryStore + 'static> AlertMonitor<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            current: RwLock::new(Arc::new(AlertSnapshot::build(Vec::new(), 0))),
        }
    }

    pub fn snapshot(&self) -> Arc<AlertSnapshot> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Reload every item and recompute. On a store error the previous
    /// snapshot stays in place.
    pub async fn refresh(&self) -> Result<Arc<AlertSnapshot>, StoreError> {
        let items = self.store.list().await?;
        let version = self.snapshot().version + 1;
        let next = Arc::new(AlertSnapshot::build(items, version));

        match self.current.write() {
            Ok(mut guard) => *guard = next.clone(),
            Err(poisoned) => *poisoned.into_inner() = next.clone(),
        }
        tracing::debug!(version, alerts = next.alerts.len(), "alert snapshot refreshed");
        Ok(next)
    }

    /// Recompute after every change received on `subscription` until the bus
    /// closes. Bursts of queued changes collapse into one reload.
    pub fn spawn(self: Arc<Self>, mut subscription: Subscription<InventoryChange>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match subscription.recv().await {
                    Ok(_) => {}
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "alert monitor lagged; reloading");
                    }
                    Err(RecvError::Closed) => break,
                }
                while let Some(Ok(_) | Err(RecvError::Lagged(_))) = subscription.try_recv() {}

                if let Err(e) = self.refresh().await {
                    tracing::error!(error = %e, "alert refresh failed");
                }
            }
            tracing::info!("alert monitor stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use barstock_events::{ChangeKind, EventBus, InMemoryEventBus};
    use barstock_inventory::{NewItem, Priority};
    use barstock_core::ItemId;

    use super::*;
    use crate::store::InMemoryInventoryStore;

    fn item(name: &str, stock: i64) -> InventoryItem {
        let input = NewItem {
            name: name.to_string(),
            category: "spirits".to_string(),
            stock,
            priority: Some(Priority::High),
            alert_threshold: Some(3),
            ..Default::default()
        };
        InventoryItem::create(ItemId::new(), input, "test", Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn refresh_recomputes_from_store() {
        let store = Arc::new(InMemoryInventoryStore::with_items([item("Gin", 0), item("Rum", 50)]));
        let monitor = AlertMonitor::new(store);
        assert!(monitor.snapshot().alerts.is_empty());

        let snap = monitor.refresh().await.unwrap();
        assert_eq!(snap.alerts.len(), 1);
        assert_eq!(snap.counts.urgent, 1);
        assert_eq!(snap.counts.optimal, 1);
        assert_eq!(snap.version, 1);
    }

    #[tokio::test]
    async fn spawned_monitor_follows_changes() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let bus: InMemoryEventBus<InventoryChange> = InMemoryEventBus::new();
        let monitor = Arc::new(AlertMonitor::new(store.clone()));
        let handle = monitor.clone().spawn(bus.subscribe());

        let low = item("Tequila", 1);
        store.put(&low).await.unwrap();
        bus.publish(InventoryChange::new(ChangeKind::Created, low.id, "test", Utc::now()))
            .unwrap();

        let mut seen = false;
        for _ in 0..50 {
            if monitor.snapshot().alerts.len() == 1 {
                seen = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(seen, "monitor never picked up the change");

        drop(bus);
        handle.await.unwrap();
    }
}
