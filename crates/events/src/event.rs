use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use barstock_core::ItemId;

/// A notification that something happened.
///
/// Events are immutable facts; consumers treat them as invalidation signals
/// and re-read state from the store rather than applying payloads.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "inventory.item.created").
    fn event_type(&self) -> &'static str;

    /// When the change was committed.
    fn occurred_at(&self) -> DateTime<Utc>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    StockAdjusted,
    Deleted,
}

/// Something in the inventory collection changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryChange {
    pub event_id: Uuid,
    pub kind: ChangeKind,
    pub item_id: ItemId,
    pub actor: String,
    pub occurred_at: DateTime<Utc>,
}

impl InventoryChange {
    pub fn new(kind: ChangeKind, item_id: ItemId, actor: impl Into<String>, occurred_at: DateTime<Utc>) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            kind,
            item_id,
            actor: actor.into(),
            occurred_at,
        }
    }
}

impl Event for InventoryChange {
    fn event_type(&self) -> &'static str {
        match self.kind {
            ChangeKind::Created => "inventory.item.created",
            ChangeKind::Updated => "inventory.item.updated",
            ChangeKind::StockAdjusted => "inventory.item.stock_adjusted",
            ChangeKind::Deleted => "inventory.item.deleted",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
