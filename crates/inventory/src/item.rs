use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use barstock_core::{DomainError, DomainResult, Entity, ItemId};

use crate::priority::{self, Priority, PriorityConfig};
use crate::stock::{StockChange, apply_stock_change};

/// A stocked product at the venue (one document in the inventory collection).
///
/// `priority` and `alert_threshold` are optional on the wire: documents written
/// by older clients may omit them, in which case the category table decides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_threshold: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_item_id: Option<String>,
    pub last_updated: DateTime<Utc>,
    pub updated_by: String,
}

/// Input for creating an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub alert_threshold: Option<i64>,
    #[serde(default)]
    pub pos_item_id: Option<String>,
}

/// Partial update: only the fields present are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub alert_threshold: Option<i64>,
    /// An empty string clears the mapping.
    #[serde(default)]
    pub pos_item_id: Option<String>,
}

impl NewItem {
    /// Whether explicit priority settings were supplied instead of category defaults.
    pub fn touches_priority(&self) -> bool {
        self.priority.is_some() || self.alert_threshold.is_some()
    }
}

impl ItemPatch {
    /// Whether the patch writes priority settings, which need the admin gate.
    pub fn touches_priority(&self) -> bool {
        self.priority.is_some() || self.alert_threshold.is_some()
    }
}

/// Priority-only update (admin surface).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityUpdate {
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub alert_threshold: Option<i64>,
}

fn require_text(value: &str, field: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn ensure_non_negative(value: i64, field: &str) -> DomainResult<()> {
    if value < 0 {
        return Err(DomainError::validation(format!("{field} cannot be negative")));
    }
    Ok(())
}

impl InventoryItem {
    /// Build a new item document, filling unset priority/threshold from the
    /// category table.
    pub fn create(id: ItemId, input: NewItem, actor: &str, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = require_text(&input.name, "name")?;
        let category = require_text(&input.category, "category")?;
        ensure_non_negative(input.stock, "stock")?;
        if let Some(t) = input.alert_threshold {
            ensure_non_negative(t, "alertThreshold")?;
        }

        let defaults = priority::category_default(&category);
        Ok(Self {
            id,
            name,
            category,
            stock: input.stock,
            priority: Some(input.priority.unwrap_or(defaults.priority)),
            alert_threshold: Some(input.alert_threshold.unwrap_or(defaults.threshold)),
            pos_item_id: input.pos_item_id.filter(|s| !s.trim().is_empty()),
            last_updated: now,
            updated_by: actor.to_string(),
        })
    }

    /// Effective `{priority, threshold}` for classification.
    pub fn priority_config(&self) -> PriorityConfig {
        priority::resolve(&self.category, self.priority, self.alert_threshold)
    }

    /// Apply a partial update. Validation happens before any field is written.
    pub fn apply_patch(&mut self, patch: ItemPatch, actor: &str, now: DateTime<Utc>) -> DomainResult<()> {
        let name = patch.name.as_deref().map(|n| require_text(n, "name")).transpose()?;
        let category = patch
            .category
            .as_deref()
            .map(|c| require_text(c, "category"))
            .transpose()?;
        if let Some(s) = patch.stock {
            ensure_non_negative(s, "stock")?;
        }
        if let Some(t) = patch.alert_threshold {
            ensure_non_negative(t, "alertThreshold")?;
        }

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(p) = patch.priority {
            self.priority = Some(p);
        }
        if let Some(t) = patch.alert_threshold {
            self.alert_threshold = Some(t);
        }
        if let Some(pos) = patch.pos_item_id {
            self.pos_item_id = Some(pos).filter(|s| !s.trim().is_empty());
        }
        self.touch(actor, now);
        Ok(())
    }

    pub fn apply_priority_update(
        &mut self,
        update: PriorityUpdate,
        actor: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if update.priority.is_none() && update.alert_threshold.is_none() {
            return Err(DomainError::validation("priority or alertThreshold is required"));
        }
        if let Some(t) = update.alert_threshold {
            ensure_non_negative(t, "alertThreshold")?;
        }
        if let Some(p) = update.priority {
            self.priority = Some(p);
        }
        if let Some(t) = update.alert_threshold {
            self.alert_threshold = Some(t);
        }
        self.touch(actor, now);
        Ok(())
    }

    /// Apply a stock delta. On error the item is left untouched.
    pub fn adjust_stock(&mut self, change: StockChange, actor: &str, now: DateTime<Utc>) -> DomainResult<i64> {
        let new_stock = apply_stock_change(self.stock, change)?;
        self.stock = new_stock;
        self.touch(actor, now);
        Ok(new_stock)
    }

    fn touch(&mut self, actor: &str, now: DateTime<Utc>) {
        self.last_updated = now;
        self.updated_by = actor.to_string();
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::StockAction;

    fn new_item(name: &str, category: &str) -> NewItem {
        NewItem {
            name: name.to_string(),
            category: category.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn create_applies_category_defaults() {
        let item = InventoryItem::create(ItemId::new(), new_item("Lime", "Garnishes"), "a@b.c", Utc::now()).unwrap();
        assert_eq!(item.priority, Some(Priority::Low));
        assert_eq!(item.alert_threshold, Some(2));
        assert_eq!(item.updated_by, "a@b.c");
    }

    #[test]
    fn create_keeps_explicit_priority() {
        let mut input = new_item("Gin", "spirits");
        input.priority = Some(Priority::Low);
        input.alert_threshold = Some(8);
        let item = InventoryItem::create(ItemId::new(), input, "x", Utc::now()).unwrap();
        assert_eq!(item.priority, Some(Priority::Low));
        assert_eq!(item.alert_threshold, Some(8));
    }

    #[test]
    fn create_requires_name_and_category() {
        let err = InventoryItem::create(ItemId::new(), new_item("  ", "beer"), "x", Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::validation("name is required"));
        let err = InventoryItem::create(ItemId::new(), new_item("IPA", ""), "x", Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::validation("category is required"));
    }

    #[test]
    fn patch_is_all_or_nothing() {
        let mut item = InventoryItem::create(ItemId::new(), new_item("IPA", "beer"), "x", Utc::now()).unwrap();
        let before = item.clone();
        let patch = ItemPatch {
            name: Some("Pale Ale".into()),
            stock: Some(-1),
            ..Default::default()
        };
        assert!(item.apply_patch(patch, "y", Utc::now()).is_err());
        assert_eq!(item, before);
    }

    #[test]
    fn empty_pos_item_id_clears_mapping() {
        let mut input = new_item("IPA", "beer");
        input.pos_item_id = Some("pos-1".into());
        let mut item = InventoryItem::create(ItemId::new(), input, "x", Utc::now()).unwrap();
        let patch = ItemPatch {
            pos_item_id: Some(String::new()),
            ..Default::default()
        };
        item.apply_patch(patch, "x", Utc::now()).unwrap();
        assert_eq!(item.pos_item_id, None);
    }

    #[test]
    fn patch_reports_priority_fields() {
        assert!(!ItemPatch::default().touches_priority());
        let threshold = ItemPatch {
            alert_threshold: Some(4),
            ..Default::default()
        };
        assert!(threshold.touches_priority());
        let priority = ItemPatch {
            priority: Some(Priority::High),
            ..Default::default()
        };
        assert!(priority.touches_priority());
    }

    #[test]
    fn subtracting_past_zero_fails_without_mutation() {
        let mut input = new_item("Vodka", "spirits");
        input.stock = 2;
        let mut item = InventoryItem::create(ItemId::new(), input, "x", Utc::now()).unwrap();
        let before = item.clone();

        let change = StockChange {
            quantity: 3,
            action: StockAction::Subtract,
        };
        assert!(item.adjust_stock(change, "y", Utc::now()).is_err());
        assert_eq!(item, before);
    }

    #[test]
    fn missing_priority_fields_deserialize_and_resolve_by_category() {
        let json = serde_json::json!({
            "id": ItemId::new().to_string(),
            "name": "Lager",
            "category": "beer",
            "stock": 4,
            "lastUpdated": "2024-01-01T00:00:00Z",
            "updatedBy": "seed"
        });
        let item: InventoryItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.priority, None);
        assert_eq!(item.priority_config(), priority::category_default("beer"));
    }
}
