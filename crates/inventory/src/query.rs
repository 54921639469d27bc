use serde::{Deserialize, Serialize};

use crate::alerts::table_order;
use crate::classifier::{StockStatus, classify};
use crate::item::InventoryItem;
use crate::priority::Priority;

/// List filters. All string matching is case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub category: Option<String>,
    pub status: Option<StockStatus>,
    pub search: Option<String>,
}

impl ItemFilter {
    fn matches(&self, item: &InventoryItem, status: StockStatus) -> bool {
        if let Some(category) = self.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            if !item.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(wanted) = self.status {
            if status != wanted {
                return false;
            }
        }
        if let Some(needle) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = needle.to_lowercase();
            if !item.name.to_lowercase().contains(&needle) && !item.category.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}

/// A table row: the stored item plus its derived status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedItem {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub status: StockStatus,
    pub effective_priority: Priority,
    pub effective_threshold: i64,
}

/// Classify, filter and sort items for the inventory table.
pub fn classify_table(items: &[InventoryItem], filter: &ItemFilter) -> Vec<ClassifiedItem> {
    let mut rows: Vec<ClassifiedItem> = items
        .iter()
        .filter_map(|item| {
            let config = item.priority_config();
            let status = classify(item.stock, config);
            filter.matches(item, status).then(|| ClassifiedItem {
                item: item.clone(),
                status,
                effective_priority: config.priority,
                effective_threshold: config.threshold,
            })
        })
        .collect();

    rows.sort_by(|a, b| table_order(a.status, &a.item, b.status, &b.item));
    rows
}
