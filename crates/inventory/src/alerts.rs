//! Alert generation over a classified inventory.
//!
//! Alerts are derived and ephemeral: they are rebuilt from the current item
//! list on every change and never stored.

use serde::{Deserialize, Serialize};

use barstock_core::ItemId;

use crate::classifier::{StockStatus, classify};
use crate::item::InventoryItem;
use crate::priority::Priority;

/// How many alerts a dashboard shows at once.
pub const MAX_DISPLAYED_ALERTS: usize = 6;

/// Assumed consumption rate for the days-until-empty estimate.
// TODO: derive from stock movement history once sales data is synced from the POS.
const ASSUMED_DAILY_USAGE: i64 = 2;

const MIN_REORDER_QUANTITY: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub item: InventoryItem,
    pub status: StockStatus,
    pub message: String,
    pub priority: Priority,
    pub threshold: i64,
    pub days_until_empty: i64,
    pub suggested_quantity: i64,
}

pub fn status_message(status: StockStatus) -> &'static str {
    match status {
        StockStatus::Urgent => "Critically low stock - reorder immediately",
        StockStatus::Normal => "Stock is running low - reorder soon",
        StockStatus::Info => "Stock below threshold - monitor levels",
        StockStatus::Good => "Stock level is healthy",
        StockStatus::Optimal => "Stock level is optimal",
    }
}

/// `max(1, ceil(stock / 2))`.
pub fn estimate_days_until_empty(stock: i64) -> i64 {
    let stock = stock.max(0);
    let days = stock / ASSUMED_DAILY_USAGE + i64::from(stock % ASSUMED_DAILY_USAGE != 0);
    days.max(1)
}

/// `max(10, threshold * 3 - stock)`.
pub fn suggested_quantity(stock: i64, threshold: i64) -> i64 {
    threshold
        .saturating_mul(3)
        .saturating_sub(stock)
        .max(MIN_REORDER_QUANTITY)
}

/// Ordering shared by alerts and the full inventory table: status rank, then
/// product name (case-insensitive), then id for a total order.
pub(crate) fn table_order(
    a_status: StockStatus,
    a: &InventoryItem,
    b_status: StockStatus,
    b: &InventoryItem,
) -> core::cmp::Ordering {
    a_status
        .rank()
        .cmp(&b_status.rank())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.id.cmp(&b.id))
}

/// Build alerts for every item needing attention, sorted URGENT → NORMAL → INFO.
pub fn generate_alerts(items: &[InventoryItem]) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = items
        .iter()
        .filter_map(|item| {
            let config = item.priority_config();
            let status = classify(item.stock, config);
            if !status.needs_attention() {
                return None;
            }
            Some(Alert {
                item: item.clone(),
                status,
                message: status_message(status).to_string(),
                priority: config.priority,
                threshold: config.threshold,
                days_until_empty: estimate_days_until_empty(item.stock),
                suggested_quantity: suggested_quantity(item.stock, config.threshold),
            })
        })
        .collect();

    alerts.sort_by(|a, b| table_order(a.status, &a.item, b.status, &b.item));
    alerts
}

/// Dashboard view: the first [`MAX_DISPLAYED_ALERTS`] alerts plus a count of
/// the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub alerts: Vec<Alert>,
    pub remaining: usize,
    pub total: usize,
}

impl AlertSummary {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let shown = alerts.len().min(MAX_DISPLAYED_ALERTS);
        Self {
            alerts: alerts[..shown].to_vec(),
            remaining: alerts.len() - shown,
            total: alerts.len(),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlertCounts {
    pub urgent: usize,
    pub normal: usize,
    pub info: usize,
    pub good: usize,
    pub optimal: usize,
    pub total: usize,
}

impl AlertCounts {
    pub fn tally(items: &[InventoryItem]) -> Self {
        let mut counts = Self::default();
        for item in items {
            match crate::classifier::classify_item(item) {
                StockStatus::Urgent => counts.urgent += 1,
                StockStatus::Normal => counts.normal += 1,
                StockStatus::Info => counts.info += 1,
                StockStatus::Good => counts.good += 1,
                StockStatus::Optimal => counts.optimal += 1,
            }
            counts.total += 1;
        }
        counts
    }

    pub fn needing_attention(&self) -> usize {
        self.urgent + self.normal + self.info
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListEntry {
    pub item_id: ItemId,
    pub product: String,
    pub category: String,
    pub current_stock: i64,
    pub suggested_quantity: i64,
    pub priority: Priority,
    pub status: StockStatus,
}

/// One purchase line per alert, in alert order.
pub fn shopping_list(alerts: &[Alert]) -> Vec<ShoppingListEntry> {
    alerts
        .iter()
        .map(|a| ShoppingListEntry {
            item_id: a.item.id,
            product: a.item.name.clone(),
            category: a.item.category.clone(),
            current_stock: a.item.stock,
            suggested_quantity: a.suggested_quantity,
            priority: a.priority,
            status: a.status,
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::test_support::item;
    use super::*;

    #[test]
    fn days_until_empty_rounds_up_with_floor_of_one() {
        assert_eq!(estimate_days_until_empty(0), 1);
        assert_eq!(estimate_days_until_empty(1), 1);
        assert_eq!(estimate_days_until_empty(9), 5);
        assert_eq!(estimate_days_until_empty(10), 5);
    }

    #[test]
    fn suggested_quantity_never_below_ten() {
        assert_eq!(suggested_quantity(20, 3), 10);
        assert_eq!(suggested_quantity(0, 3), 10);
        assert_eq!(suggested_quantity(1, 10), 29);
    }

    #[test]
    fn mixed_batch_yields_three_sorted_alerts() {
        let items = vec![
            item("Optimal Gin", 50, Priority::High, 5),
            item("Info Limes", 1, Priority::Low, 2),
            item("Good Rum", 8, Priority::High, 5),
            item("Normal Tonic", 3, Priority::Medium, 5),
            item("Urgent Vodka", 0, Priority::High, 3),
        ];

        let alerts = generate_alerts(&items);
        let names: Vec<&str> = alerts.iter().map(|a| a.item.name.as_str()).collect();
        assert_eq!(names, ["Urgent Vodka", "Normal Tonic", "Info Limes"]);

        let statuses: Vec<StockStatus> = alerts.iter().map(|a| a.status).collect();
        assert_eq!(statuses, [StockStatus::Urgent, StockStatus::Normal, StockStatus::Info]);
        assert_eq!(alerts[0].message, status_message(StockStatus::Urgent));
    }

    #[test]
    fn same_status_ties_break_by_name() {
        let items = vec![
            item("whisky", 0, Priority::High, 3),
            item("Absinthe", 1, Priority::High, 3),
            item("Mezcal", 2, Priority::High, 3),
        ];
        let names: Vec<String> = generate_alerts(&items).into_iter().map(|a| a.item.name).collect();
        assert_eq!(names, ["Absinthe", "Mezcal", "whisky"]);
    }

    #[test]
    fn summary_caps_display_but_keeps_count() {
        let items: Vec<InventoryItem> = (0..9).map(|i| item(&format!("item {i}"), 0, Priority::High, 3)).collect();
        let alerts = generate_alerts(&items);
        let summary = AlertSummary::from_alerts(&alerts);

        assert_eq!(alerts.len(), 9);
        assert_eq!(summary.alerts.len(), MAX_DISPLAYED_ALERTS);
        assert_eq!(summary.remaining, 3);
        assert_eq!(summary.total, 9);
    }

    #[test]
    fn counts_cover_every_status() {
        let items = vec![
            item("a", 0, Priority::High, 3),
            item("b", 0, Priority::Medium, 3),
            item("c", 0, Priority::Low, 3),
            item("d", 5, Priority::Low, 3),
            item("e", 50, Priority::Low, 3),
        ];
        let counts = AlertCounts::tally(&items);
        assert_eq!((counts.urgent, counts.normal, counts.info, counts.good, counts.optimal), (1, 1, 1, 1, 1));
        assert_eq!(counts.total, 5);
        assert_eq!(counts.needing_attention(), 3);
    }

    #[test]
    fn shopping_list_mirrors_alert_order() {
        let items = vec![item("Tonic", 2, Priority::Medium, 4), item("Vodka", 1, Priority::High, 3)];
        let list = shopping_list(&generate_alerts(&items));
        assert_eq!(list[0].product, "Vodka");
        assert_eq!(list[0].suggested_quantity, 10);
        assert_eq!(list[1].product, "Tonic");
        assert_eq!(list[1].current_stock, 2);
    }
}
