//! Inventory domain module.
//!
//! This crate contains the business rules for venue stock, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage):
//! - item documents and their validated mutations
//! - priority/threshold resolution with per-category defaults
//! - stock status classification and alert generation
//! - table filtering/sorting and CSV export

pub mod alerts;
pub mod classifier;
pub mod export;
pub mod item;
pub mod priority;
pub mod query;
pub mod stock;

pub use alerts::{
    Alert, AlertCounts, AlertSummary, MAX_DISPLAYED_ALERTS, ShoppingListEntry, estimate_days_until_empty,
    generate_alerts, shopping_list, status_message, suggested_quantity,
};
pub use classifier::{StockStatus, classify, classify_item};
pub use export::{alerts_csv, shopping_list_csv};
pub use item::{InventoryItem, ItemPatch, NewItem, PriorityUpdate};
pub use priority::{DEFAULT_PRIORITY_CONFIG, Priority, PriorityConfig, category_default};
pub use query::{ClassifiedItem, ItemFilter, classify_table};
pub use stock::{StockAction, StockChange, apply_stock_change};
