//! Demo inventory for a fresh development store.

use chrono::Utc;

use barstock_core::ItemId;
use barstock_inventory::{InventoryItem, NewItem};

use crate::store::{InventoryStore, StoreError};

const SEED_ACTOR: &str = "seed";

// (name, category, stock)
const DEMO_ITEMS: &[(&str, &str, i64)] = &[
    ("Grey Goose Vodka", "spirits", 2),
    ("Hendrick's Gin", "spirits", 8),
    ("Jack Daniel's", "spirits", 1),
    ("Patron Silver", "spirits", 12),
    ("Heineken", "beer", 24),
    ("Guinness", "beer", 5),
    ("House Red", "wine", 3),
    ("Prosecco", "wine", 10),
    ("Tonic Water", "mixers", 4),
    ("Ginger Beer", "mixers", 30),
    ("Limes", "garnishes", 1),
    ("Cocktail Napkins", "supplies", 40),
];

pub fn demo_items() -> Vec<InventoryItem> {
    let now = Utc::now();
    DEMO_ITEMS
        .iter()
        .filter_map(|&(name, category, stock)| {
            let input = NewItem {
                name: name.to_string(),
                category: category.to_string(),
                stock,
                ..Default::default()
            };
            InventoryItem::create(ItemId::new(), input, SEED_ACTOR, now).ok()
        })
        .collect()
}

/// Write the demo items when the store holds nothing. Returns how many were
/// written.
pub async fn seed_if_empty<S: InventoryStore + ?Sized>(store: &S) -> Result<usize, StoreError> {
    if !store.list().await?.is_empty() {
        return Ok(0);
    }
    let items = demo_items();
    for item in &items {
        store.put(item).await?;
    }
    tracing::info!(count = items.len(), "seeded demo inventory");
    Ok(items.len())
}
