//! Inventory change notifications.
//!
//! Stores publish an [`InventoryChange`] after every committed write; views
//! (alert monitor, SSE clients) subscribe and recompute.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, RecvError, Subscription};
pub use event::{ChangeKind, Event, InventoryChange};
pub use in_memory_bus::InMemoryEventBus;
