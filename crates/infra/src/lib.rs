//! Infrastructure layer: document stores, change feed wiring, external clients.

pub mod alert_monitor;
pub mod inventory_service;
pub mod llm;
pub mod pos;
pub mod seed;
pub mod store;

pub use alert_monitor::{AlertMonitor, AlertSnapshot};
pub use inventory_service::{InventoryService, ServiceError};
pub use llm::{HttpLlmClient, LlmConfig};
pub use pos::{
    InMemoryPosConfigStore, PosClient, PosConfig, PosConfigStore, PosConfigUpdate, PosError, PosMapping, PosService,
    PosSyncStatus, SimulatedPosClient,
};
pub use store::{InMemoryInventoryStore, InventoryStore, StoreError};
