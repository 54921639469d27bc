//! Point-of-sale integration: stored connection settings and a sync client.
//!
//! Only the simulated client ships today. The settings record and item
//! mappings are real and persist through [`PosConfigStore`].

pub mod client;
pub mod config;
pub mod service;

use thiserror::Error;

use crate::store::StoreError;

pub use client::{PosClient, PosSyncReport, SimulatedPosClient};
pub use config::{InMemoryPosConfigStore, PosConfig, PosConfigStore, PosConfigUpdate, PosMapping};
pub use service::{PosService, PosSyncStatus};

#[derive(Debug, Error)]
pub enum PosError {
    #[error("POS system is not connected")]
    NotConnected,

    #[error("{0}")]
    Validation(String),

    #[error("POS upstream failed: {0}")]
    Upstream(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
