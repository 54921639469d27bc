use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use super::PosError;
use super::config::PosConfig;

pub const DEFAULT_SYNC_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosSyncReport {
    pub items_synced: u64,
    pub synced_at: DateTime<Utc>,
}

#[async_trait]
pub trait PosClient: Send + Sync {
    async fn sync(&self, config: &PosConfig) -> Result<PosSyncReport, PosError>;
}

#[async_trait]
impl<C> PosClient for Arc<C>
where
    C: PosClient + ?Sized,
{
    async fn sync(&self, config: &PosConfig) -> Result<PosSyncReport, PosError> {
        (**self).sync(config).await
    }
}

/// Stand-in for a vendor integration: waits, then reports a handful of
/// synced items.
#[derive(Debug, Clone)]
pub struct SimulatedPosClient {
    delay: Duration,
}

impl SimulatedPosClient {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedPosClient {
    fn default() -> Self {
        Self::new(DEFAULT_SYNC_DELAY)
    }
}

#[async_trait]
impl PosClient for SimulatedPosClient {
    async fn sync(&self, config: &PosConfig) -> Result<PosSyncReport, PosError> {
        tracing::debug!(system = ?config.system, delay_ms = self.delay.as_millis() as u64, "simulating POS sync");
        tokio::time::sleep(self.delay).await;

        let items_synced = rand::thread_rng().gen_range(1..=5);
        Ok(PosSyncReport {
            items_synced,
            synced_at: Utc::now(),
        })
    }
}
