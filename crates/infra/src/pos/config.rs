use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use barstock_core::ItemId;

use crate::store::StoreError;

pub const DEFAULT_SYNC_FREQUENCY_MINUTES: u32 = 15;

/// The single POS settings record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosConfig {
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
    /// Minutes between automatic syncs.
    pub sync_frequency: u32,
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
    /// POS item id -> inventory item id.
    #[serde(default)]
    pub mapped_items: BTreeMap<String, ItemId>,
    pub auto_updates: bool,
    #[serde(default)]
    pub sync_count: u64,
}

impl Default for PosConfig {
    fn default() -> Self {
        Self {
            connected: false,
            system: None,
            api_key: None,
            restaurant_id: None,
            sync_frequency: DEFAULT_SYNC_FREQUENCY_MINUTES,
            last_sync: None,
            mapped_items: BTreeMap::new(),
            auto_updates: false,
            sync_count: 0,
        }
    }
}

impl PosConfig {
    /// Copy safe to return over the API: the key is reduced to its last four
    /// characters.
    pub fn masked(&self) -> Self {
        let mut out = self.clone();
        out.api_key = self.api_key.as_deref().map(mask_secret);
        out
    }

    /// Merge a settings save. Absent fields keep their stored value; the
    /// record is marked connected.
    pub fn apply_update(&mut self, update: PosConfigUpdate) -> Result<(), String> {
        let system = update.system.trim();
        if system.is_empty() {
            return Err("system is required".to_string());
        }
        if update.sync_frequency == Some(0) {
            return Err("syncFrequency must be at least one minute".to_string());
        }

        self.system = Some(system.to_string());
        if let Some(key) = update.api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(rid) = update.restaurant_id {
            self.restaurant_id = Some(rid).filter(|r| !r.trim().is_empty());
        }
        if let Some(freq) = update.sync_frequency {
            self.sync_frequency = freq;
        }
        if let Some(auto) = update.auto_updates {
            self.auto_updates = auto;
        }
        self.connected = true;
        Ok(())
    }
}

fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

/// Body of a settings save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosConfigUpdate {
    pub system: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub restaurant_id: Option<String>,
    #[serde(default)]
    pub sync_frequency: Option<u32>,
    #[serde(default)]
    pub auto_updates: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosMapping {
    pub item_id: ItemId,
    pub pos_item_id: String,
}

#[async_trait]
pub trait PosConfigStore: Send + Sync {
    /// The stored record, or the default when none was saved yet.
    async fn load(&self) -> Result<PosConfig, StoreError>;

    async fn save(&self, config: &PosConfig) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> PosConfigStore for Arc<S>
where
    S: PosConfigStore + ?Sized,
{
    async fn load(&self) -> Result<PosConfig, StoreError> {
        (**self).load().await
    }

    async fn save(&self, config: &PosConfig) -> Result<(), StoreError> {
        (**self).save(config).await
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPosConfigStore {
    inner: RwLock<Option<PosConfig>>,
}

impl InMemoryPosConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PosConfigStore for InMemoryPosConfigStore {
    async fn load(&self) -> Result<PosConfig, StoreError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("pos config lock poisoned".to_string()))?;
        Ok(guard.clone().unwrap_or_default())
    }

    async fn save(&self, config: &PosConfig) -> Result<(), StoreError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("pos config lock poisoned".to_string()))?;
        *guard = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(system: &str) -> PosConfigUpdate {
        PosConfigUpdate {
            system: system.to_string(),
            api_key: Some("sk_live_abcdef1234".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn masked_keeps_last_four() {
        let mut config = PosConfig::default();
        config.apply_update(update("square")).unwrap();
        assert_eq!(config.masked().api_key.as_deref(), Some("****1234"));
        assert_eq!(config.api_key.as_deref(), Some("sk_live_abcdef1234"));
    }

    #[test]
    fn short_secrets_are_fully_masked() {
        assert_eq!(mask_secret("abc"), "****");
    }

    #[test]
    fn save_requires_system_and_connects() {
        let mut config = PosConfig::default();
        assert!(config.apply_update(update("  ")).is_err());
        assert!(!config.connected);

        config.apply_update(update("toast")).unwrap();
        assert!(config.connected);
        assert_eq!(config.system.as_deref(), Some("toast"));
    }

    #[test]
    fn blank_key_keeps_stored_one() {
        let mut config = PosConfig::default();
        config.apply_update(update("square")).unwrap();
        let mut again = update("square");
        again.api_key = Some(String::new());
        config.apply_update(again).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk_live_abcdef1234"));
    }

    #[tokio::test]
    async fn in_memory_store_defaults_until_saved() {
        let store = InMemoryPosConfigStore::new();
        assert_eq!(store.load().await.unwrap(), PosConfig::default());

        let mut config = PosConfig::default();
        config.sync_count = 3;
        store.save(&config).await.unwrap();
        assert_eq!(store.load().await.unwrap().sync_count, 3);
    }
}
