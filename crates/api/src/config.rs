//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use barstock_auth::{CredentialError, DirectoryParseError, Role, StaticUserDirectory, UserRecord};

const DEV_JWT_SECRET: &str = "dev-secret";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 8 * 60;
const DEFAULT_POS_SYNC_DELAY_MS: u64 = 1500;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("BARSTOCK_USERS: {0}")]
    Users(#[from] DirectoryParseError),
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
    /// `None` when no model endpoint is configured; AI routes then fail.
    pub llm: Option<LlmSettings>,
    pub pos_sync_delay: Duration,
    pub users: StaticUserDirectory,
    pub seed_demo_data: bool,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source (tests pass a map).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| get(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let ttl_minutes: i64 = parse_var(var("TOKEN_TTL_MINUTES"), "TOKEN_TTL_MINUTES", DEFAULT_TOKEN_TTL_MINUTES)?;
        if ttl_minutes <= 0 {
            return Err(ConfigError::Invalid {
                name: "TOKEN_TTL_MINUTES",
                reason: "must be positive".to_string(),
            });
        }

        let llm = match var("LLM_ENDPOINT") {
            Some(endpoint) => Some(LlmSettings {
                endpoint,
                api_key: var("LLM_API_KEY"),
                model: var("LLM_MODEL"),
                timeout: Duration::from_secs(parse_var(
                    var("LLM_TIMEOUT_SECS"),
                    "LLM_TIMEOUT_SECS",
                    DEFAULT_LLM_TIMEOUT_SECS,
                )?),
            }),
            None => None,
        };

        let users = match var("BARSTOCK_USERS") {
            Some(entries) => StaticUserDirectory::parse(&entries)?,
            None => {
                tracing::warn!("BARSTOCK_USERS not set; using built-in demo accounts");
                demo_users().map_err(DirectoryParseError::from)?
            }
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            token_ttl: chrono::Duration::minutes(ttl_minutes),
            use_persistent_stores: parse_flag(var("USE_PERSISTENT_STORES")),
            database_url: var("DATABASE_URL"),
            llm,
            pos_sync_delay: Duration::from_millis(parse_var(
                var("POS_SYNC_DELAY_MS"),
                "POS_SYNC_DELAY_MS",
                DEFAULT_POS_SYNC_DELAY_MS,
            )?),
            users,
            seed_demo_data: var("SEED_DEMO_DATA").map(|v| parse_flag(Some(v))).unwrap_or(true),
        })
    }
}

fn parse_var<T>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_flag(value: Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

fn demo_users() -> Result<StaticUserDirectory, CredentialError> {
    Ok(StaticUserDirectory::new([
        UserRecord::new("admin@barstock.local", Role::Admin, "admin")?.with_display_name("Admin"),
        UserRecord::new("manager@barstock.local", Role::Manager, "manager")?.with_display_name("Manager"),
        UserRecord::new("staff@barstock.local", Role::Staff, "staff")?.with_display_name("Staff"),
    ]))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use barstock_auth::UserDirectory;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ApiConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(cfg.pos_sync_delay, Duration::from_millis(1500));
        assert!(cfg.llm.is_none());
        assert!(!cfg.use_persistent_stores);
        assert!(cfg.seed_demo_data);
        assert!(cfg.users.find("staff@barstock.local").is_some());
    }

    #[test]
    fn users_and_llm_come_from_env() {
        let cfg = config(&[
            ("BARSTOCK_USERS", "boss@bar.test:admin:pw"),
            ("LLM_ENDPOINT", "http://llm.local/v1"),
            ("LLM_TIMEOUT_SECS", "5"),
            ("SEED_DEMO_DATA", "false"),
        ])
        .unwrap();
        assert_eq!(cfg.users.len(), 1);
        assert_eq!(cfg.llm.unwrap().timeout, Duration::from_secs(5));
        assert!(!cfg.seed_demo_data);
    }

    #[test]
    fn bad_numbers_are_rejected() {
        assert!(matches!(
            config(&[("POS_SYNC_DELAY_MS", "soon")]),
            Err(ConfigError::Invalid {
                name: "POS_SYNC_DELAY_MS",
                ..
            })
        ));
        assert!(config(&[("TOKEN_TTL_MINUTES", "0")]).is_err());
    }
}
