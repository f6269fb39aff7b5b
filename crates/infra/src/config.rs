//! Process configuration read from environment variables.
//!
//! | Variable                | Default                  |
//! |-------------------------|--------------------------|
//! | `BIND_ADDR`             | `0.0.0.0:8080`           |
//! | `USE_PERSISTENT_STORES` | `false`                  |
//! | `DATABASE_URL`          | required when persistent |
//! | `APP_NAME`              | `orderdesk`              |
//! | `APP_BASE_URL`          | `http://localhost:8080`  |
//! | `MAIL_FROM`             | `orders@orderdesk.local` |
//! | `SEED_DEMO_DATA`        | `true` (in-memory only)  |

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_APP_NAME: &str = "orderdesk";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_MAIL_FROM: &str = "orders@orderdesk.local";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Where orders, products and users live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    InMemory { seed_demo_data: bool },
    Postgres { database_url: String },
}

/// Values rendered into outgoing confirmation emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub from: String,
    pub app_name: String,
    pub base_url: String,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            from: DEFAULT_MAIL_FROM.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
    pub mail: MailSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let persistent = parse_flag("USE_PERSISTENT_STORES", get("USE_PERSISTENT_STORES"), false)?;
        let storage = if persistent {
            let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
            StorageConfig::Postgres { database_url }
        } else {
            StorageConfig::InMemory {
                seed_demo_data: parse_flag("SEED_DEMO_DATA", get("SEED_DEMO_DATA"), true)?,
            }
        };

        let base_url = get("APP_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            bind_addr,
            storage,
            mail: MailSettings {
                from: get("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
                app_name: get("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
                base_url,
            },
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            storage: StorageConfig::InMemory { seed_demo_data: true },
            mail: MailSettings::default(),
        }
    }
}

fn parse_flag(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}
