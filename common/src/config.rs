use serde::Deserialize;
use std::{fmt, fs};
use thiserror::Error;

pub const ORDER_DB_URI: &str = "ORDER_DB_URI";
pub const ORDER_DB_NAME: &str = "ORDER_DB_NAME";
pub const ORDER_DB_COLLECTION_NAME: &str = "ORDER_DB_COLLECTION_NAME";
pub const ORDER_DB_USERNAME: &str = "ORDER_DB_USERNAME";
pub const ORDER_DB_PASSWORD: &str = "ORDER_DB_PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yml::Error,
    },
}

/// Connection settings for the order collection.
///
/// Every field may be left out of the file; empty strings are treated the
/// same as missing values. Whether the combination is usable is decided by
/// the repository at construction time.
#[derive(Deserialize, Clone)]
pub struct OrderDbConfig {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_ping_timeout_ms")]
    pub ping_timeout_ms: u64,
}

fn default_ping_timeout_ms() -> u64 {
    5_000
}

impl Default for OrderDbConfig {
    fn default() -> Self {
        Self {
            uri: None,
            name: None,
            collection_name: None,
            username: None,
            password: None,
            ping_timeout_ms: default_ping_timeout_ms(),
        }
    }
}

// Keep the password out of logs.
impl fmt::Debug for OrderDbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderDbConfig")
            .field("uri", &self.uri)
            .field("name", &self.name)
            .field("collection_name", &self.collection_name)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("ping_timeout_ms", &self.ping_timeout_ms)
            .finish()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl OrderDbConfig {
    pub fn uri(&self) -> Option<&str> {
        non_empty(&self.uri)
    }

    pub fn database(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    pub fn collection(&self) -> Option<&str> {
        non_empty(&self.collection_name)
    }

    pub fn username(&self) -> Option<&str> {
        non_empty(&self.username)
    }

    pub fn password(&self) -> Option<&str> {
        non_empty(&self.password)
    }

    /// Overwrites settings with values found through `lookup`.
    ///
    /// Keys are the `ORDER_DB_*` variable names. A lookup returning an empty
    /// string leaves the current value in place.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let targets: [(&str, &mut Option<String>); 5] = [
            (ORDER_DB_URI, &mut self.uri),
            (ORDER_DB_NAME, &mut self.name),
            (ORDER_DB_COLLECTION_NAME, &mut self.collection_name),
            (ORDER_DB_USERNAME, &mut self.username),
            (ORDER_DB_PASSWORD, &mut self.password),
        ];

        for (key, slot) in targets {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                tracing::debug!(key, "order db setting taken from environment");
                *slot = Some(value);
            }
        }
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkerConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_operation_timeout_ms() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            operation_timeout_ms: default_operation_timeout_ms(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub order_db: OrderDbConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
}

impl Config {
    pub fn load(config_path: &str) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Io {
            path: config_path.to_string(),
            source,
        })?;

        Self::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_string(),
            source,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(contents)
    }

    /// Loads the file and lets `ORDER_DB_*` environment variables win.
    pub fn load_with_env(config_path: &str) -> Result<Self, ConfigError> {
        let mut config = Self::load(config_path)?;
        config.order_db.apply_env();
        Ok(config)
    }
}
