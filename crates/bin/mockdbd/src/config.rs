//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `mockdb.toml` in the working directory. Every field has a
//! default so the file is optional. Environment variables take precedence
//! over file values.

use std::path::PathBuf;

use serde::Deserialize;

use mockdb_adapter_http_axum::defaults::RouterOptions;
use mockdb_adapter_seed_file::DEFAULT_SEED_PATH;
use mockdb_app::write_back::WriteBackPolicy;
use mockdb_domain::store_key::{DEFAULT_STORE_KEY, StoreKey};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Document store settings.
    pub store: StoreConfig,
    /// Seed document settings.
    pub seed: SeedConfig,
    /// Rewrites and read-only mode.
    pub router: RouterOptions,
    /// Write-back policy.
    pub write_back: WriteBackConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Which store implementation holds the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    /// Process memory, lost on exit.
    Memory,
}

/// Document store configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// `SQLite` connection URL, used by the `sqlite` backend.
    pub url: String,
    /// Key the document is stored under.
    pub key: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// JSON file loaded when the store has no document yet.
    pub path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WriteBackConfig {
    /// Do not persist after mutations answered with an error status.
    pub skip_failed_mutations: bool,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `mockdb.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("mockdb.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("MOCKDB_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("MOCKDB_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("MOCKDB_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("MOCKDB_STORE_URL") {
            self.store.url = val;
        }
        if let Some(val) = var("MOCKDB_STORE_KEY") {
            self.store.key = val;
        }
        if let Some(val) = var("MOCKDB_SEED") {
            self.seed.path = PathBuf::from(val);
        }
        if let Some(read_only) = var("MOCKDB_READ_ONLY").and_then(|val| parse_flag(&val)) {
            self.router.read_only = read_only;
        }
        if let Some(val) = var("MOCKDB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        self.store_key()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the key the document is stored under.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured key is empty.
    pub fn store_key(&self) -> Result<StoreKey, ConfigError> {
        StoreKey::new(self.store.key.as_str())
            .map_err(|err| ConfigError::Validation(err.to_string()))
    }

    #[must_use]
    pub fn write_back_policy(&self) -> WriteBackPolicy {
        WriteBackPolicy {
            skip_failed_mutations: self.write_back.skip_failed_mutations,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: "sqlite:mockdb.db?mode=rwc".to_string(),
            key: DEFAULT_STORE_KEY.to_string(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SEED_PATH),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "mockdbd=info,mockdb=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
