//! # Basket Configuration
//!
//! Where the cart snapshot lives and how the state feed is sized.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BASKET_STORAGE_BACKEND=memory                                      │
//! │     BASKET_DB_PATH=/tmp/basket.db                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/basket/basket.toml (Linux)                               │
//! │     ~/Library/Application Support/com.basket.basket/basket.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     SQLite in the platform data dir, key "basket.cart.items"           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # basket.toml
//! [storage]
//! backend = "sqlite"          # sqlite | memory
//! database_path = "/var/lib/basket/basket.db"
//! snapshot_key = "basket.cart.items"
//! max_connections = 2
//!
//! [feed]
//! capacity = 64
//! ```

use std::fmt;
use std::path::PathBuf;

use basket_core::{CART_SNAPSHOT_KEY, DEFAULT_FEED_CAPACITY};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{RuntimeError, RuntimeResult};

const CONFIG_FILE_NAME: &str = "basket.toml";
const DATABASE_FILE_NAME: &str = "basket.db";

// =============================================================================
// Storage Backend
// =============================================================================

/// Which [`KeyValueStore`](basket_store::KeyValueStore) the host opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Durable SQLite file.
    #[default]
    Sqlite,

    /// Process-local map. Nothing survives a restart.
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Sqlite => write!(f, "sqlite"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sql" => Ok(StorageBackend::Sqlite),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(RuntimeError::InvalidConfig(format!(
                "Unknown storage backend: '{}'. Valid options: sqlite, memory",
                other
            ))),
        }
    }
}

// =============================================================================
// Settings Sections
// =============================================================================

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,

    /// SQLite file. `None` means `<platform data dir>/basket.db`.
    pub database_path: Option<PathBuf>,

    /// Key the cart snapshot is stored under.
    pub snapshot_key: String,

    pub max_connections: u32,
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            backend: StorageBackend::default(),
            database_path: None,
            snapshot_key: CART_SNAPSHOT_KEY.to_string(),
            max_connections: 2,
        }
    }
}

impl StorageSettings {
    /// Resolves the SQLite file path, creating the data directory when
    /// the platform default is used.
    pub fn database_path(&self) -> RuntimeResult<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or_else(|| {
            RuntimeError::InvalidConfig("Could not determine app data directory".into())
        })?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DATABASE_FILE_NAME))
    }
}

/// `[feed]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    /// Snapshots buffered per subscriber before it starts lagging.
    pub capacity: usize,
}

impl Default for FeedSettings {
    fn default() -> Self {
        FeedSettings {
            capacity: DEFAULT_FEED_CAPACITY,
        }
    }
}

// =============================================================================
// Basket Config
// =============================================================================

/// Complete host configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasketConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub feed: FeedSettings,
}

impl BasketConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (basket.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> RuntimeResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading basket config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load basket config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> RuntimeResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| RuntimeError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RuntimeError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| RuntimeError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Basket config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> RuntimeResult<()> {
        if self.storage.snapshot_key.trim().is_empty() {
            return Err(RuntimeError::InvalidConfig(
                "snapshot_key must not be empty".into(),
            ));
        }

        if self.storage.max_connections == 0 {
            return Err(RuntimeError::InvalidConfig(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.feed.capacity == 0 {
            return Err(RuntimeError::InvalidConfig(
                "feed capacity must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `BASKET_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides looked up by variable name.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(backend) = lookup("BASKET_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(parsed) => {
                    debug!(backend = %backend, "Overriding storage backend from environment");
                    self.storage.backend = parsed;
                }
                Err(e) => warn!(error = %e, "Ignoring storage backend from environment"),
            }
        }

        if let Some(path) = lookup("BASKET_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(key) = lookup("BASKET_SNAPSHOT_KEY") {
            self.storage.snapshot_key = key;
        }

        if let Some(capacity) = lookup("BASKET_FEED_CAPACITY") {
            if let Ok(c) = capacity.parse::<usize>() {
                debug!(capacity = c, "Overriding feed capacity from environment");
                self.feed.capacity = c;
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "basket", "basket")
}
