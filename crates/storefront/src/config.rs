//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CART_STORAGE_BACKEND` - `file` or `memory` (default: `file`)
//! - `CART_STORAGE_DIR` - Directory holding the file backend's data (default: `.cart`)
//! - `CART_STORAGE_KEY` - Key the cart snapshot is stored under (default: `@cart/GoMarketPlace`)

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::storage::{FileStorage, MemoryStorage, StorageBackend};

/// Key the cart snapshot lives under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "@cart/GoMarketPlace";

/// Directory used by the file backend unless configured otherwise.
pub const DEFAULT_STORAGE_DIR: &str = ".cart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which durable store backs the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackendKind {
    /// One JSON file per key on local disk.
    #[default]
    File,
    /// Process memory only; nothing survives a restart.
    Memory,
}

impl fmt::Display for StorageBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for StorageBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend '{other}' (expected file or memory)")),
        }
    }
}

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Durable store implementation
    pub backend: StorageBackendKind,
    /// Root directory for the file backend
    pub storage_dir: PathBuf,
    /// Key the whole-cart snapshot is written to
    pub storage_key: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::default(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("CART_STORAGE_BACKEND") {
            Some(value) => value
                .parse::<StorageBackendKind>()
                .map_err(|e| ConfigError::InvalidEnvVar("CART_STORAGE_BACKEND".to_string(), e))?,
            None => StorageBackendKind::default(),
        };

        let storage_dir = lookup("CART_STORAGE_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR), PathBuf::from);
        if storage_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_DIR".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let storage_key =
            lookup("CART_STORAGE_KEY").unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            backend,
            storage_dir,
            storage_key,
        })
    }

    /// Create the configured storage backend.
    #[must_use]
    pub fn build_storage(&self) -> StorageBackend {
        match self.backend {
            StorageBackendKind::File => {
                StorageBackend::File(FileStorage::new(self.storage_dir.clone()))
            }
            StorageBackendKind::Memory => StorageBackend::Memory(MemoryStorage::new()),
        }
    }
}
