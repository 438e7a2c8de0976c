//! Durable key-value storage for the cart snapshot.
//!
//! The cart only needs `get` and `set` on string keys with string values, so
//! that is all [`KeyValueStore`] asks of a backend.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - process memory, shared between clones
//! - [`FileStorage`] - one file per key under a root directory
//! - [`StorageBackend`] - runtime choice between the two, driven by config

mod file;
mod memory;

use std::future::Future;

use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// A string-keyed, string-valued durable store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing has been stored under the key.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Storage backend selected at startup.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Memory(MemoryStorage),
    File(FileStorage),
}

impl KeyValueStore for StorageBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            Self::Memory(storage) => storage.get(key).await,
            Self::File(storage) => storage.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            Self::Memory(storage) => storage.set(key, value).await,
            Self::File(storage) => storage.set(key, value).await,
        }
    }
}

impl From<MemoryStorage> for StorageBackend {
    fn from(storage: MemoryStorage) -> Self {
        Self::Memory(storage)
    }
}

impl From<FileStorage> for StorageBackend {
    fn from(storage: FileStorage) -> Self {
        Self::File(storage)
    }
}
