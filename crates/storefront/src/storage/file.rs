//! File-backed key-value storage.
//!
//! Each key maps to `<root>/<percent-encoded key>.json`. Keys such as
//! `@cart/GoMarketPlace` contain path separators, so they are encoded with
//! `urlencoding` rather than used as paths.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{KeyValueStore, StorageError};

/// Key-value storage persisted as files in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `root`.
    ///
    /// The directory is created on the first write, not here.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this storage.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File that holds the value for `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", urlencoding::encode(key)))
    }
}

impl KeyValueStore for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);

        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_owned(),
                source,
            }),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let write_err = |source| StorageError::Write {
            key: key.to_owned(),
            source,
        };

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(write_err)?;

        // Readers only ever see the old file or the complete new one
        tokio::fs::write(&tmp, value).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(write_err)?;

        debug!(path = %path.display(), bytes = value.len(), "Wrote storage file");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_encodes_separators() {
        let storage = FileStorage::new("/data");
        assert_eq!(
            storage.path_for("@cart/GoMarketPlace"),
            PathBuf::from("/data/%40cart%2FGoMarketPlace.json")
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.get("@cart/GoMarketPlace").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_creates_root_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("cart");
        let storage = FileStorage::new(&root);

        storage.set("@cart/GoMarketPlace", "[]").await.unwrap();

        assert!(root.is_dir());
        assert_eq!(
            storage.get("@cart/GoMarketPlace").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_set_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.set("k", "first").await.unwrap();
        storage.set("k", "second").await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_write_into_unusable_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let storage = FileStorage::new(&blocker);
        let err = storage.set("k", "v").await.unwrap_err();

        assert!(matches!(err, StorageError::Write { ref key, .. } if key == "k"));
    }
}
