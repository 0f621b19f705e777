//! Local directory backing store.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use super::BackingStore;
use crate::error::StorageError;

/// Serves the files below a root directory, keyed by relative path.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Fails with [`StorageError::Init`] unless `root` is an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StorageError::Init(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// Maps a key to a path inside the root, or None if it would escape it.
    fn resolve(&self, key: &str) -> Option<PathBuf> {
        if key.is_empty() || key.split('/').any(str::is_empty) {
            return None;
        }

        let relative = Path::new(key);
        let only_normal = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        only_normal.then(|| self.root.join(relative))
    }
}

#[async_trait]
impl BackingStore for FsStore {
    async fn read(&self, key: &str) -> Result<Bytes, StorageError> {
        let path = self
            .resolve(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;

        debug!(key, path = %path.display(), "Reading blob from disk");
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                Err(StorageError::Denied(key.to_string()))
            }
            Err(_) if path.is_dir() => Err(StorageError::NotFound(key.to_string())),
            Err(e) => Err(StorageError::Unavailable(format!("{}: {}", key, e))),
        }
    }
}
