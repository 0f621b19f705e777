//! Storage Module
//!
//! The backing store the cache sits in front of, and its implementations.
//!
//! # Implementations
//! - [`GcsStore`] - object store reached over HTTP
//! - [`FsStore`] - files below a local directory
//! - [`MemoryStore`] - in-process map

mod fs;
mod gcs;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;

use crate::config::Config;
use crate::error::StorageError;

pub use fs::FsStore;
pub use gcs::GcsStore;
pub use memory::MemoryStore;

/// Prefix selecting the local directory store in the `bucket` setting
pub const FILE_SCHEME: &str = "file://";

/// Environment variable holding an optional object store bearer token
pub const TOKEN_ENV_VAR: &str = "ROULETTE_STORAGE_TOKEN";

// == Backing Store ==
/// Source of truth for blobs, consulted only on a cache miss.
///
/// A read may take arbitrarily long; callers bound it and cancel it by
/// dropping the returned future. Implementations must not cache.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Reads the full content stored under `key`.
    async fn read(&self, key: &str) -> Result<Bytes, StorageError>;
}

/// Builds the backing store selected by `config.bucket`.
///
/// `file://<dir>` serves files below `<dir>`; any other value names a
/// bucket on `config.endpoint`.
pub fn from_config(config: &Config) -> Result<Arc<dyn BackingStore>, StorageError> {
    if let Some(root) = config.bucket.strip_prefix(FILE_SCHEME) {
        info!(root, "Using local directory backing store");
        return Ok(Arc::new(FsStore::new(root)?));
    }

    let token = std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty());
    info!(
        bucket = %config.bucket,
        endpoint = %config.endpoint,
        authenticated = token.is_some(),
        "Using object store backing store"
    );
    // Attempts share the fetch deadline so a timed out first attempt still
    // leaves room for the retry
    let store = GcsStore::new(&config.endpoint, &config.bucket, token)?
        .with_request_timeout(config.fetch_timeout() / gcs::MAX_ATTEMPTS);
    Ok(Arc::new(store))
}
