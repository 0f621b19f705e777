//! Cache Hydration Task
//!
//! Populates the cache with a blob fetched from the backing store.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{Admission, CacheStore};
use crate::error::CacheError;

/// Adds `content` to the cache under `key` and logs the outcome.
///
/// The write lock is held only for the in-memory insert.
pub async fn hydrate(
    cache: &RwLock<CacheStore>,
    key: String,
    content: Bytes,
) -> Result<Admission, CacheError> {
    let result = {
        let mut cache_guard = cache.write().await;
        cache_guard.add(key.clone(), content)
    };

    match &result {
        Ok(Admission::Inserted { evicted }) => {
            debug!(key = %key, evicted, "Cache hydrated");
        }
        Ok(Admission::AlreadyPresent) => {
            debug!(key = %key, "Cache already hydrated");
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Unable to add item to cache");
        }
    }

    result
}

/// Spawns a detached task that hydrates the cache.
///
/// The proxy handler calls this before returning the response, so the
/// task runs concurrently with the response being written and no ordering
/// between the two is guaranteed. The outcome never reaches the client
/// that triggered the miss. The returned handle may be dropped.
pub fn spawn_hydration(cache: Arc<RwLock<CacheStore>>, key: String, content: Bytes) -> JoinHandle<()> {
    tokio::spawn(async move {
        let _ = hydrate(&cache, key, content).await;
    })
}
