//! API Handlers
//!
//! The read-through request handler and the state it shares.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tokio::sync::{RwLock, Semaphore};
use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{ProxyError, Result, StorageError};
use crate::storage::BackingStore;
use crate::tasks::spawn_hydration;

/// Default bound on concurrent backing store reads
pub const DEFAULT_MAX_INFLIGHT_FETCHES: usize = 64;

/// Default deadline for one backing store read
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across all requests.
///
/// The cache lock is only ever held for in-memory work, never across a
/// backing store read.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache store
    pub cache: Arc<RwLock<CacheStore>>,
    /// Source of truth consulted on a miss
    pub storage: Arc<dyn BackingStore>,
    /// Permits for in-flight backing store reads
    fetch_permits: Arc<Semaphore>,
    fetch_timeout: Duration,
}

impl AppState {
    /// Creates a new AppState with default fetch limits.
    pub fn new(cache: CacheStore, storage: Arc<dyn BackingStore>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            storage,
            fetch_permits: Arc::new(Semaphore::new(DEFAULT_MAX_INFLIGHT_FETCHES)),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config, storage: Arc<dyn BackingStore>) -> Self {
        Self::new(CacheStore::new(config.cache_size_kb()), storage)
            .with_max_inflight_fetches(config.max_inflight_fetches)
            .with_fetch_timeout(config.fetch_timeout())
    }

    pub fn with_max_inflight_fetches(mut self, limit: usize) -> Self {
        self.fetch_permits = Arc::new(Semaphore::new(limit));
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Reads `key` from the backing store within the fetch limits.
    ///
    /// The deadline covers waiting for a permit as well as the read itself.
    /// Dropping the returned future abandons the read.
    async fn fetch(&self, key: &str) -> std::result::Result<Bytes, StorageError> {
        let bounded_read = async {
            let _permit = self
                .fetch_permits
                .acquire()
                .await
                .map_err(|_| StorageError::Unavailable("fetch limiter closed".to_string()))?;
            self.storage.read(key).await
        };

        tokio::time::timeout(self.fetch_timeout, bounded_read)
            .await
            .map_err(|_| StorageError::Timeout(self.fetch_timeout))?
    }
}

/// Derives the cache key from a request path: the path without its leading
/// `/`, percent-decoded. Returns None for an empty or undecodable key.
pub fn extract_key(path: &str) -> Option<String> {
    let raw = path.strip_prefix('/').unwrap_or(path);
    let key = urlencoding::decode(raw).ok()?.into_owned();
    (!key.is_empty()).then_some(key)
}

/// Handler for every request.
///
/// GET `/<key>` is served from the cache, or from the backing store on a
/// miss, in which case the cache is hydrated in the background. Any other
/// method is refused.
pub async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Response> {
    if method != Method::GET {
        return Err(ProxyError::MethodNotAllowed(method.to_string()));
    }

    let key = extract_key(uri.path()).ok_or_else(|| ProxyError::NotFound(uri.path().to_string()))?;

    // Write lock: a hit updates recency
    let cached = {
        let mut cache = state.cache.write().await;
        cache.get(&key)
    };

    if let Some(content) = cached {
        debug!(key = %key, "Cache hit");
        return Ok((StatusCode::OK, content).into_response());
    }

    debug!(key = %key, "Cache miss");
    let content = state.fetch(&key).await.map_err(|e| {
        warn!(key = %key, error = %e, "Error reading from backing store");
        ProxyError::NotFound(key.clone())
    })?;

    // Hydration is spawned before the response is handed back to the
    // server, so it may finish before or after the client has the body.
    spawn_hydration(state.cache.clone(), key, content.clone());

    Ok((StatusCode::OK, content).into_response())
}
