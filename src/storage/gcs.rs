//! Object store client
//!
//! Reads objects over HTTP from a GCS-compatible endpoint
//! (`<endpoint>/<bucket>/<object>`).

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, warn};

use super::BackingStore;
use crate::error::StorageError;

/// Per-attempt timeout unless overridden with `with_request_timeout`
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Attempts per read, including the first
pub(super) const MAX_ATTEMPTS: u32 = 2;

/// Pause before retrying a transient failure
const RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// Read-only client for one bucket of an object store.
#[derive(Clone)]
pub struct GcsStore {
    http_client: Client,
    endpoint: String,
    bucket: String,
    token: Option<String>,
    request_timeout: Duration,
}

impl GcsStore {
    /// Creates a client for `bucket` on `endpoint`.
    ///
    /// `token`, when set, is sent as a bearer token on every request.
    pub fn new(endpoint: &str, bucket: &str, token: Option<String>) -> Result<Self, StorageError> {
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(StorageError::Init(format!(
                "endpoint must be an http(s) URL, got {}",
                endpoint
            )));
        }

        let http_client = Client::builder()
            .build()
            .map_err(|e| StorageError::Init(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            token,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Sets the timeout applied to each attempt of a read.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// URL of the object named `key`; each path segment is percent-encoded.
    pub fn object_url(&self, key: &str) -> String {
        let object = key
            .split('/')
            .map(urlencoding::encode)
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/{}/{}",
            self.endpoint,
            urlencoding::encode(&self.bucket),
            object
        )
    }

    async fn read_once(&self, key: &str) -> Result<Bytes, StorageError> {
        let url = self.object_url(key);
        debug!(key, url = %url, "Fetching object");

        let mut request = self.http_client.get(&url).timeout(self.request_timeout);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::from_status(status.as_u16(), key));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        debug!(key, size = bytes.len(), "Fetched object");
        Ok(bytes)
    }
}

#[async_trait]
impl BackingStore for GcsStore {
    async fn read(&self, key: &str) -> Result<Bytes, StorageError> {
        let mut attempt = 1;
        loop {
            match self.read_once(key).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                    warn!(
                        key,
                        attempt,
                        max = MAX_ATTEMPTS,
                        delay_ms = RETRY_BACKOFF.as_millis() as u64,
                        error = %e,
                        "Retrying object read"
                    );
                    tokio::time::sleep(RETRY_BACKOFF).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
