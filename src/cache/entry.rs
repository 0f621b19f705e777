//! Cache Entry Module
//!
//! Defines the structure for individual cached blobs.

use bytes::Bytes;

/// Bytes per kilobyte used for size accounting
pub const BYTES_PER_KB: f64 = 1024.0;

// == Cache Entry ==
/// A cached blob and its accounted size.
///
/// Entries are immutable once created.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    key: String,
    content: Bytes,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(key: impl Into<String>, content: Bytes) -> Self {
        Self {
            key: key.into(),
            content,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Cheap handle to the content; clones share the underlying buffer.
    pub fn content(&self) -> Bytes {
        self.content.clone()
    }

    /// Content length in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }

    /// Content length in kilobytes.
    pub fn size_kb(&self) -> f64 {
        kilobytes(self.size_bytes())
    }
}

/// Converts a byte count to kilobytes.
pub fn kilobytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_KB
}
