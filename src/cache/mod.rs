//! Cache Module
//!
//! Provides the in-memory blob cache with size-bounded LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::{kilobytes, CacheEntry, BYTES_PER_KB};
pub use lru::LruList;
pub use stats::CacheStats;
pub use store::{Admission, CacheStore};
