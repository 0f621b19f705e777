//! Cache Store Module
//!
//! Size-bounded blob cache combining a key index with an arena-backed LRU list.

use std::collections::HashMap;

use bytes::Bytes;

use crate::cache::entry::kilobytes;
use crate::cache::{CacheEntry, CacheStats, LruList};
use crate::error::CacheError;

// == Admission ==
/// Outcome of a successful [`CacheStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// A new entry was appended; `evicted` older entries made room for it
    Inserted { evicted: usize },
    /// The key was already cached; its content was kept and promoted
    AlreadyPresent,
}

// == Cache Store ==
/// In-memory blob cache bounded by total content size.
///
/// Invariants after every `get`/`add`:
/// - keys are unique
/// - `size_kb()` equals the sum of the contained entries' sizes
/// - `size_kb() < max_size_kb()`
#[derive(Debug)]
pub struct CacheStore {
    /// Key to LRU list handle
    index: HashMap<String, usize>,
    /// Entries ordered least to most recently used
    order: LruList<CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Capacity budget in kilobytes
    max_size_kb: f64,
    /// Sum of entry sizes in bytes
    current_bytes: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store holding at most `max_size_kb` kilobytes.
    ///
    /// Any single item must be strictly smaller than the capacity, so a
    /// non-positive capacity rejects every insert.
    pub fn new(max_size_kb: f64) -> Self {
        Self {
            index: HashMap::new(),
            order: LruList::new(),
            stats: CacheStats::new(),
            max_size_kb,
            current_bytes: 0,
        }
    }

    // == Get ==
    /// Returns the content for `key` and marks it most recently used.
    ///
    /// A miss leaves the ordering untouched.
    pub fn get(&mut self, key: &str) -> Option<Bytes> {
        match self.index.get(key) {
            Some(&idx) => {
                self.order.move_to_back(idx);
                self.stats.record_hit();
                self.order.get(idx).map(CacheEntry::content)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Add ==
    /// Inserts `content` under `key` as most recently used, evicting least
    /// recently used entries until the store is back under budget.
    ///
    /// Items whose own size reaches the capacity are rejected with
    /// [`CacheError::ItemTooLarge`] and the store is left unchanged.
    pub fn add(&mut self, key: impl Into<String>, content: Bytes) -> Result<Admission, CacheError> {
        let entry = CacheEntry::new(key, content);

        if entry.size_kb() >= self.max_size_kb {
            self.stats.record_rejection();
            return Err(CacheError::ItemTooLarge {
                key: entry.key().to_string(),
                size_kb: entry.size_kb(),
                max_size_kb: self.max_size_kb,
            });
        }

        // No update in place: an existing entry wins and is only promoted
        if let Some(&idx) = self.index.get(entry.key()) {
            self.order.move_to_back(idx);
            return Ok(Admission::AlreadyPresent);
        }

        let key = entry.key().to_string();
        self.current_bytes += entry.size_bytes();
        let idx = self.order.push_back(entry);
        self.index.insert(key, idx);

        let mut evicted = 0;
        while self.size_kb() >= self.max_size_kb {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.index.remove(oldest.key());
            self.current_bytes -= oldest.size_bytes();
            self.stats.record_eviction();
            evicted += 1;
        }

        Ok(Admission::Inserted { evicted })
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.len();
        stats.size_kb = self.size_kb();
        stats
    }

    /// Sum of all entry sizes in kilobytes.
    pub fn size_kb(&self) -> f64 {
        kilobytes(self.current_bytes)
    }

    pub fn max_size_kb(&self) -> f64 {
        self.max_size_kb
    }

    /// Returns true if `key` is cached, without touching recency.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Iterates entries from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &CacheEntry> {
        self.order.iter()
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
