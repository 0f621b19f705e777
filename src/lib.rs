//! Roulette - A read-through blob cache
//!
//! Serves blobs from a size-bounded in-memory LRU cache and falls back to a
//! backing object store on a miss, hydrating the cache in the background.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use storage::BackingStore;
