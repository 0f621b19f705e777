//! Background Tasks Module
//!
//! Contains work detached from the request that triggered it.
//!
//! # Tasks
//! - Hydration: stores a blob fetched on a cache miss

mod hydrate;

pub use hydrate::{hydrate, spawn_hydration};
