//! API Module
//!
//! HTTP surface of the cache proxy.
//!
//! # Endpoints
//! - `GET /<key>` - Serve a blob from the cache or the backing store
//! - any other method - 405 Method Not Allowed

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
