//! Key-value store backends.
//!
//! Provides two [`KeyValueStore`](crate::domain::repositories::KeyValueStore)
//! implementations:
//! - [`RedisStore`] - Production Redis backend
//! - [`MemoryStore`] - In-process backend for tests and local runs

mod memory_store;
mod redis_store;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
