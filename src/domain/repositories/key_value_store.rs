//! Key-value store contract consumed by the shortening engine.

use async_trait::async_trait;
use std::time::Duration;

/// Errors raised by a [`KeyValueStore`] backend.
///
/// Every variant means the operation did not reach a definite outcome; callers
/// treat them all as "store unavailable".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Store operation error: {0}")]
    Operation(String),

    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Minimal key-value service with an atomic counter.
///
/// This is the only durable record of the service. Implementations must make
/// [`incr`](Self::incr), [`set_if_absent`](Self::set_if_absent) and
/// [`compare_and_swap`](Self::compare_and_swap) atomic with respect to every
/// other caller of the same backend, including other processes.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisStore`] - Redis backend
/// - [`crate::infrastructure::store::MemoryStore`] - In-process backend
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Atomically increments an integer key and returns the new value.
    ///
    /// A missing key is created at `0` before the increment, so the first call
    /// returns `1`.
    async fn incr(&self, key: &str) -> StoreResult<i64>;

    /// Reads a key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` if the key exists
    /// - `Ok(None)` if it does not
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes a key unconditionally. `ttl = None` means no expiry.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> StoreResult<()>;

    /// Writes a key only if it does not exist yet, without expiry.
    ///
    /// Returns `true` if this call created the key.
    async fn set_if_absent(&self, key: &str, value: &str) -> StoreResult<bool>;

    /// Replaces the value of `key` with `new` only if it currently equals
    /// `expected`.
    ///
    /// Returns `true` if the swap happened.
    async fn compare_and_swap(&self, key: &str, expected: &str, new: &str) -> StoreResult<bool>;

    /// Checks if the backend is reachable.
    async fn ping(&self) -> bool;
}
