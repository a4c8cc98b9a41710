//! In-process key-value store.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::repositories::{KeyValueStore, StoreError, StoreResult};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// A [`KeyValueStore`] held in process memory.
///
/// A single async mutex serializes every operation, which gives the same
/// atomicity as Redis for `incr`, `set_if_absent` and `compare_and_swap`
/// within one process. Nothing survives a restart.
///
/// # Use Cases
///
/// - Unit and handler tests
/// - Local development without Redis
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        debug!("Using MemoryStore (data is not persisted)");
        Self::default()
    }

    /// Seeds a key directly, bypassing the trait.
    pub async fn insert(&self, key: &str, value: &str) {
        self.entries.lock().await.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: None,
            },
        );
    }

    /// Number of live keys.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .values()
            .filter(|e| !e.is_expired(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Live keys starting with `prefix`, sorted.
    pub async fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .lock()
            .await
            .iter()
            .filter(|(k, e)| k.starts_with(prefix) && !e.is_expired(now))
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

fn live<'a>(entries: &'a HashMap<String, Entry>, key: &str, now: Instant) -> Option<&'a Entry> {
    entries.get(key).filter(|e| !e.is_expired(now))
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn incr(&self, key: &str) -> StoreResult<i64> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let current = match live(&entries, key, now) {
            Some(entry) => entry.value.parse::<i64>().map_err(|_| {
                StoreError::Operation(format!("value at {key} is not an integer"))
            })?,
            None => 0,
        };

        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::Operation(format!("increment of {key} would overflow")))?;

        // INCR keeps an existing TTL; a recreated key has none.
        let expires_at = live(&entries, key, now).and_then(|e| e.expires_at);
        entries.insert(
            key.to_string(),
            Entry {
                value: next.to_string(),
                expires_at,
            },
        );

        Ok(next)
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.lock().await;
        Ok(live(&entries, key, Instant::now()).map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> StoreResult<()> {
        let expires_at = ttl
            .filter(|ttl| !ttl.is_zero())
            .map(|ttl| Instant::now() + ttl);
        self.entries.lock().await.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> StoreResult<bool> {
        let mut entries = self.entries.lock().await;

        if live(&entries, key, Instant::now()).is_some() {
            return Ok(false);
        }

        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: None,
            },
        );
        Ok(true)
    }

    async fn compare_and_swap(&self, key: &str, expected: &str, new: &str) -> StoreResult<bool> {
        let mut entries = self.entries.lock().await;

        let matches = live(&entries, key, Instant::now()).is_some_and(|e| e.value == expected);
        if !matches {
            return Ok(false);
        }

        entries.insert(
            key.to_string(),
            Entry {
                value: new.to_string(),
                expires_at: None,
            },
        );
        Ok(true)
    }

    async fn ping(&self) -> bool {
        true
    }
}
