//! Namespaced view of the key-value store.
//!
//! Three kinds of keys live under one service prefix:
//!
//! | Key                      | Value        | Written by            |
//! |--------------------------|--------------|-----------------------|
//! | `{prefix}:id`            | counter      | [`IdAllocator`]       |
//! | `{prefix}:long:{token}`  | long URL     | forward mapping       |
//! | `{prefix}:short:{hash}`  | short token  | dedup index           |
//!
//! Tokens and hashes sit in different sub-namespaces, so a token can never be
//! mistaken for a hash even though both alphabets overlap. Records are written
//! without TTL and never updated or deleted.
//!
//! [`IdAllocator`]: crate::domain::id_allocator::IdAllocator

use std::sync::Arc;

use crate::domain::entities::{ContentHash, ShortToken};
use crate::domain::repositories::{KeyValueStore, StoreResult};

/// Default namespace, shared with existing deployments of the service.
pub const DEFAULT_KEY_PREFIX: &str = "surl";

/// Builds the store keys for one service namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayout {
    prefix: String,
}

impl KeyLayout {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn counter_key(&self) -> String {
        format!("{}:id", self.prefix)
    }

    pub fn long_url_key(&self, token: &str) -> String {
        format!("{}:long:{}", self.prefix, token)
    }

    pub fn token_key(&self, hash: &ContentHash) -> String {
        format!("{}:short:{}", self.prefix, hash)
    }
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}

/// Token and dedup records on top of a [`KeyValueStore`].
#[derive(Clone)]
pub struct MappingStore {
    store: Arc<dyn KeyValueStore>,
    keys: KeyLayout,
}

impl MappingStore {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: KeyLayout) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &KeyLayout {
        &self.keys
    }

    /// Looks up the token previously assigned to a content hash.
    pub async fn get_token_for_hash(&self, hash: &ContentHash) -> StoreResult<Option<ShortToken>> {
        let value = self.store.get(&self.keys.token_key(hash)).await?;
        Ok(value.map(ShortToken::new_unchecked))
    }

    /// Looks up the long URL behind a token.
    ///
    /// The token is taken verbatim, whether or not it is valid base62.
    pub async fn get_long_url(&self, token: &str) -> StoreResult<Option<String>> {
        self.store.get(&self.keys.long_url_key(token)).await
    }

    /// Writes the canonical `token → long URL` record.
    pub async fn put_long_url(&self, token: &ShortToken, long_url: &str) -> StoreResult<()> {
        self.store
            .set(&self.keys.long_url_key(token.as_str()), long_url, None)
            .await
    }

    /// Points a content hash at a token, overwriting any previous entry.
    pub async fn put_token_for_hash(
        &self,
        hash: &ContentHash,
        token: &ShortToken,
    ) -> StoreResult<()> {
        self.store
            .set(&self.keys.token_key(hash), token.as_str(), None)
            .await
    }

    /// Points a content hash at a token unless another token already holds it.
    ///
    /// Returns `true` if `token` is now the dedup entry for `hash`.
    pub async fn claim_token_for_hash(
        &self,
        hash: &ContentHash,
        token: &ShortToken,
    ) -> StoreResult<bool> {
        self.store
            .set_if_absent(&self.keys.token_key(hash), token.as_str())
            .await
    }

    /// Atomically increments the ID counter.
    pub async fn next_counter(&self) -> StoreResult<i64> {
        self.store.incr(&self.keys.counter_key()).await
    }

    /// Reads the current counter value without advancing it.
    pub async fn current_counter(&self) -> StoreResult<Option<String>> {
        self.store.get(&self.keys.counter_key()).await
    }

    /// Moves the counter from `observed` to `value` if nobody advanced it since.
    pub async fn seed_counter(&self, observed: i64, value: i64) -> StoreResult<bool> {
        self.store
            .compare_and_swap(
                &self.keys.counter_key(),
                &observed.to_string(),
                &value.to_string(),
            )
            .await
    }

    /// Creates the counter at `value` if it does not exist yet.
    pub async fn init_counter(&self, value: i64) -> StoreResult<bool> {
        self.store
            .set_if_absent(&self.keys.counter_key(), &value.to_string())
            .await
    }

    pub async fn ping(&self) -> bool {
        self.store.ping().await
    }
}
