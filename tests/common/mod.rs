#![allow(dead_code)]

use async_trait::async_trait;
use short_url::application::services::{ShortenerService, ShortenerSettings};
use short_url::domain::repositories::{KeyValueStore, StoreError, StoreResult};
use short_url::infrastructure::store::MemoryStore;
use short_url::state::AppState;
use std::sync::Arc;
use std::time::Duration;

/// A store whose every call fails, as if Redis were down.
pub struct UnreachableStore;

#[async_trait]
impl KeyValueStore for UnreachableStore {
    async fn incr(&self, _key: &str) -> StoreResult<i64> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Timeout(Duration::from_secs(2)))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> StoreResult<()> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn set_if_absent(&self, _key: &str, _value: &str) -> StoreResult<bool> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn compare_and_swap(&self, _key: &str, _expected: &str, _new: &str) -> StoreResult<bool> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn ping(&self) -> bool {
        false
    }
}

pub fn create_test_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let shortener = ShortenerService::new(store.clone(), ShortenerSettings::default());

    (AppState::new(Arc::new(shortener)), store)
}

pub fn create_unreachable_state() -> AppState {
    let shortener = ShortenerService::new(Arc::new(UnreachableStore), ShortenerSettings::default());
    AppState::new(Arc::new(shortener))
}

/// Shortens `long_url` through the engine and returns the bare token.
pub async fn create_test_link(state: &AppState, long_url: &str) -> String {
    state
        .shortener
        .create_link(long_url)
        .await
        .unwrap()
        .token
        .into_inner()
}
