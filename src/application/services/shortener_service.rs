//! Short URL creation and resolution.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::ShortToken;
use crate::domain::id_allocator::{DEFAULT_STARTING_OFFSET, IdAllocator};
use crate::domain::mapping_store::{KeyLayout, MappingStore};
use crate::domain::repositories::KeyValueStore;
use crate::error::ShortenerError;
use crate::utils::content_hash::content_hash;

/// Public prefix of short URLs when none is configured.
pub const DEFAULT_SHORT_DOMAIN: &str = "http://sh.url/";

/// Settings of a [`ShortenerService`].
#[derive(Debug, Clone)]
pub struct ShortenerSettings {
    /// Prepended verbatim to every token, e.g. `"http://sh.url/"`.
    pub short_domain: String,
    /// First ID handed out by a fresh counter.
    pub starting_offset: u64,
    /// Namespace of every key the service writes.
    pub keys: KeyLayout,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self {
            short_domain: DEFAULT_SHORT_DOMAIN.to_string(),
            starting_offset: DEFAULT_STARTING_OFFSET,
            keys: KeyLayout::default(),
        }
    }
}

/// Result of a successful [`ShortenerService::create_link`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLink {
    pub token: ShortToken,
    pub short_url: String,
    /// `false` when an existing token was returned.
    pub newly_allocated: bool,
}

/// Maps long URLs to sequential base62 tokens and back.
///
/// The service keeps no mutable state of its own; everything shared lives in
/// the key-value store, so one instance can serve any number of concurrent
/// requests.
///
/// # Create
///
/// 1. Hash the long URL and look up the dedup index. A hit returns the
///    existing token without allocating.
/// 2. Otherwise allocate an ID and render it as a token.
/// 3. Write `token → long URL`, then claim `hash → token` with set-if-absent.
///    The forward mapping goes first so the dedup index never points at a
///    token that does not resolve.
/// 4. If another caller claimed the hash in between, return its token. The
///    token allocated here stays resolvable but is never handed out.
///
/// Store failures abort the call as [`ShortenerError::StoreUnavailable`].
/// Nothing is rolled back: every write is append-only and safe to repeat.
#[derive(Clone)]
pub struct ShortenerService {
    mappings: MappingStore,
    allocator: IdAllocator,
    short_domain: String,
}

impl ShortenerService {
    /// Creates a shortener over `store`.
    pub fn new(store: Arc<dyn KeyValueStore>, settings: ShortenerSettings) -> Self {
        let mappings = MappingStore::new(store, settings.keys);
        let allocator = IdAllocator::new(mappings.clone(), settings.starting_offset);

        Self {
            mappings,
            allocator,
            short_domain: settings.short_domain,
        }
    }

    /// Shortens a long URL and returns the full short URL.
    ///
    /// The same long URL always yields the same short URL once its dedup
    /// entry exists.
    ///
    /// # Errors
    ///
    /// See [`Self::create_link`].
    pub async fn create(&self, long_url: &str) -> Result<String, ShortenerError> {
        Ok(self.create_link(long_url).await?.short_url)
    }

    /// Shortens a long URL and reports whether a new token was allocated.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::StoreUnavailable`] on any store failure, and
    /// the allocator's errors if a new ID cannot be handed out.
    pub async fn create_link(&self, long_url: &str) -> Result<CreatedLink, ShortenerError> {
        let hash = content_hash(long_url);

        if let Some(token) = self.mappings.get_token_for_hash(&hash).await? {
            debug!(%token, "Dedup hit");
            metrics::counter!("shortener_create_total", "outcome" => "deduplicated").increment(1);
            return Ok(self.link(token, false));
        }

        let id = self.allocator.next().await?;
        let token = ShortToken::from_id(id);
        debug!(id, %token, "Allocated token");

        self.mappings.put_long_url(&token, long_url).await?;

        if self.mappings.claim_token_for_hash(&hash, &token).await? {
            metrics::counter!("shortener_create_total", "outcome" => "created").increment(1);
            return Ok(self.link(token, true));
        }

        metrics::counter!("shortener_create_total", "outcome" => "claim_lost").increment(1);

        match self.mappings.get_token_for_hash(&hash).await? {
            Some(winner) => {
                debug!(orphaned = %token, %winner, "Lost dedup claim to a concurrent create");
                Ok(self.link(winner, false))
            }
            None => {
                warn!(%token, %hash, "Dedup entry vanished after a lost claim, rewriting it");
                self.mappings.put_token_for_hash(&hash, &token).await?;
                Ok(self.link(token, true))
            }
        }
    }

    /// Resolves a token to its long URL.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` for a known token
    /// - `Ok(None)` for an unknown token
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::StoreUnavailable`] if the lookup fails.
    pub async fn resolve(&self, token: &str) -> Result<Option<String>, ShortenerError> {
        let long_url = self.mappings.get_long_url(token).await?;

        let outcome = if long_url.is_some() { "hit" } else { "miss" };
        metrics::counter!("shortener_resolve_total", "outcome" => outcome).increment(1);

        Ok(long_url)
    }

    /// Strips the configured short domain from `input`, if present.
    ///
    /// Lets callers pass either a bare token or a full short URL.
    pub fn token_from_input<'a>(&self, input: &'a str) -> &'a str {
        input.strip_prefix(self.short_domain.as_str()).unwrap_or(input)
    }

    /// Builds the public short URL for a token.
    pub fn short_url(&self, token: &ShortToken) -> String {
        format!("{}{}", self.short_domain, token)
    }

    pub fn short_domain(&self) -> &str {
        &self.short_domain
    }

    /// Direct access to the mapping records, for health checks and tooling.
    pub fn mappings(&self) -> &MappingStore {
        &self.mappings
    }

    pub fn allocator(&self) -> &IdAllocator {
        &self.allocator
    }

    fn link(&self, token: ShortToken, newly_allocated: bool) -> CreatedLink {
        CreatedLink {
            short_url: self.short_url(&token),
            token,
            newly_allocated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockKeyValueStore, StoreError};
    use crate::infrastructure::store::MemoryStore;
    use mockall::Sequence;
    use std::collections::HashSet;

    fn memory_service() -> (ShortenerService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = ShortenerService::new(store.clone(), ShortenerSettings::default());
        (service, store)
    }

    fn mock_service(mock: MockKeyValueStore) -> ShortenerService {
        ShortenerService::new(Arc::new(mock), ShortenerSettings::default())
    }

    #[tokio::test]
    async fn test_create_then_resolve() {
        let (service, _) = memory_service();

        let short_url = service.create("https://example.com/a").await.unwrap();
        assert_eq!(short_url, "http://sh.url/2bI");

        let long_url = service.resolve("2bI").await.unwrap();
        assert_eq!(long_url.as_deref(), Some("https://example.com/a"));
    }

    #[tokio::test]
    async fn test_create_is_idempotent_and_allocates_once() {
        let (service, store) = memory_service();

        let first = service.create("https://example.com/a").await.unwrap();
        let second = service.create("https://example.com/a").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.get("surl:id").await.unwrap().as_deref(), Some("10000"));
        assert_eq!(store.keys_with_prefix("surl:long:").await.len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_urls_get_distinct_tokens() {
        let (service, _) = memory_service();

        let a = service.create_link("https://example.com/a").await.unwrap();
        let b = service.create_link("https://example.com/b").await.unwrap();

        assert_ne!(a.token, b.token);
        assert_eq!(a.token.id(), Some(10_000));
        assert_eq!(b.token.id(), Some(10_001));
        assert!(a.newly_allocated && b.newly_allocated);
    }

    #[tokio::test]
    async fn test_unnormalized_urls_are_distinct() {
        let (service, _) = memory_service();

        let a = service.create("https://example.com/a").await.unwrap();
        let b = service.create("https://example.com/a/").await.unwrap();

        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_resolve_unknown_token() {
        let (service, _) = memory_service();

        assert_eq!(service.resolve("doesNotExist").await.unwrap(), None);
        assert_eq!(service.resolve("zzz").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_dedup_entry_always_resolves_to_its_url() {
        let (service, store) = memory_service();

        for i in 0..20 {
            service
                .create(&format!("https://example.com/{i}"))
                .await
                .unwrap();
        }

        for key in store.keys_with_prefix("surl:short:").await {
            let token = store.get(&key).await.unwrap().unwrap();
            let long_url = service.resolve(&token).await.unwrap().unwrap();
            assert_eq!(
                format!("surl:short:{}", content_hash(&long_url)),
                key,
                "dedup entry {key} points at a token for a different URL"
            );
        }
    }

    #[tokio::test]
    async fn test_concurrent_creates_of_same_url_agree() {
        let (service, _) = memory_service();

        let mut handles = Vec::new();
        for _ in 0..32 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.create("https://example.com/race").await
            }));
        }

        let mut urls = HashSet::new();
        for handle in handles {
            urls.insert(handle.await.unwrap().unwrap());
        }

        assert_eq!(urls.len(), 1);
    }

    #[tokio::test]
    async fn test_lost_claim_returns_winner_token() {
        let mut mock = MockKeyValueStore::new();
        let mut seq = Sequence::new();

        mock.expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        mock.expect_incr()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(10_005));
        mock.expect_set()
            .withf(|key, _, _| key == "surl:long:2bN")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        mock.expect_set_if_absent()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(false));
        mock.expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some("2bJ".to_string())));

        let service = mock_service(mock);
        let link = service.create_link("https://example.com/x").await.unwrap();

        assert_eq!(link.token.as_str(), "2bJ");
        assert_eq!(link.short_url, "http://sh.url/2bJ");
        assert!(!link.newly_allocated);
    }

    #[tokio::test]
    async fn test_lost_claim_with_vanished_winner_rewrites_index() {
        let mut mock = MockKeyValueStore::new();
        let mut seq = Sequence::new();

        mock.expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        mock.expect_incr()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(10_000));
        mock.expect_set()
            .withf(|key, _, _| key == "surl:long:2bI")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        mock.expect_set_if_absent()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(false));
        mock.expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        mock.expect_set()
            .withf(|key, value, _| key.starts_with("surl:short:") && value == "2bI")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));

        let service = mock_service(mock);
        let link = service.create_link("https://example.com/y").await.unwrap();

        assert_eq!(link.token.as_str(), "2bI");
    }

    #[tokio::test]
    async fn test_forward_mapping_written_before_dedup_claim() {
        let mut mock = MockKeyValueStore::new();
        let mut seq = Sequence::new();

        mock.expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        mock.expect_incr()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(10_000));
        mock.expect_set()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Err(StoreError::Timeout(std::time::Duration::from_secs(2))));
        mock.expect_set_if_absent().times(0);

        let service = mock_service(mock);
        let err = service.create("https://example.com/z").await.unwrap_err();

        assert!(matches!(
            err,
            ShortenerError::StoreUnavailable(StoreError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_dedup_lookup_failure_allocates_nothing() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get()
            .times(1)
            .returning(|_| Err(StoreError::Connection("refused".to_string())));
        mock.expect_incr().times(0);

        let service = mock_service(mock);
        let err = service.create("https://example.com").await.unwrap_err();

        assert!(matches!(err, ShortenerError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_resolve_store_failure_is_an_error() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get()
            .times(1)
            .returning(|_| Err(StoreError::Connection("refused".to_string())));

        let service = mock_service(mock);

        assert!(service.resolve("2bI").await.is_err());
    }

    #[tokio::test]
    async fn test_custom_settings() {
        let store = Arc::new(MemoryStore::new());
        let service = ShortenerService::new(
            store.clone(),
            ShortenerSettings {
                short_domain: "https://s.example.com/".to_string(),
                starting_offset: 62,
                keys: KeyLayout::new("test"),
            },
        );

        let short_url = service.create("https://example.com").await.unwrap();

        assert_eq!(short_url, "https://s.example.com/10");
        assert_eq!(store.get("test:id").await.unwrap().as_deref(), Some("62"));
    }

    #[test]
    fn test_token_from_input() {
        let service = mock_service(MockKeyValueStore::new());

        assert_eq!(service.token_from_input("http://sh.url/2bI"), "2bI");
        assert_eq!(service.token_from_input("2bI"), "2bI");
    }
}
