//! Load-then-persist orchestration for callers that keep a local cache.

use std::sync::Arc;

use currency_tracker_common::{normalize_code, Currency, CurrencyQuote};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{instrument, warn};

use crate::cache::LocalQuoteCache;
use crate::error::QuoteResult;
use crate::use_case::QuoteLoadUseCase;

/// Loads fresh quotes and replaces the cached bucket with them.
///
/// Saves are serialized per target currency: at most one delete/insert
/// sequence is in flight for a given bucket. Different buckets proceed
/// independently. A failed load never touches the cache.
pub struct QuoteRefresher {
    use_case: QuoteLoadUseCase,
    cache: LocalQuoteCache,
    bucket_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl QuoteRefresher {
    pub fn new(use_case: QuoteLoadUseCase, cache: LocalQuoteCache) -> Self {
        Self {
            use_case,
            cache,
            bucket_locks: DashMap::new(),
        }
    }

    /// Load quotes for `sources` in `target` and cache them.
    ///
    /// Quotes whose `code_in` differs from `target` are returned but not
    /// cached, so the bucket only ever holds its own currency. `target` is
    /// compared in its normalized form, so `"brl"` fills the `BRL` bucket.
    #[instrument(skip(self, target, sources), fields(code_in = %target, sources = sources.len()))]
    pub async fn refresh(&self, target: &str, sources: &[Currency]) -> QuoteResult<Vec<CurrencyQuote>> {
        let target = normalize_code(target);
        let quotes = self.use_case.load(&target, sources).await?;

        let cacheable: Vec<CurrencyQuote> = quotes
            .iter()
            .filter(|quote| quote.code_in() == target.as_str())
            .cloned()
            .collect();
        if cacheable.len() != quotes.len() {
            warn!(
                skipped = quotes.len() - cacheable.len(),
                "Feed returned quotes for another target currency"
            );
        }

        let lock = self.bucket_lock(&target);
        let _guard = lock.lock().await;
        self.cache.save(&cacheable).await?;

        Ok(quotes)
    }

    /// Cached quotes for `target`, without touching the feed.
    pub async fn cached(&self, target: &str) -> QuoteResult<Vec<CurrencyQuote>> {
        self.cache.load(&normalize_code(target)).await
    }

    fn bucket_lock(&self, code_in: &str) -> Arc<Mutex<()>> {
        self.bucket_locks
            .entry(code_in.to_string())
            .or_default()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{QuoteError, StoreError};
    use crate::http::HttpClientSpy;
    use crate::loader::RemoteQuoteLoader;
    use crate::mapper::fixtures::SAMPLE_BODY;
    use crate::error::StoreResult;
    use crate::store::{QuoteStore, QuoteStoreSpy, ReceivedMessage};
    use async_trait::async_trait;
    use reqwest::Url;

    /// Spy that suspends once after every delete, so a concurrent save can
    /// run between the delete and the insert unless something serializes them.
    struct YieldingStore {
        spy: Arc<QuoteStoreSpy>,
    }

    #[async_trait]
    impl QuoteStore for YieldingStore {
        async fn delete(&self, code_in: &str) -> StoreResult<()> {
            self.spy.delete(code_in).await?;
            tokio::task::yield_now().await;
            Ok(())
        }

        async fn save(&self, quotes: &[CurrencyQuote]) -> StoreResult<()> {
            self.spy.save(quotes).await
        }

        async fn retrieve(&self, code_in: &str) -> StoreResult<Option<Vec<CurrencyQuote>>> {
            self.spy.retrieve(code_in).await
        }
    }

    fn make_refresher_over(
        store: Arc<dyn QuoteStore>,
    ) -> (QuoteRefresher, Arc<HttpClientSpy>) {
        let client = Arc::new(HttpClientSpy::new());
        let loader = Arc::new(RemoteQuoteLoader::new(client.clone()));
        let use_case = QuoteLoadUseCase::new(
            Url::parse("http://any-url.com/currencies/last/").unwrap(),
            loader,
        )
        .unwrap();
        (QuoteRefresher::new(use_case, LocalQuoteCache::new(store)), client)
    }

    fn make_refresher() -> (QuoteRefresher, Arc<HttpClientSpy>, Arc<QuoteStoreSpy>) {
        let store = Arc::new(QuoteStoreSpy::new());
        let (refresher, client) = make_refresher_over(store.clone());
        (refresher, client, store)
    }

    fn message_kinds(store: &QuoteStoreSpy) -> Vec<&'static str> {
        store
            .received_messages()
            .iter()
            .map(|message| match message {
                ReceivedMessage::DeleteCachedQuotes(_) => "delete",
                ReceivedMessage::Insert(_) => "insert",
                ReceivedMessage::Retrieve(_) => "retrieve",
            })
            .collect()
    }

    fn make_currencies() -> Vec<Currency> {
        vec![
            Currency::new("USD", "Dollar"),
            Currency::new("EUR", "Euro"),
            Currency::new("BTC", "Bitcoin"),
        ]
    }

    #[tokio::test]
    async fn test_refresh_caches_loaded_quotes() {
        let (refresher, client, store) = make_refresher();
        client.complete_with(200, SAMPLE_BODY.as_bytes().to_vec());

        let quotes = refresher.refresh("BRL", &make_currencies()).await.unwrap();

        assert_eq!(quotes.len(), 3);
        assert_eq!(refresher.cached("BRL").await.unwrap(), quotes);
        assert_eq!(
            store.received_messages()[..2],
            [
                ReceivedMessage::DeleteCachedQuotes("BRL".into()),
                ReceivedMessage::Insert(quotes.clone()),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_load_does_not_touch_cache() {
        let (refresher, client, store) = make_refresher();
        client.fail_with("timed out");

        let result = refresher.refresh("BRL", &make_currencies()).await;

        assert!(matches!(result, Err(QuoteError::Connectivity(_))));
        assert!(store.received_messages().is_empty());
    }

    #[tokio::test]
    async fn test_empty_load_does_not_touch_cache() {
        let (refresher, client, store) = make_refresher();
        client.complete_with_empty_response();

        let quotes = refresher.refresh("BRL", &make_currencies()).await.unwrap();

        assert!(quotes.is_empty());
        assert!(store.received_messages().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_target_quotes_are_not_cached() {
        let (refresher, client, store) = make_refresher();
        client.complete_with(200, SAMPLE_BODY.as_bytes().to_vec());

        let quotes = refresher.refresh("USD", &make_currencies()).await.unwrap();

        assert_eq!(quotes.len(), 3);
        assert!(store.received_messages().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_surfaces_insertion_error() {
        let (refresher, client, store) = make_refresher();
        client.complete_with(200, SAMPLE_BODY.as_bytes().to_vec());
        store.complete_insertion_with(StoreError::Backend("locked".into()));

        let result = refresher.refresh("BRL", &make_currencies()).await;

        assert!(matches!(result, Err(QuoteError::Insertion(_))));
        assert_eq!(store.bucket("BRL").await, None);
    }

    #[tokio::test]
    async fn test_lowercase_target_fills_canonical_bucket() {
        let (refresher, client, store) = make_refresher();
        client.complete_with(200, SAMPLE_BODY.as_bytes().to_vec());

        let quotes = refresher.refresh("brl", &make_currencies()).await.unwrap();

        assert_eq!(
            client.requested_urls(),
            vec![Url::parse("http://any-url.com/currencies/last/USD-BRL,EUR-BRL,BTC-BRL").unwrap()]
        );
        assert_eq!(store.bucket("BRL").await, Some(quotes.clone()));
        assert_eq!(refresher.cached("brl").await.unwrap(), quotes);
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_do_not_interleave() {
        let spy = Arc::new(QuoteStoreSpy::new());
        let store = Arc::new(YieldingStore { spy: spy.clone() });
        let (refresher, client) = make_refresher_over(store);
        client.complete_with(200, SAMPLE_BODY.as_bytes().to_vec());
        let currencies = make_currencies();

        let (a, b) = tokio::join!(
            refresher.refresh("BRL", &currencies),
            refresher.refresh("BRL", &currencies)
        );
        a.unwrap();
        b.unwrap();

        assert_eq!(message_kinds(&spy), vec!["delete", "insert", "delete", "insert"]);
    }
}
