//! Quote store contract and the in-memory implementation.
//!
//! The key space is partitioned by target currency (`code_in`). Each
//! `code_in` owns a bucket of quotes, at most one per source `code`.

use async_trait::async_trait;
use currency_tracker_common::CurrencyQuote;
use dashmap::DashMap;

use crate::error::StoreResult;

/// Trait for durable quote storage.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Remove the whole bucket for `code_in`. Removing a missing bucket succeeds.
    async fn delete(&self, code_in: &str) -> StoreResult<()>;

    /// Upsert quotes, keyed by `(code_in, code)`.
    async fn save(&self, quotes: &[CurrencyQuote]) -> StoreResult<()>;

    /// Read the bucket for `code_in`, `None` if it was never written or was deleted.
    async fn retrieve(&self, code_in: &str) -> StoreResult<Option<Vec<CurrencyQuote>>>;
}

/// Insert or replace a quote within its bucket.
pub(crate) fn upsert(bucket: &mut Vec<CurrencyQuote>, quote: CurrencyQuote) {
    match bucket.iter_mut().find(|existing| existing.code() == quote.code()) {
        Some(existing) => *existing = quote,
        None => bucket.push(quote),
    }
}

/// Thread-safe in-memory store.
#[derive(Default)]
pub struct InMemoryQuoteStore {
    buckets: DashMap<String, Vec<CurrencyQuote>>,
}

impl InMemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buckets currently held.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[async_trait]
impl QuoteStore for InMemoryQuoteStore {
    async fn delete(&self, code_in: &str) -> StoreResult<()> {
        self.buckets.remove(code_in);
        Ok(())
    }

    async fn save(&self, quotes: &[CurrencyQuote]) -> StoreResult<()> {
        for quote in quotes {
            let mut bucket = self.buckets.entry(quote.code_in().to_string()).or_default();
            upsert(&mut bucket, quote.clone());
        }
        Ok(())
    }

    async fn retrieve(&self, code_in: &str) -> StoreResult<Option<Vec<CurrencyQuote>>> {
        Ok(self.buckets.get(code_in).map(|bucket| bucket.clone()))
    }
}

/// A message received by [`QuoteStoreSpy`].
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceivedMessage {
    DeleteCachedQuotes(String),
    Insert(Vec<CurrencyQuote>),
    Retrieve(String),
}

/// Recording store for tests.
///
/// Logs every call and answers deletes and inserts with scripted errors when
/// set. Successful calls go through to an in-memory store so bucket state can
/// be inspected afterwards.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Default)]
pub struct QuoteStoreSpy {
    messages: parking_lot::Mutex<Vec<ReceivedMessage>>,
    deletion_error: parking_lot::Mutex<Option<crate::error::StoreError>>,
    insertion_error: parking_lot::Mutex<Option<crate::error::StoreError>>,
    inner: InMemoryQuoteStore,
}

#[cfg(any(test, feature = "test-utils"))]
impl QuoteStoreSpy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received so far, in order.
    pub fn received_messages(&self) -> Vec<ReceivedMessage> {
        self.messages.lock().clone()
    }

    /// Make subsequent deletes fail with `error`.
    pub fn complete_deletion_with(&self, error: crate::error::StoreError) {
        *self.deletion_error.lock() = Some(error);
    }

    /// Make subsequent inserts fail with `error`.
    pub fn complete_insertion_with(&self, error: crate::error::StoreError) {
        *self.insertion_error.lock() = Some(error);
    }

    /// Seed a bucket without recording a message.
    pub async fn seed(&self, quotes: &[CurrencyQuote]) {
        // In-memory saves cannot fail.
        let _ = self.inner.save(quotes).await;
    }

    /// Bucket contents without recording a message.
    pub async fn bucket(&self, code_in: &str) -> Option<Vec<CurrencyQuote>> {
        self.inner.retrieve(code_in).await.ok().flatten()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl QuoteStore for QuoteStoreSpy {
    async fn delete(&self, code_in: &str) -> StoreResult<()> {
        self.messages
            .lock()
            .push(ReceivedMessage::DeleteCachedQuotes(code_in.to_string()));

        let scripted = self.deletion_error.lock().clone();
        if let Some(error) = scripted {
            return Err(error);
        }
        self.inner.delete(code_in).await
    }

    async fn save(&self, quotes: &[CurrencyQuote]) -> StoreResult<()> {
        self.messages
            .lock()
            .push(ReceivedMessage::Insert(quotes.to_vec()));

        let scripted = self.insertion_error.lock().clone();
        if let Some(error) = scripted {
            return Err(error);
        }
        self.inner.save(quotes).await
    }

    async fn retrieve(&self, code_in: &str) -> StoreResult<Option<Vec<CurrencyQuote>>> {
        self.messages
            .lock()
            .push(ReceivedMessage::Retrieve(code_in.to_string()));
        self.inner.retrieve(code_in).await
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};
    use currency_tracker_common::CurrencyQuote;
    use rust_decimal::Decimal;

    pub fn make_quote(code: &str, code_in: &str, quote: Decimal) -> CurrencyQuote {
        CurrencyQuote::new(
            format!("{code}/{code_in}"),
            code,
            code_in,
            quote,
            Utc.timestamp_opt(1709773060, 0).unwrap(),
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::make_quote;
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_save_and_retrieve() {
        let store = InMemoryQuoteStore::new();
        let quotes = vec![
            make_quote("USD", "BRL", dec!(4.9446)),
            make_quote("EUR", "BRL", dec!(5.3844)),
        ];

        store.save(&quotes).await.unwrap();

        assert_eq!(store.retrieve("BRL").await.unwrap(), Some(quotes));
        assert_eq!(store.retrieve("USD").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_upserts_by_pair() {
        let store = InMemoryQuoteStore::new();
        store.save(&[make_quote("USD", "BRL", dec!(4.90))]).await.unwrap();
        store
            .save(&[make_quote("USD", "BRL", dec!(4.95)), make_quote("USD", "EUR", dec!(0.92))])
            .await
            .unwrap();

        let brl = store.retrieve("BRL").await.unwrap().unwrap();
        assert_eq!(brl.len(), 1);
        assert_eq!(brl[0].quote(), dec!(4.95));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_removes_bucket() {
        let store = InMemoryQuoteStore::new();
        store.save(&[make_quote("USD", "BRL", dec!(4.9))]).await.unwrap();

        store.delete("BRL").await.unwrap();
        store.delete("BRL").await.unwrap();

        assert_eq!(store.retrieve("BRL").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_spy_records_messages() {
        let spy = QuoteStoreSpy::new();
        let quotes = vec![make_quote("USD", "BRL", dec!(4.9))];

        spy.delete("BRL").await.unwrap();
        spy.save(&quotes).await.unwrap();
        spy.retrieve("BRL").await.unwrap();

        assert_eq!(
            spy.received_messages(),
            vec![
                ReceivedMessage::DeleteCachedQuotes("BRL".into()),
                ReceivedMessage::Insert(quotes.clone()),
                ReceivedMessage::Retrieve("BRL".into()),
            ]
        );
        assert_eq!(spy.bucket("BRL").await, Some(quotes));
    }
}
