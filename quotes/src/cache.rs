//! Local quote cache with replace-on-save semantics.
//!
//! Saving a quote set for a target currency replaces the whole bucket:
//!
//! 1. delete the existing bucket for `code_in`;
//! 2. insert the new set.
//!
//! The two phases are sequential, not atomic. If the delete fails nothing is
//! inserted and the bucket is whatever the store left behind. If the insert
//! fails the bucket stays empty: stale quotes are dropped rather than put
//! back, so a reader never sees old and new quotes mixed. Do not turn this
//! into merge-then-insert.
//!
//! Concurrent saves for the same `code_in` can interleave their phases. The
//! cache does not serialize them; callers must keep at most one save in
//! flight per bucket (see [`QuoteRefresher`](crate::refresher::QuoteRefresher)).

use std::sync::Arc;

use currency_tracker_common::CurrencyQuote;
use tracing::{debug, info, instrument, warn};

use crate::error::{QuoteError, QuoteResult};
use crate::store::QuoteStore;

/// Cache over a [`QuoteStore`], keyed by target currency.
#[derive(Clone)]
pub struct LocalQuoteCache {
    store: Arc<dyn QuoteStore>,
}

impl LocalQuoteCache {
    pub fn new(store: Arc<dyn QuoteStore>) -> Self {
        Self { store }
    }

    /// Replace the bucket of `quotes[0].code_in()` with `quotes`.
    ///
    /// All quotes must share one `code_in`; this is not checked. An empty
    /// slice is a no-op and never reaches the store.
    #[instrument(skip(self, quotes), fields(count = quotes.len()))]
    pub async fn save(&self, quotes: &[CurrencyQuote]) -> QuoteResult<()> {
        let Some(first) = quotes.first() else {
            debug!("Nothing to cache");
            return Ok(());
        };
        let code_in = first.code_in();

        self.store.delete(code_in).await.map_err(|e| {
            warn!(code_in, error = %e, "Failed to delete cached quotes");
            QuoteError::Deletion(e)
        })?;

        self.store.save(quotes).await.map_err(|e| {
            warn!(code_in, error = %e, "Failed to insert quotes, bucket left empty");
            QuoteError::Insertion(e)
        })?;

        info!(code_in, count = quotes.len(), "Cached quotes");
        Ok(())
    }

    /// Read the cached bucket for `code_in`. A missing bucket reads as empty.
    pub async fn load(&self, code_in: &str) -> QuoteResult<Vec<CurrencyQuote>> {
        let quotes = self
            .store
            .retrieve(code_in)
            .await
            .map_err(QuoteError::Retrieval)?
            .unwrap_or_default();

        debug!(code_in, count = quotes.len(), "Loaded cached quotes");
        Ok(quotes)
    }
}
