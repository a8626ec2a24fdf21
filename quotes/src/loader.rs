//! Quote loader traits and the remote implementation.

use std::sync::Arc;

use async_trait::async_trait;
use currency_tracker_common::CurrencyQuote;
use reqwest::Url;
use tracing::{debug, instrument, warn};

use crate::error::QuoteResult;
use crate::http::HttpClient;
use crate::mapper;

/// Trait for anything that can load quotes from a feed URL.
#[async_trait]
pub trait QuoteLoader: Send + Sync {
    async fn load(&self, url: &Url) -> QuoteResult<Vec<CurrencyQuote>>;
}

/// Loads quotes with one HTTP request and decodes them with the mapper.
///
/// No retry and no caching: every call is exactly one outbound request.
pub struct RemoteQuoteLoader {
    client: Arc<dyn HttpClient>,
}

impl RemoteQuoteLoader {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuoteLoader for RemoteQuoteLoader {
    #[instrument(skip(self), fields(url = %url))]
    async fn load(&self, url: &Url) -> QuoteResult<Vec<CurrencyQuote>> {
        let response = self.client.get(url).await.map_err(|e| {
            warn!(error = %e, "Feed request failed");
            e
        })?;

        let quotes = mapper::map(&response.body, response.status).map_err(|e| {
            warn!(status = response.status, error = %e, "Feed response rejected");
            e
        })?;

        debug!(count = quotes.len(), "Decoded quotes");
        Ok(quotes)
    }
}
