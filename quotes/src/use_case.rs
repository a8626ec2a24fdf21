//! Quote load use case: the entry point of the retrieval pipeline.

use std::sync::Arc;

use currency_tracker_common::{normalize_code, Currency, CurrencyQuote};
use reqwest::Url;
use tracing::{info, instrument};

use crate::error::{QuoteError, QuoteResult};
use crate::loader::QuoteLoader;

/// Pair expressions for a request path: `SRC1-TARGET,SRC2-TARGET,...`.
///
/// Source order is kept exactly. No sources gives an empty string. The
/// target code is normalized the same way [`Currency`] codes are.
pub fn pair_path(target: &str, sources: &[Currency]) -> String {
    let target = normalize_code(target);
    sources
        .iter()
        .map(|source| format!("{}-{}", source.code(), target))
        .collect::<Vec<_>>()
        .join(",")
}

/// Append the pair path to `base` as one path segment.
///
/// A trailing `/` on the base is absorbed, so `http://h/last/` and
/// `http://h/last` both compose to `http://h/last/USD-BRL`.
pub fn compose_url(base: &Url, target: &str, sources: &[Currency]) -> QuoteResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| QuoteError::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .push(&pair_path(target, sources));
    Ok(url)
}

/// Loads the latest quotes of `sources` denominated in a target currency.
///
/// The use case never reads or writes the local cache; persisting a
/// successful load is up to the caller.
pub struct QuoteLoadUseCase {
    base_url: Url,
    loader: Arc<dyn QuoteLoader>,
}

impl QuoteLoadUseCase {
    /// Create a use case over a feed base URL such as
    /// `https://economia.awesomeapi.com.br/json/last/`.
    pub fn new(base_url: Url, loader: Arc<dyn QuoteLoader>) -> QuoteResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(QuoteError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { base_url, loader })
    }

    /// Feed base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Load quotes for every pair `source-target` in one request.
    ///
    /// Either the whole decoded response comes back or the call fails as a
    /// whole. Pairs the feed has no data for are simply absent.
    #[instrument(skip(self, target, sources), fields(code_in = %target, sources = sources.len()))]
    pub async fn load(&self, target: &str, sources: &[Currency]) -> QuoteResult<Vec<CurrencyQuote>> {
        let url = compose_url(&self.base_url, target, sources)?;
        let quotes = self.loader.load(&url).await?;

        info!(count = quotes.len(), "Loaded quotes");
        Ok(quotes)
    }
}
