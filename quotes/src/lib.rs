//! Currency Tracker Quote Pipeline
//!
//! Fetches foreign-exchange quotes from a remote price feed and keeps the
//! latest set per target currency in a local store.
//!
//! # Components
//!
//! - [`mapper`]: decodes feed responses into validated quotes
//! - [`RemoteQuoteLoader`]: one HTTP request per load, decoded by the mapper
//! - [`QuoteLoadUseCase`]: composes the pair URL and delegates to a loader
//! - [`LocalQuoteCache`]: replace-on-save over a [`QuoteStore`]
//! - [`QuoteRefresher`]: load, then persist, one save per bucket at a time
//! - [`CurrencyConverter`]: converts amounts with cached quotes
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use currency_tracker_quotes::*;
//!
//! let client = Arc::new(ReqwestHttpClient::new());
//! let loader = Arc::new(RemoteQuoteLoader::new(client));
//! let use_case = QuoteLoadUseCase::new(base_url, loader)?;
//!
//! let quotes = use_case.load("BRL", &sources).await?;
//! LocalQuoteCache::new(Arc::new(InMemoryQuoteStore::new())).save(&quotes).await?;
//! ```

pub mod cache;
pub mod config;
pub mod conversion;
pub mod error;
pub mod file_store;
pub mod http;
pub mod loader;
pub mod mapper;
pub mod refresher;
pub mod store;
pub mod use_case;

pub use cache::LocalQuoteCache;
pub use config::TrackerConfig;
pub use conversion::{Conversion, CurrencyConverter};
pub use error::{QuoteError, QuoteResult, StoreError, StoreResult};
pub use file_store::JsonFileQuoteStore;
pub use http::{HttpClient, HttpResponse, ReqwestHttpClient};
pub use loader::{QuoteLoader, RemoteQuoteLoader};
pub use refresher::QuoteRefresher;
pub use store::{InMemoryQuoteStore, QuoteStore};
pub use use_case::{compose_url, pair_path, QuoteLoadUseCase};
