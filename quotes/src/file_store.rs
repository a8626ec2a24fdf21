//! JSON file backed quote store.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use currency_tracker_common::CurrencyQuote;
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::StoreResult;
use crate::store::{upsert, QuoteStore};

type Buckets = BTreeMap<String, Vec<CurrencyQuote>>;

/// Stores every bucket in a single JSON document.
///
/// Mutations are serialized through an async mutex and land on disk via a
/// temp file + rename, so a reader sees either the previous or the next
/// document and never a torn one.
pub struct JsonFileQuoteStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileQuoteStore {
    /// Create a store over `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> StoreResult<Buckets> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Buckets::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Buckets::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, buckets: &Buckets) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(buckets)?;
        let tmp = self.path.with_extension(format!("{}.tmp", Uuid::new_v4()));
        if let Err(e) = Self::replace_with(&tmp, &self.path, &bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn replace_with(tmp: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
        tokio::fs::write(tmp, bytes).await?;
        tokio::fs::rename(tmp, target).await
    }
}

#[async_trait]
impl QuoteStore for JsonFileQuoteStore {
    #[instrument(skip(self))]
    async fn delete(&self, code_in: &str) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut buckets = self.read_all().await?;
        if buckets.remove(code_in).is_none() {
            return Ok(());
        }
        self.write_all(&buckets).await?;

        debug!("Deleted bucket");
        Ok(())
    }

    #[instrument(skip(self, quotes), fields(count = quotes.len()))]
    async fn save(&self, quotes: &[CurrencyQuote]) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut buckets = self.read_all().await?;
        for quote in quotes {
            let bucket = buckets.entry(quote.code_in().to_string()).or_default();
            upsert(bucket, quote.clone());
        }
        self.write_all(&buckets).await?;

        debug!("Saved quotes");
        Ok(())
    }

    async fn retrieve(&self, code_in: &str) -> StoreResult<Option<Vec<CurrencyQuote>>> {
        let mut buckets = self.read_all().await?;
        Ok(buckets.remove(code_in))
    }
}
