//! Quote pipeline error types.

use thiserror::Error;

/// Errors raised by a [`QuoteStore`](crate::store::QuoteStore) backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    #[error("Store I/O error: {0}")]
    Io(String),

    /// Stored records could not be encoded or decoded.
    #[error("Store serialization error: {0}")]
    Serialization(String),

    /// Any other backend failure.
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the quote pipeline.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The transport could not complete the request (DNS, TLS, timeout, reset).
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// Non-2xx status, or a body that does not decode into quotes.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The store failed to clear a bucket. No insert was attempted.
    #[error("Failed to delete cached quotes: {0}")]
    Deletion(#[source] StoreError),

    /// The store failed to write a bucket after it was cleared.
    #[error("Failed to insert quotes: {0}")]
    Insertion(#[source] StoreError),

    /// The store failed to read a bucket.
    #[error("Failed to retrieve cached quotes: {0}")]
    Retrieval(#[source] StoreError),

    /// The feed base URL cannot carry a request path.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// No cached quote links the two currencies.
    #[error("Quote not available for {code}/{code_in}")]
    QuoteNotAvailable { code: String, code_in: String },
}

impl QuoteError {
    /// Check if retrying the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, QuoteError::Connectivity(_))
    }
}

/// Result type for quote pipeline operations.
pub type QuoteResult<T> = Result<T, QuoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_connectivity_is_retryable() {
        assert!(QuoteError::Connectivity("reset".into()).is_retryable());
        assert!(!QuoteError::InvalidData("status 500".into()).is_retryable());
        assert!(!QuoteError::Deletion(StoreError::Backend("x".into())).is_retryable());
    }

    #[test]
    fn test_store_error_from_io() {
        let err: StoreError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
