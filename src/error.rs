use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Persistence error: {0}")]
    PersistenceError(String),
    #[error("A checkout is already in progress for this session")]
    CheckoutInProgress,
    #[error("Handoff error: {0}")]
    HandoffError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Whether the caller may retry the same operation unchanged.
    ///
    /// Only persistence failures qualify: the cart is preserved, so a retry
    /// resubmits the same contents.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PersistenceError(_))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for StoreError {
    fn from(err: rocksdb::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
