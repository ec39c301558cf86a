use thiserror::Error;

/// Row codec and write-path errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid time model: {0}")]
    InvalidTimeModel(String),

    #[error(
        "Storage quota exceeded: operation {index} needs {size} bytes, transaction budget is {budget}"
    )]
    StorageQuotaExceeded {
        index: usize,
        size: usize,
        budget: usize,
    },

    #[error("Storage boundary error: {0}")]
    StorageBoundaryError(#[from] StorageError),

    #[error(transparent)]
    RfcError(#[from] kunai_rfc::error::RfcError),

    #[error(transparent)]
    ConversionError(#[from] kunai_rfc::rfc::ical::expand::ConversionError),

    #[error("Side record serialization failed: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Failures reported by a `RowStore`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Transaction too large: {size} bytes exceeds limit of {limit}")]
    TransactionTooLarge { size: usize, limit: usize },

    #[error("Operation {operation} references operation {target}, which has no result yet")]
    InvalidBackReference { operation: usize, target: usize },

    #[error("Operation {operation} references operation {target}, which produced no row id")]
    MissingResultId { operation: usize, target: usize },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type DbResult<T> = std::result::Result<T, DbError>;
