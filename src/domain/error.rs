use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("invalid source URI: {0}")]
    InvalidSourceUri(String),

    #[error("invalid source table '{reference}': {reason}")]
    InvalidTableReference { reference: String, reason: String },

    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    #[error("no objects in bucket '{bucket}' match pattern '{pattern}'")]
    NoMatchingObjects { bucket: String, pattern: String },

    #[error("object store error: {0}")]
    Storage(String),

    #[error("unsupported file format '{0}'")]
    UnsupportedFormat(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("{failed} of {total} objects failed to ingest")]
    PartialFailure { failed: usize, total: usize },
}
