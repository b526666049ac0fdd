//! Error types for the lag-feature pipeline.
//!
//! All fallible operations in this crate return [`Result`]. Load-time
//! problems with the partition or order key are fatal and carry the
//! offending row number; everything downstream of construction follows the
//! drop-don't-impute policy and is not an error at all.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading, configuring, or running the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying I/O failure (file open, directory creation, write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV-level failure (unreadable file, header mismatch).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A source row has no usable partition key (ticker).
    ///
    /// Grouping is impossible without it, so this surfaces immediately at
    /// load instead of being deferred downstream.
    #[error("row {row}: missing partition key `{column}`")]
    MissingPartitionKey { row: usize, column: &'static str },

    /// A source row has no parseable order key (date).
    #[error("row {row}: cannot parse order key `{value}` as a date")]
    InvalidOrderKey { row: usize, value: String },

    /// Configuration rejected by `validate()`.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A requested column does not exist in the augmented schema.
    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    /// Matrix construction failed (shape mismatch, serialization).
    #[error("{0}")]
    Generic(String),
}

impl Error {
    /// Create a generic error from any message.
    pub fn generic(msg: impl Into<String>) -> Self {
        Error::Generic(msg.into())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Generic(msg)
    }
}
