use thiserror::Error;

/// Convenience result type used across acquisition, auditing, and cleaning.
pub type WrangleResult<T> = Result<T, WrangleError>;

/// Error type returned by every fallible operation in this crate.
///
/// Nothing is retried or recovered; errors propagate to the caller as-is.
#[derive(Debug, Error)]
pub enum WrangleError {
    /// Underlying I/O error (cache read/write, permissions, disk full).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error on the cache artifact.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Report serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error raised by a [`crate::ingestion::PropertySource`] implementation.
    #[error("source error: {message}")]
    Source { message: String },

    #[cfg(feature = "db_connectorx")]
    /// ConnectorX connection or query failure (feature-gated behind `db_connectorx`).
    #[error("connectorx error: {0}")]
    ConnectorX(#[from] connectorx::errors::ConnectorXOutError),

    #[cfg(feature = "arrow")]
    /// Arrow conversion failure when materializing query results.
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// The data does not have the shape an operation expects (e.g. an expected column is absent).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A cached value could not be parsed back into its column type.
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

impl WrangleError {
    /// Shorthand for the error produced when `column` is expected but absent.
    pub fn missing_column(column: &str) -> Self {
        Self::SchemaMismatch {
            message: format!("missing required column '{column}'"),
        }
    }
}
