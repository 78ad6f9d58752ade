use thiserror::Error;

use crate::types::DataType;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Error type returned by ingestion functions.
///
/// This is a single error enum shared across CSV and (optional) Excel ingestion.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Excel ingestion error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input does not conform to the provided schema (missing columns, ragged rows, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

/// Error type returned by the analysis engine.
///
/// Every engine operation either returns a complete value object or one of these errors;
/// the input [`crate::types::DataSet`] is never modified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// A column name passed by the caller does not exist in the dataset.
    #[error("unknown column '{column}'")]
    UnknownColumn { column: String },

    /// The time column holds no value that could be coerced to a timestamp.
    #[error("column '{column}' has no valid temporal values")]
    EmptyTemporalDomain { column: String },

    /// A date range (or range parameter) is malformed, e.g. start after end.
    #[error("invalid range: {message}")]
    InvalidRange { message: String },

    /// An EWMA parameter does not yield a smoothing factor in (0, 1].
    #[error("invalid smoothing parameter: {message}")]
    InvalidSmoothingParameter { message: String },

    /// Too few non-null values to fit a model.
    #[error("insufficient data in column '{column}': {available} non-null values (need at least 2)")]
    InsufficientData { column: String, available: usize },

    /// Contamination must lie strictly between 0 and 0.5.
    #[error("invalid contamination {value}: expected a value in (0, 0.5)")]
    InvalidContamination { value: f64 },

    /// The operation requires a numeric column.
    #[error("column '{column}' is not numeric (type {data_type:?})")]
    NotNumeric { column: String, data_type: DataType },

    /// Forest construction options are out of range.
    #[error("invalid detector options: {message}")]
    InvalidDetectorOptions { message: String },
}
