use polars::error::PolarsError;
use thiserror::Error;

/// Computing a view over a loaded table failed.
///
/// Tables are validated on load, so these errors point at a bug or at a frame
/// that was built by hand without going through the loader.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Required column '{0}' not found in DataFrame")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Column '{column}' cannot be read as {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
        #[source]
        source: PolarsError,
    },

    #[error("Column '{column}' holds a null value at row {row}")]
    UnexpectedNull { column: String, row: usize },

    #[error("'{0}' is not a weekday name")]
    UnknownWeekday(String),
}
