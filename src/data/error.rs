use crate::types::table_kind::TableKind;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Loading one of the two input tables failed.
///
/// Any of these aborts startup: there is no retry and no partial table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read source file '{0}'")]
    SourceRead(PathBuf, #[source] std::io::Error),

    #[error("Data download or decompression failed")]
    DownloadIo(#[source] std::io::Error),

    // Errors during CSV reading (inside blocking task)
    #[error("I/O error processing CSV data for the {table} table")]
    CsvReadIo {
        table: TableKind,
        #[source]
        source: std::io::Error,
    },
    #[error("Parsing error processing CSV data for the {table} table")]
    CsvReadPolars {
        table: TableKind,
        #[source]
        source: PolarsError,
    },

    #[error("I/O error writing parquet cache file '{0}'")]
    ParquetWriteIo(PathBuf, #[source] std::io::Error),
    #[error("Encoding error writing parquet cache file '{0}'")]
    ParquetWritePolars(PathBuf, #[source] PolarsError),

    #[error("Failed to scan parquet cache file '{0}'")]
    ParquetScan(PathBuf, #[source] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("The {table} table is missing required columns: {}", columns.join(", "))]
    MissingColumns { table: TableKind, columns: Vec<String> },

    #[error("Failed to coerce the {table} table to its column types")]
    Normalize {
        table: TableKind,
        #[source]
        source: PolarsError,
    },

    #[error("Column '{column}' of the {table} table has {count} missing or unparseable values")]
    NullValues {
        table: TableKind,
        column: String,
        count: usize,
    },

    #[error("{rows} rows of the {table} table have a total that differs from casual + registered")]
    InconsistentTotals { table: TableKind, rows: usize },

    #[error("{rows} keys of the {table} table appear more than once ({})", key.join(", "))]
    DuplicateKeys {
        table: TableKind,
        key: Vec<String>,
        rows: usize,
    },

    #[error("{rows} rows of the hourly table have an hour outside 0..=23")]
    HourOutOfRange { rows: usize },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
