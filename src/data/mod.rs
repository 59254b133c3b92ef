//! Obtaining the daily and hourly tables: download or file read, CSV parsing,
//! type normalization, invariant checks and the Parquet input cache.

pub mod error;
pub mod loader;
pub(crate) mod validate;
