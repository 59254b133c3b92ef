use crate::aggregations::error::AggregationError;
use crate::data::error::LoadError;
use crate::types::error::SelectionError;
use std::path::PathBuf;
use thiserror::Error;

/// The message shown to a user whose date selection cannot be summarized.
pub const SELECT_RANGE_MESSAGE: &str = "Select a valid date range.";

#[derive(Debug, Error)]
pub enum BikeShareError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),

    #[error("Failed to delete cache '{0}'")]
    CacheDeletion(PathBuf, #[source] std::io::Error),
}

impl BikeShareError {
    /// Text for the presentation layer.
    ///
    /// A bad selection and a failed recomputation both ask the user to pick
    /// another range; everything else reports the error itself.
    pub fn user_message(&self) -> String {
        match self {
            BikeShareError::Selection(_) | BikeShareError::Aggregation(_) => {
                SELECT_RANGE_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}
