use chrono::NaiveDate;
use thiserror::Error;

/// The user-chosen date range cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("No start date selected")]
    MissingStart,

    #[error("No end date selected")]
    MissingEnd,

    #[error("Start date {start} is after end date {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },

    #[error("Could not resolve '{0}' to a calendar date")]
    Unresolvable(String),
}
