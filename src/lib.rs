mod aggregations;
mod bike_share;
mod dashboard;
mod data;
mod error;
mod filtering;
mod types;
mod utils;

#[cfg(test)]
mod test_fixtures;

pub use bike_share::*;
pub use dashboard::*;
pub use error::{BikeShareError, SELECT_RANGE_MESSAGE};
pub use filtering::BikeShareFrameFilterExt;

pub use data::error::LoadError;
pub use data::loader::TableLoader;

pub use aggregations::correlation::*;
pub use aggregations::daily::*;
pub use aggregations::error::AggregationError;
pub use aggregations::hourly::*;
pub use aggregations::summaries::*;

pub use types::data_source::*;
pub use types::date_range::DateRange;
pub use types::error::SelectionError;
pub use types::frames::daily_frame::*;
pub use types::frames::hourly_frame::*;
pub use types::period::{AnyDate, Month, StartEndDate, Year};
pub use types::records::*;
pub use types::table_kind::{columns, TableKind};
