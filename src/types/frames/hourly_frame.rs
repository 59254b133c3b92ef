//! Contains the `HourlyFrame` structure for lazy operations on the hourly table.

use crate::aggregations::error::AggregationError;
use crate::aggregations::extract::u32_values;
use crate::filtering::BikeShareFrameFilterExt;
use crate::types::date_range::DateRange;
use crate::types::frames::{read_shared_records, SharedColumns};
use crate::types::records::HourlyRecord;
use crate::types::table_kind::columns;
use log::debug;
use polars::prelude::{col, Column, DataFrame, Expr, IntoLazy, LazyFrame};

/// A wrapper around a Polars `LazyFrame` holding the hourly table.
///
/// Shares the daily attribute set plus the `hr` column. Like
/// [`crate::DailyFrame`], every operation returns a new frame.
#[derive(Clone)]
pub struct HourlyFrame {
    /// The underlying Polars LazyFrame containing the hourly rows.
    pub frame: LazyFrame,
}

impl HourlyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Builds a frame from typed rows, using the loader's column names and types.
    pub fn from_records(records: &[HourlyRecord]) -> Result<Self, AggregationError> {
        let mut shared = SharedColumns::default();
        let mut hours: Vec<i32> = Vec::with_capacity(records.len());
        for record in records {
            shared.push(&record.day);
            hours.push(record.hour as i32);
        }
        let mut table_columns = shared.into_columns();
        table_columns.push(Column::new(columns::HOUR.into(), hours));
        let df = DataFrame::new(table_columns)?;
        Ok(Self::new(df.lazy()))
    }

    pub fn filter(&self, predicate: Expr) -> HourlyFrame {
        HourlyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Keeps the hours whose date lies within `range`, both ends included.
    pub fn get_range(&self, range: &DateRange) -> HourlyFrame {
        debug!("Filtering hourly table to {}", range);
        HourlyFrame::new(self.frame.clone().filter_dates(range))
    }

    /// Keeps the hours of working days (`true`) or of non-working days (`false`).
    pub fn working_days(&self, working_day: bool) -> HourlyFrame {
        HourlyFrame::new(self.frame.clone().filter_working_day(working_day))
    }

    /// Collects the frame into typed rows, ordered by date and hour.
    pub fn collect_records(&self) -> Result<Vec<HourlyRecord>, AggregationError> {
        let df = self
            .frame
            .clone()
            .sort_by_exprs(
                [col(columns::DATE), col(columns::HOUR)],
                Default::default(),
            )
            .collect()?;
        let hours = u32_values(&df, columns::HOUR)?;
        Ok(read_shared_records(&df)?
            .into_iter()
            .zip(hours)
            .map(|(day, hour)| HourlyRecord { day, hour })
            .collect())
    }

    pub fn collect(&self) -> Result<DataFrame, AggregationError> {
        Ok(self.frame.clone().collect()?)
    }
}
