//! Contains the `DailyFrame` structure for lazy operations on the daily table.

use crate::aggregations::error::AggregationError;
use crate::filtering::BikeShareFrameFilterExt;
use crate::types::date_range::DateRange;
use crate::types::frames::{read_shared_records, SharedColumns};
use crate::types::records::DailyRecord;
use crate::types::table_kind::columns;
use log::debug;
use polars::prelude::{col, DataFrame, Expr, IntoLazy, LazyFrame};

/// A wrapper around a Polars `LazyFrame` holding the daily table.
///
/// Every operation returns a *new* `DailyFrame`; the loaded table is never
/// modified, so one loaded frame can back any number of interactions.
///
/// Instances are obtained from [`crate::BikeShare::load`] or, for tests and
/// in-memory data, [`DailyFrame::from_records`].
#[derive(Clone)]
pub struct DailyFrame {
    /// The underlying Polars LazyFrame containing the daily rows.
    pub frame: LazyFrame,
}

impl DailyFrame {
    /// Wraps a `LazyFrame` assumed to carry the normalized daily schema.
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Builds a frame from typed rows, using the same column names and types the loader produces.
    ///
    /// # Examples
    ///
    /// ```
    /// use bikeshare::{DailyFrame, DailyRecord};
    /// use chrono::NaiveDate;
    ///
    /// let record = DailyRecord {
    ///     date: NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
    ///     year: 2011,
    ///     month: "Jan".to_string(),
    ///     weekday: "Saturday".to_string(),
    ///     season: "Spring".to_string(),
    ///     weather: "Misty".to_string(),
    ///     working_day: false,
    ///     temperature: 0.34,
    ///     humidity: 0.81,
    ///     windspeed: 0.16,
    ///     casual: 331,
    ///     registered: 654,
    ///     count: 985,
    /// };
    /// let frame = DailyFrame::from_records(&[record.clone()])?;
    /// assert_eq!(frame.collect_records()?, vec![record]);
    /// # Ok::<(), bikeshare::AggregationError>(())
    /// ```
    pub fn from_records(records: &[DailyRecord]) -> Result<Self, AggregationError> {
        let mut shared = SharedColumns::default();
        for record in records {
            shared.push(record);
        }
        let df = DataFrame::new(shared.into_columns())?;
        Ok(Self::new(df.lazy()))
    }

    /// Filters the daily rows with an arbitrary Polars predicate.
    pub fn filter(&self, predicate: Expr) -> DailyFrame {
        DailyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Keeps the days within `range`, both ends included.
    ///
    /// A range outside the data yields an empty frame, not an error.
    pub fn get_range(&self, range: &DateRange) -> DailyFrame {
        debug!("Filtering daily table to {}", range);
        DailyFrame::new(self.frame.clone().filter_dates(range))
    }

    /// Collects the frame into typed rows, ordered by date.
    pub fn collect_records(&self) -> Result<Vec<DailyRecord>, AggregationError> {
        let df = self
            .frame
            .clone()
            .sort_by_exprs([col(columns::DATE)], Default::default())
            .collect()?;
        read_shared_records(&df)
    }

    /// Collects the frame eagerly.
    pub fn collect(&self) -> Result<DataFrame, AggregationError> {
        Ok(self.frame.clone().collect()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::day;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, dd: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, dd).unwrap()
    }

    #[test]
    fn records_round_trip_through_frame() -> Result<(), Box<dyn std::error::Error>> {
        let records = vec![day(d(2011, 1, 2), 20), day(d(2011, 1, 1), 10)];
        let frame = DailyFrame::from_records(&records)?;

        let collected = frame.collect_records()?;
        assert_eq!(collected, vec![records[1].clone(), records[0].clone()]);
        Ok(())
    }

    #[test]
    fn get_range_leaves_source_untouched() -> Result<(), Box<dyn std::error::Error>> {
        let frame = DailyFrame::from_records(&[
            day(d(2011, 1, 1), 10),
            day(d(2012, 1, 1), 20),
        ])?;
        let range = DateRange::new(d(2011, 1, 1), d(2011, 1, 1))?;

        let filtered = frame.get_range(&range);

        assert_eq!(filtered.collect()?.height(), 1);
        assert_eq!(frame.collect()?.height(), 2);
        Ok(())
    }

    #[test]
    fn empty_records_build_empty_frame() -> Result<(), Box<dyn std::error::Error>> {
        let frame = DailyFrame::from_records(&[])?;
        let df = frame.collect()?;
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 13);
        Ok(())
    }
}
