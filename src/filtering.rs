use crate::types::date_range::DateRange;
use crate::types::table_kind::columns;
use polars::prelude::{col, lit, DataType, LazyFrame};

pub trait BikeShareFrameFilterExt {
    /// Keeps the rows whose `dteday` lies within `range`, both ends included.
    ///
    /// Works for both tables since they share the date column. The returned
    /// `LazyFrame` is a new plan; the input plan is left untouched.
    fn filter_dates(self, range: &DateRange) -> LazyFrame;

    /// Keeps the rows whose working-day flag equals `working_day`.
    fn filter_working_day(self, working_day: bool) -> LazyFrame;
}

impl BikeShareFrameFilterExt for LazyFrame {
    fn filter_dates(self, range: &DateRange) -> LazyFrame {
        self.filter(
            col(columns::DATE)
                .cast(DataType::Date)
                .gt_eq(lit(range.start()))
                .and(
                    col(columns::DATE)
                        .cast(DataType::Date)
                        .lt_eq(lit(range.end())),
                ),
        )
    }

    fn filter_working_day(self, working_day: bool) -> LazyFrame {
        self.filter(col(columns::WORKING_DAY).eq(lit(working_day)))
    }
}
