//! The loaded dataset and the per-interaction pipeline that turns a date
//! selection into every view the dashboard renders.

use crate::aggregations::correlation::weather_correlation;
use crate::aggregations::daily::{
    daily_totals_by_year, headline_metrics, monthly_user_type_totals, rfm_by_weekday,
    season_stats, weather_stats, working_day_stats,
};
use crate::aggregations::error::AggregationError;
use crate::aggregations::extract::date_values;
use crate::aggregations::hourly::{
    casual_by_hour_non_working, hour_stats, registered_by_hour_working,
};
use crate::aggregations::summaries::{
    CategoryStats, CorrelationMatrix, Headline, HourStats, HourlyTotal, MonthlyUserTotals,
    WeekdayRfm, WorkingDayStats, YearlyDailyTotals,
};
use crate::error::BikeShareError;
use crate::types::date_range::DateRange;
use crate::types::frames::daily_frame::DailyFrame;
use crate::types::frames::hourly_frame::HourlyFrame;
use crate::types::table_kind::columns;
use chrono::NaiveDate;
use log::debug;
use polars::prelude::{col, LazyFrame};
use serde::Serialize;

const FIRST: &str = "first";
const LAST: &str = "last";

/// Both input tables, loaded once and never mutated.
///
/// Every interaction filters cheap clones of the underlying lazy frames, so a
/// single `BikeShareData` can serve any number of selections.
#[derive(Clone)]
pub struct BikeShareData {
    daily: DailyFrame,
    hourly: HourlyFrame,
}

/// Every view of one dashboard interaction, in render order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardBundle {
    pub range: DateRange,
    pub headline: Headline,
    pub yearly_totals: YearlyDailyTotals,
    pub seasons: Vec<CategoryStats>,
    pub weather: Vec<CategoryStats>,
    pub working_day: Vec<WorkingDayStats>,
    pub hours: Vec<HourStats>,
    pub correlation: CorrelationMatrix,
    pub monthly_users: Vec<MonthlyUserTotals>,
    pub casual_by_hour_non_working: Vec<HourlyTotal>,
    pub registered_by_hour_working: Vec<HourlyTotal>,
    pub rfm: Vec<WeekdayRfm>,
}

impl BikeShareData {
    pub fn new(daily: DailyFrame, hourly: HourlyFrame) -> Self {
        Self { daily, hourly }
    }

    pub fn daily(&self) -> &DailyFrame {
        &self.daily
    }

    pub fn hourly(&self) -> &HourlyFrame {
        &self.hourly
    }

    /// The earliest and latest date across both tables, or `None` when both are empty.
    ///
    /// A date selector should be bounded by this range.
    pub fn coverage(&self) -> Result<Option<DateRange>, AggregationError> {
        let daily = date_bounds(self.daily.frame.clone())?;
        let hourly = date_bounds(self.hourly.frame.clone())?;
        Ok(match (daily, hourly) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        })
    }

    /// Restricts both tables to `range`.
    pub fn filter(&self, range: &DateRange) -> (DailyFrame, HourlyFrame) {
        (self.daily.get_range(range), self.hourly.get_range(range))
    }

    /// Filters both tables to `range` and computes every view.
    ///
    /// An empty selection is not an error: every view comes back empty and the
    /// headline numbers are zero.
    pub fn summarize(&self, range: &DateRange) -> Result<DashboardBundle, BikeShareError> {
        let (daily, hourly) = self.filter(range);

        let bundle = DashboardBundle {
            range: *range,
            headline: headline_metrics(&daily)?,
            yearly_totals: daily_totals_by_year(&daily)?,
            seasons: season_stats(&daily)?,
            weather: weather_stats(&daily)?,
            working_day: working_day_stats(&daily)?,
            hours: hour_stats(&hourly)?,
            correlation: weather_correlation(&hourly)?,
            monthly_users: monthly_user_type_totals(&daily)?,
            casual_by_hour_non_working: casual_by_hour_non_working(&hourly)?,
            registered_by_hour_working: registered_by_hour_working(&hourly)?,
            rfm: rfm_by_weekday(&daily)?,
        };
        debug!(
            "Summarized {}: {} days, {} rides",
            range, bundle.headline.days, bundle.headline.total
        );
        Ok(bundle)
    }

    /// Like [`BikeShareData::summarize`], starting from the raw selector output.
    pub fn summarize_selection(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DashboardBundle, BikeShareError> {
        let range = DateRange::from_selection(start, end)?;
        self.summarize(&range)
    }
}

fn date_bounds(frame: LazyFrame) -> Result<Option<DateRange>, AggregationError> {
    let df = frame
        .select([
            col(columns::DATE).min().alias(FIRST),
            col(columns::DATE).max().alias(LAST),
        ])
        .collect()?;
    if df.height() == 0 || df.column(FIRST)?.null_count() > 0 {
        return Ok(None);
    }
    let first = date_values(&df, FIRST)?;
    let last = date_values(&df, LAST)?;
    match (first.first(), last.first()) {
        (Some(start), Some(end)) => Ok(DateRange::new(*start, *end).ok()),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SELECT_RANGE_MESSAGE;
    use crate::test_fixtures::{daily_frame, day, hour, hourly_frame};
    use crate::types::error::SelectionError;

    fn d(y: i32, m: u32, dd: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, dd).unwrap()
    }

    fn data() -> BikeShareData {
        let mut days = Vec::new();
        let mut hours = Vec::new();
        for offset in 0..10 {
            let date = d(2011, 12, 28) + chrono::Duration::days(offset);
            let mut record = day(date, 40 + 4 * offset);
            record.year = if date.format("%Y").to_string() == "2011" { 0 } else { 1 };
            days.push(record);
            for hr in [7u32, 8, 17] {
                let mut row = hour(date, hr, 10 + offset + hr as i64);
                row.day.temperature = 0.2 + 0.01 * hr as f64;
                hours.push(row);
            }
        }
        BikeShareData::new(daily_frame(&days), hourly_frame(&hours))
    }

    #[test]
    fn coverage_spans_both_tables() -> Result<(), Box<dyn std::error::Error>> {
        let coverage = data().coverage()?.unwrap();
        assert_eq!(coverage.start(), d(2011, 12, 28));
        assert_eq!(coverage.end(), d(2012, 1, 6));

        let empty = BikeShareData::new(daily_frame(&[]), hourly_frame(&[]));
        assert_eq!(empty.coverage()?, None);
        Ok(())
    }

    #[test]
    fn filter_is_inclusive_at_both_ends() -> Result<(), Box<dyn std::error::Error>> {
        let range = DateRange::new(d(2011, 12, 30), d(2012, 1, 2))?;
        let (daily, hourly) = data().filter(&range);

        let days = daily.collect_records()?;
        assert_eq!(days.len(), 4);
        assert_eq!(days.first().map(|r| r.date), Some(d(2011, 12, 30)));
        assert_eq!(days.last().map(|r| r.date), Some(d(2012, 1, 2)));
        assert!(days.iter().all(|r| range.contains(r.date)));
        assert_eq!(hourly.collect()?.height(), 12);
        Ok(())
    }

    #[test]
    fn summary_over_whole_coverage() -> Result<(), Box<dyn std::error::Error>> {
        let data = data();
        let range = data.coverage()?.unwrap();
        let bundle = data.summarize(&range)?;

        let total: i64 = (0..10).map(|offset| 40 + 4 * offset).sum();
        assert_eq!(bundle.headline.total, total);
        assert_eq!(bundle.headline.days, 10);
        assert_eq!(bundle.yearly_totals.years, vec![0, 1]);
        assert_eq!(
            bundle.working_day.iter().map(|s| s.count.sum).sum::<i64>(),
            total
        );
        assert_eq!(bundle.hours.len(), 3);
        assert_eq!(bundle.rfm.iter().map(|r| r.frequency).sum::<u32>(), 10);
        assert!(!bundle.correlation.is_empty());
        assert_eq!(bundle.monthly_users.len(), 2);
        assert_eq!(bundle.monthly_users[0].month, "1");
        Ok(())
    }

    #[test]
    fn bundle_serializes_with_labelled_keys() -> Result<(), Box<dyn std::error::Error>> {
        let bundle = data().summarize_selection(Some(d(2012, 1, 1)), Some(d(2012, 1, 2)))?;
        let json = serde_json::to_value(&bundle)?;

        assert_eq!(json["headline"]["days"], 2);
        assert_eq!(json["rfm"][0]["weekday"], "Sun");
        assert_eq!(json["yearly_totals"]["years"], serde_json::json!([1]));
        assert!(json["yearly_totals"]["by_date"]["2012-01-01"].is_object());
        Ok(())
    }

    #[test]
    fn single_day_selection() -> Result<(), Box<dyn std::error::Error>> {
        let bundle = data().summarize_selection(Some(d(2012, 1, 1)), Some(d(2012, 1, 1)))?;
        assert_eq!(bundle.headline.days, 1);
        assert_eq!(bundle.rfm.len(), 1);
        assert_eq!(bundle.rfm[0].recency_days, 0);
        assert_eq!(bundle.hours.len(), 3);
        Ok(())
    }

    #[test]
    fn empty_selection_is_not_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let bundle = data().summarize(&DateRange::new(d(2013, 1, 1), d(2013, 2, 1))?)?;
        assert_eq!(bundle.headline, Headline::default());
        assert!(bundle.yearly_totals.is_empty());
        assert!(bundle.seasons.is_empty());
        assert!(bundle.weather.is_empty());
        assert!(bundle.working_day.is_empty());
        assert!(bundle.hours.is_empty());
        assert!(bundle.correlation.is_empty());
        assert!(bundle.monthly_users.is_empty());
        assert!(bundle.casual_by_hour_non_working.is_empty());
        assert!(bundle.registered_by_hour_working.is_empty());
        assert!(bundle.rfm.is_empty());
        Ok(())
    }

    #[test]
    fn invalid_selection_asks_for_a_valid_range() {
        let data = data();
        let inverted = data.summarize_selection(Some(d(2012, 1, 2)), Some(d(2012, 1, 1)));
        match inverted {
            Err(error @ BikeShareError::Selection(SelectionError::Inverted { .. })) => {
                assert_eq!(error.user_message(), SELECT_RANGE_MESSAGE)
            }
            other => panic!("expected an inverted selection, got {:?}", other.map(|_| ())),
        }

        assert!(matches!(
            data.summarize_selection(None, Some(d(2012, 1, 1))),
            Err(BikeShareError::Selection(SelectionError::MissingStart))
        ));
    }
}
