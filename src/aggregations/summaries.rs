//! Output types of the aggregation functions.
//!
//! Every summary is an ordered collection keyed by a stable group label, ready
//! to drive a chart without further reshaping.

use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

/// Total rides per date, split by year: `date -> (year -> rides)`.
///
/// Every date carries an entry for every year present in the input; years
/// without rides on that date hold `0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearlyDailyTotals {
    /// All years present in the input, ascending.
    pub years: Vec<i32>,
    pub by_date: BTreeMap<NaiveDate, BTreeMap<i32, i64>>,
}

impl YearlyDailyTotals {
    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    /// Sum over all year columns for `date`.
    pub fn total_for(&self, date: NaiveDate) -> Option<i64> {
        self.by_date.get(&date).map(|years| years.values().sum())
    }

    /// The series of one year, in date order.
    pub fn series(&self, year: i32) -> Vec<(NaiveDate, i64)> {
        self.by_date
            .iter()
            .map(|(date, years)| (*date, years.get(&year).copied().unwrap_or(0)))
            .collect()
    }
}

/// Sum, extremes and mean of the ride count within one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountSummary {
    pub sum: i64,
    pub min: i64,
    pub max: i64,
    pub mean: f64,
}

/// Ride statistics for working days or for non-working days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkingDayStats {
    pub working_day: bool,
    /// Distinct dates in the group.
    pub days: u32,
    pub count: CountSummary,
    /// Sample standard deviation; `None` for a single-day group.
    pub std: Option<f64>,
}

/// Ride statistics for one value of a categorical attribute (season or weather situation).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub label: String,
    /// Distinct dates in the group.
    pub days: u32,
    pub count: CountSummary,
}

/// Casual, registered and total rides for one month label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyUserTotals {
    pub month: String,
    /// Distinct month labels in the group, always 1.
    pub months: u32,
    pub casual: i64,
    pub registered: i64,
    pub total: i64,
}

/// Ride statistics for one hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourStats {
    pub hour: u32,
    /// Distinct hour values in the group, always 1.
    pub hours: u32,
    pub count: CountSummary,
}

/// Summed rides of one user type for one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyTotal {
    pub hour: u32,
    pub total: i64,
}

/// A variable of the weather correlation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WeatherVariable {
    Temperature,
    Humidity,
    Windspeed,
    Count,
}

impl WeatherVariable {
    pub const ALL: [WeatherVariable; 4] = [
        WeatherVariable::Temperature,
        WeatherVariable::Humidity,
        WeatherVariable::Windspeed,
        WeatherVariable::Count,
    ];

    pub(crate) fn column(&self) -> &'static str {
        use crate::types::table_kind::columns;
        match self {
            WeatherVariable::Temperature => columns::TEMPERATURE,
            WeatherVariable::Humidity => columns::HUMIDITY,
            WeatherVariable::Windspeed => columns::WINDSPEED,
            WeatherVariable::Count => columns::COUNT,
        }
    }
}

/// Pearson correlation coefficients between the [`WeatherVariable`]s.
///
/// `coefficients[i][j]` correlates `variables[i]` with `variables[j]`. The
/// matrix is symmetric with `1.0` on the diagonal. An off-diagonal coefficient
/// is `None` when it is undefined (fewer than two rows, or a variable that
/// never changes). Empty input yields a matrix without variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub variables: Vec<WeatherVariable>,
    pub coefficients: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn get(&self, a: WeatherVariable, b: WeatherVariable) -> Option<f64> {
        let i = self.variables.iter().position(|v| *v == a)?;
        let j = self.variables.iter().position(|v| *v == b)?;
        self.coefficients[i][j]
    }
}

/// Recency, frequency and monetary value of one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekdayRfm {
    pub weekday: Weekday,
    /// Days between the latest date of the input and the latest date of this weekday.
    pub recency_days: i64,
    /// Number of days of this weekday in the input.
    pub frequency: u32,
    /// Rides summed over those days.
    pub monetary: i64,
}

/// Headline numbers shown above the charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Headline {
    /// Days in the selected range that have data.
    pub days: u32,
    pub registered: i64,
    pub total: i64,
}
