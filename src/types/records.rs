//! Typed rows of the two input tables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day of bike-sharing usage.
///
/// Categorical attributes are kept as the labels found in the cleaned source
/// file (e.g. `"Fall"` for the season, `"Clear"` for the weather situation).
/// Weather readings are the dataset's normalized values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub year: i32,
    pub month: String,
    pub weekday: String,
    pub season: String,
    pub weather: String,
    pub working_day: bool,
    pub temperature: f64,
    pub humidity: f64,
    pub windspeed: f64,
    pub casual: i64,
    pub registered: i64,
    /// Always `casual + registered`.
    pub count: i64,
}

/// One hour of bike-sharing usage: the daily attribute set plus the hour of day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    #[serde(flatten)]
    pub day: DailyRecord,
    /// Hour of day, `0..=23`.
    pub hour: u32,
}
