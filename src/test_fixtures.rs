//! Row builders shared by the unit tests.

use crate::types::frames::daily_frame::DailyFrame;
use crate::types::frames::hourly_frame::HourlyFrame;
use crate::types::records::{DailyRecord, HourlyRecord};
use chrono::{Datelike, NaiveDate, Weekday};

pub(crate) fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// A day with `count` rides, a quarter of them casual. Weekends are non-working days.
pub(crate) fn day(date: NaiveDate, count: i64) -> DailyRecord {
    let casual = count / 4;
    DailyRecord {
        date,
        year: date.year(),
        month: date.month().to_string(),
        weekday: weekday_name(date).to_string(),
        season: "Winter".to_string(),
        weather: "Clear".to_string(),
        working_day: !matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
        temperature: 0.3,
        humidity: 0.5,
        windspeed: 0.2,
        casual,
        registered: count - casual,
        count,
    }
}

pub(crate) fn hour(date: NaiveDate, hour: u32, count: i64) -> HourlyRecord {
    HourlyRecord {
        day: day(date, count),
        hour,
    }
}

pub(crate) fn daily_frame(records: &[DailyRecord]) -> DailyFrame {
    DailyFrame::from_records(records).expect("fixture records build a frame")
}

pub(crate) fn hourly_frame(records: &[HourlyRecord]) -> HourlyFrame {
    HourlyFrame::from_records(records).expect("fixture records build a frame")
}
