pub mod daily_frame;
pub mod hourly_frame;

use crate::aggregations::error::AggregationError;
use crate::aggregations::extract::{
    bool_values, date_values, f64_values, i32_values, i64_values, string_values,
};
use crate::types::records::DailyRecord;
use crate::types::table_kind::columns;
use chrono::NaiveDate;
use polars::prelude::{Column, DataFrame};

/// Column-wise buffers for the attributes shared by both tables.
#[derive(Default)]
pub(crate) struct SharedColumns {
    dates: Vec<NaiveDate>,
    years: Vec<i32>,
    months: Vec<String>,
    weekdays: Vec<String>,
    seasons: Vec<String>,
    weather: Vec<String>,
    working_days: Vec<bool>,
    temperatures: Vec<f64>,
    humidities: Vec<f64>,
    windspeeds: Vec<f64>,
    casual: Vec<i64>,
    registered: Vec<i64>,
    counts: Vec<i64>,
}

impl SharedColumns {
    pub(crate) fn push(&mut self, record: &DailyRecord) {
        self.dates.push(record.date);
        self.years.push(record.year);
        self.months.push(record.month.clone());
        self.weekdays.push(record.weekday.clone());
        self.seasons.push(record.season.clone());
        self.weather.push(record.weather.clone());
        self.working_days.push(record.working_day);
        self.temperatures.push(record.temperature);
        self.humidities.push(record.humidity);
        self.windspeeds.push(record.windspeed);
        self.casual.push(record.casual);
        self.registered.push(record.registered);
        self.counts.push(record.count);
    }

    /// Columns in the order the loader produces them.
    pub(crate) fn into_columns(self) -> Vec<Column> {
        vec![
            Column::new(columns::DATE.into(), self.dates),
            Column::new(columns::YEAR.into(), self.years),
            Column::new(columns::MONTH.into(), self.months),
            Column::new(columns::WEEKDAY.into(), self.weekdays),
            Column::new(columns::SEASON.into(), self.seasons),
            Column::new(columns::WEATHER.into(), self.weather),
            Column::new(columns::WORKING_DAY.into(), self.working_days),
            Column::new(columns::TEMPERATURE.into(), self.temperatures),
            Column::new(columns::HUMIDITY.into(), self.humidities),
            Column::new(columns::WINDSPEED.into(), self.windspeeds),
            Column::new(columns::CASUAL.into(), self.casual),
            Column::new(columns::REGISTERED.into(), self.registered),
            Column::new(columns::COUNT.into(), self.counts),
        ]
    }
}

/// Reads the shared attributes of every row of a collected frame.
pub(crate) fn read_shared_records(df: &DataFrame) -> Result<Vec<DailyRecord>, AggregationError> {
    let dates = date_values(df, columns::DATE)?;
    let years = i32_values(df, columns::YEAR)?;
    let months = string_values(df, columns::MONTH)?;
    let weekdays = string_values(df, columns::WEEKDAY)?;
    let seasons = string_values(df, columns::SEASON)?;
    let weather = string_values(df, columns::WEATHER)?;
    let working_days = bool_values(df, columns::WORKING_DAY)?;
    let temperatures = f64_values(df, columns::TEMPERATURE)?;
    let humidities = f64_values(df, columns::HUMIDITY)?;
    let windspeeds = f64_values(df, columns::WINDSPEED)?;
    let casual = i64_values(df, columns::CASUAL)?;
    let registered = i64_values(df, columns::REGISTERED)?;
    let counts = i64_values(df, columns::COUNT)?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        records.push(DailyRecord {
            date: dates[i],
            year: years[i],
            month: months[i].clone(),
            weekday: weekdays[i].clone(),
            season: seasons[i].clone(),
            weather: weather[i].clone(),
            working_day: working_days[i],
            temperature: temperatures[i],
            humidity: humidities[i],
            windspeed: windspeeds[i],
            casual: casual[i],
            registered: registered[i],
            count: counts[i],
        });
    }
    Ok(records)
}
