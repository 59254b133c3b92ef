//! Defines the two tables of the bike-sharing dataset and the schema each one
//! is expected to carry after cleaning.

use polars::prelude::DataType;
use std::fmt;

/// Column names used by the cleaned bike-sharing CSV files.
pub mod columns {
    pub const DATE: &str = "dteday";
    pub const YEAR: &str = "yr";
    pub const MONTH: &str = "mnth";
    pub const WEEKDAY: &str = "weekday_name";
    pub const SEASON: &str = "season";
    pub const WEATHER: &str = "weathersit";
    pub const WORKING_DAY: &str = "workingday";
    pub const TEMPERATURE: &str = "temp";
    pub const HUMIDITY: &str = "hum";
    pub const WINDSPEED: &str = "windspeed";
    pub const CASUAL: &str = "casual";
    pub const REGISTERED: &str = "registered";
    pub const COUNT: &str = "cnt";
    pub const HOUR: &str = "hr";
}

/// Identifies one of the two input tables.
///
/// Both tables share the same attribute set; the hourly table refines every
/// day into up to 24 rows and adds the `hr` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// One row per calendar date.
    Daily,
    /// One row per (date, hour-of-day) pair.
    Hourly,
}

impl TableKind {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            TableKind::Daily => "daily",
            TableKind::Hourly => "hourly",
        }
    }

    /// Every non-date column of the table together with the type it is coerced to on load.
    ///
    /// The date column is handled separately because it may arrive as text,
    /// as a date or as a datetime depending on how the CSV reader inferred it.
    pub(crate) fn typed_columns(&self) -> Vec<(&'static str, DataType)> {
        use columns::*;
        let mut typed = vec![
            (YEAR, DataType::Int32),
            (MONTH, DataType::String),
            (WEEKDAY, DataType::String),
            (SEASON, DataType::String),
            (WEATHER, DataType::String),
            (WORKING_DAY, DataType::Boolean),
            (TEMPERATURE, DataType::Float64),
            (HUMIDITY, DataType::Float64),
            (WINDSPEED, DataType::Float64),
            (CASUAL, DataType::Int64),
            (REGISTERED, DataType::Int64),
            (COUNT, DataType::Int64),
        ];
        if *self == TableKind::Hourly {
            typed.push((HOUR, DataType::Int32));
        }
        typed
    }

    /// All columns the source file must provide, date column first.
    pub(crate) fn schema_column_names(&self) -> Vec<&'static str> {
        std::iter::once(columns::DATE)
            .chain(self.typed_columns().into_iter().map(|(name, _)| name))
            .collect()
    }

    /// Columns that identify a row uniquely.
    pub(crate) fn key_columns(&self) -> Vec<&'static str> {
        match self {
            TableKind::Daily => vec![columns::DATE],
            TableKind::Hourly => vec![columns::DATE, columns::HOUR],
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
