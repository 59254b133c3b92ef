//! Reads collected DataFrame columns into plain Rust values.
//!
//! Every helper casts the column to the requested physical type first, so a
//! summary column may come out of polars as `UInt32`, `Int8` or `Int64` without
//! the caller caring which.

use crate::aggregations::error::AggregationError;
use chrono::NaiveDate;
use polars::prelude::*;

/// Retrieves a column by name from a DataFrame.
fn get_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, AggregationError> {
    df.column(name)
        .map_err(|e| AggregationError::ColumnNotFound(name.to_string(), e))
}

fn cast_column(
    df: &DataFrame,
    name: &str,
    dtype: DataType,
    expected: &'static str,
) -> Result<Column, AggregationError> {
    get_column(df, name)?
        .cast(&dtype)
        .map_err(|source| AggregationError::ColumnType {
            column: name.to_string(),
            expected,
            source,
        })
}

fn type_error<'a>(
    name: &'a str,
    expected: &'static str,
) -> impl FnOnce(PolarsError) -> AggregationError + 'a {
    move |source| AggregationError::ColumnType {
        column: name.to_string(),
        expected,
        source,
    }
}

fn require<T>(
    name: &str,
    values: impl IntoIterator<Item = Option<T>>,
) -> Result<Vec<T>, AggregationError> {
    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| AggregationError::UnexpectedNull {
                column: name.to_string(),
                row,
            })
        })
        .collect()
}

pub(crate) fn i64_values(df: &DataFrame, name: &str) -> Result<Vec<i64>, AggregationError> {
    let column = cast_column(df, name, DataType::Int64, "Int64")?;
    let values = column.i64().map_err(type_error(name, "Int64"))?;
    require(name, values)
}

pub(crate) fn i32_values(df: &DataFrame, name: &str) -> Result<Vec<i32>, AggregationError> {
    let column = cast_column(df, name, DataType::Int32, "Int32")?;
    let values = column.i32().map_err(type_error(name, "Int32"))?;
    require(name, values)
}

pub(crate) fn u32_values(df: &DataFrame, name: &str) -> Result<Vec<u32>, AggregationError> {
    let column = cast_column(df, name, DataType::UInt32, "UInt32")?;
    let values = column.u32().map_err(type_error(name, "UInt32"))?;
    require(name, values)
}

pub(crate) fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, AggregationError> {
    let column = cast_column(df, name, DataType::Float64, "Float64")?;
    let values = column.f64().map_err(type_error(name, "Float64"))?;
    require(name, values)
}

/// Float column where null and non-finite entries become `None`.
pub(crate) fn opt_f64_values(
    df: &DataFrame,
    name: &str,
) -> Result<Vec<Option<f64>>, AggregationError> {
    let column = cast_column(df, name, DataType::Float64, "Float64")?;
    let values = column.f64().map_err(type_error(name, "Float64"))?;
    Ok(values
        .into_iter()
        .map(|value| value.filter(|v| v.is_finite()))
        .collect())
}

pub(crate) fn bool_values(df: &DataFrame, name: &str) -> Result<Vec<bool>, AggregationError> {
    let column = cast_column(df, name, DataType::Boolean, "Boolean")?;
    let values = column.bool().map_err(type_error(name, "Boolean"))?;
    require(name, values)
}

pub(crate) fn string_values(df: &DataFrame, name: &str) -> Result<Vec<String>, AggregationError> {
    let column = cast_column(df, name, DataType::String, "String")?;
    let values = column.str().map_err(type_error(name, "String"))?;
    require(
        name,
        values.into_iter().map(|value| value.map(str::to_string)),
    )
}

pub(crate) fn date_values(df: &DataFrame, name: &str) -> Result<Vec<NaiveDate>, AggregationError> {
    let column = cast_column(df, name, DataType::Date, "Date")?;
    let values = column
        .as_materialized_series()
        .date()
        .map_err(type_error(name, "Date"))?;
    require(name, values.as_date_iter())
}
