//! Summaries computed over the hourly table.

use crate::aggregations::error::AggregationError;
use crate::aggregations::extract::{i64_values, u32_values};
use crate::aggregations::summaries::{HourStats, HourlyTotal};
use crate::aggregations::{
    count_summary_aggs, read_count_summaries, read_distinct, sort_by_sum_desc,
};
use crate::types::frames::hourly_frame::HourlyFrame;
use crate::types::table_kind::columns;
use log::debug;
use polars::prelude::*;

const HOUR_KEY: &str = "hour_key";

/// Ride statistics per hour of the day, busiest hour first.
pub fn hour_stats(hourly: &HourlyFrame) -> Result<Vec<HourStats>, AggregationError> {
    let grouped = hourly
        .frame
        .clone()
        .group_by([col(columns::HOUR).alias(HOUR_KEY)])
        .agg(count_summary_aggs(col(columns::HOUR)));
    let df = sort_by_sum_desc(grouped, HOUR_KEY).collect()?;

    let hours = u32_values(&df, HOUR_KEY)?;
    let distinct = read_distinct(&df)?;
    let counts = read_count_summaries(&df)?;
    debug!("Computed statistics for {} hours of the day", hours.len());

    Ok(hours
        .into_iter()
        .zip(distinct)
        .zip(counts)
        .map(|((hour, hours), count)| HourStats { hour, hours, count })
        .collect())
}

/// Casual rides per hour of the day, over non-working days only.
pub fn casual_by_hour_non_working(
    hourly: &HourlyFrame,
) -> Result<Vec<HourlyTotal>, AggregationError> {
    totals_by_hour(&hourly.working_days(false), columns::CASUAL)
}

/// Registered rides per hour of the day, over working days only.
pub fn registered_by_hour_working(
    hourly: &HourlyFrame,
) -> Result<Vec<HourlyTotal>, AggregationError> {
    totals_by_hour(&hourly.working_days(true), columns::REGISTERED)
}

/// Sums `value` per hour, ascending by hour. Hours without rows are absent.
fn totals_by_hour(hourly: &HourlyFrame, value: &str) -> Result<Vec<HourlyTotal>, AggregationError> {
    let df = hourly
        .frame
        .clone()
        .group_by([col(columns::HOUR)])
        .agg([col(value).sum()])
        .sort_by_exprs([col(columns::HOUR)], Default::default())
        .collect()?;

    let hours = u32_values(&df, columns::HOUR)?;
    let totals = i64_values(&df, value)?;
    Ok(hours
        .into_iter()
        .zip(totals)
        .map(|(hour, total)| HourlyTotal { hour, total })
        .collect())
}
