//! Summaries computed over the daily table.

use crate::aggregations::error::AggregationError;
use crate::aggregations::extract::{
    bool_values, date_values, i32_values, i64_values, string_values, u32_values,
};
use crate::aggregations::summaries::{
    CategoryStats, Headline, MonthlyUserTotals, WeekdayRfm, WorkingDayStats, YearlyDailyTotals,
};
use crate::aggregations::{
    count_std_agg, count_summary_aggs, read_count_summaries, read_distinct, read_std,
    sort_by_sum_desc, DISTINCT, SUM,
};
use crate::types::frames::daily_frame::DailyFrame;
use crate::types::table_kind::columns;
use chrono::{NaiveDate, Weekday};
use log::debug;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

const MONTH_KEY: &str = "month_key";
const MONTH_NUMBER: &str = "month_number";
const LAST_DATE: &str = "last_date";
const FREQUENCY: &str = "frequency";

/// Rides per date pivoted by year.
///
/// Groups by `(date, year)`, sums the ride count and spreads the years into
/// columns, filling the combinations that never occur with `0`.
pub fn daily_totals_by_year(daily: &DailyFrame) -> Result<YearlyDailyTotals, AggregationError> {
    let df = daily
        .frame
        .clone()
        .group_by([col(columns::DATE), col(columns::YEAR)])
        .agg([col(columns::COUNT).sum().alias(SUM)])
        .collect()?;

    let dates = date_values(&df, columns::DATE)?;
    let years = i32_values(&df, columns::YEAR)?;
    let sums = i64_values(&df, SUM)?;

    let all_years: BTreeSet<i32> = years.iter().copied().collect();
    let mut by_date: BTreeMap<NaiveDate, BTreeMap<i32, i64>> = BTreeMap::new();
    for ((date, year), sum) in dates.into_iter().zip(years).zip(sums) {
        *by_date.entry(date).or_default().entry(year).or_insert(0) += sum;
    }
    for row in by_date.values_mut() {
        for year in &all_years {
            row.entry(*year).or_insert(0);
        }
    }

    debug!(
        "Pivoted {} dates over {} years",
        by_date.len(),
        all_years.len()
    );
    Ok(YearlyDailyTotals {
        years: all_years.into_iter().collect(),
        by_date,
    })
}

/// Ride statistics for working days versus non-working days, busiest group first.
pub fn working_day_stats(daily: &DailyFrame) -> Result<Vec<WorkingDayStats>, AggregationError> {
    let mut aggs = count_summary_aggs(col(columns::DATE));
    aggs.push(count_std_agg());
    let grouped = daily
        .frame
        .clone()
        .group_by([col(columns::WORKING_DAY)])
        .agg(aggs);
    let df = sort_by_sum_desc(grouped, columns::WORKING_DAY).collect()?;

    let keys = bool_values(&df, columns::WORKING_DAY)?;
    let days = read_distinct(&df)?;
    let counts = read_count_summaries(&df)?;
    let stds = read_std(&df)?;

    Ok(keys
        .into_iter()
        .zip(days)
        .zip(counts)
        .zip(stds)
        .map(|(((working_day, days), count), std)| WorkingDayStats {
            working_day,
            days,
            count,
            std,
        })
        .collect())
}

/// Ride statistics per season, busiest season first.
pub fn season_stats(daily: &DailyFrame) -> Result<Vec<CategoryStats>, AggregationError> {
    category_stats(daily, columns::SEASON)
}

/// Ride statistics per weather situation, busiest situation first.
pub fn weather_stats(daily: &DailyFrame) -> Result<Vec<CategoryStats>, AggregationError> {
    category_stats(daily, columns::WEATHER)
}

fn category_stats(daily: &DailyFrame, key: &str) -> Result<Vec<CategoryStats>, AggregationError> {
    let grouped = daily
        .frame
        .clone()
        .group_by([col(key)])
        .agg(count_summary_aggs(col(columns::DATE)));
    let df = sort_by_sum_desc(grouped, key).collect()?;

    let labels = string_values(&df, key)?;
    let days = read_distinct(&df)?;
    let counts = read_count_summaries(&df)?;
    debug!("Grouped daily table by {} into {} groups", key, labels.len());

    Ok(labels
        .into_iter()
        .zip(days)
        .zip(counts)
        .map(|((label, days), count)| CategoryStats { label, days, count })
        .collect())
}

/// Casual, registered and total rides per month label, in calendar month order.
///
/// Month labels may be numbers or names; ordering uses the calendar month of
/// the dates in each group, so both sort naturally.
pub fn monthly_user_type_totals(
    daily: &DailyFrame,
) -> Result<Vec<MonthlyUserTotals>, AggregationError> {
    let df = daily
        .frame
        .clone()
        .group_by([col(columns::MONTH).alias(MONTH_KEY)])
        .agg([
            col(columns::MONTH).n_unique().alias(DISTINCT),
            col(columns::CASUAL).sum(),
            col(columns::REGISTERED).sum(),
            col(columns::COUNT).sum(),
            col(columns::DATE)
                .dt()
                .month()
                .cast(DataType::Int32)
                .min()
                .alias(MONTH_NUMBER),
        ])
        .sort_by_exprs(
            [col(MONTH_NUMBER), col(MONTH_KEY)],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;

    let months = string_values(&df, MONTH_KEY)?;
    let distinct = read_distinct(&df)?;
    let casual = i64_values(&df, columns::CASUAL)?;
    let registered = i64_values(&df, columns::REGISTERED)?;
    let totals = i64_values(&df, columns::COUNT)?;

    Ok(months
        .into_iter()
        .zip(distinct)
        .zip(casual)
        .zip(registered)
        .zip(totals)
        .map(
            |((((month, months), casual), registered), total)| MonthlyUserTotals {
                month,
                months,
                casual,
                registered,
                total,
            },
        )
        .collect())
}

/// Recency, frequency and monetary value per weekday, Sunday through Saturday.
///
/// Recency counts the days between the latest date of the whole input and the
/// latest date of the weekday. Weekdays absent from the input are left out.
pub fn rfm_by_weekday(daily: &DailyFrame) -> Result<Vec<WeekdayRfm>, AggregationError> {
    let df = daily
        .frame
        .clone()
        .group_by([col(columns::WEEKDAY)])
        .agg([
            col(columns::DATE).max().alias(LAST_DATE),
            len().alias(FREQUENCY),
            col(columns::COUNT).sum().alias(SUM),
        ])
        .collect()?;

    let labels = string_values(&df, columns::WEEKDAY)?;
    let last_dates = date_values(&df, LAST_DATE)?;
    let frequencies = u32_values(&df, FREQUENCY)?;
    let monetary = i64_values(&df, SUM)?;

    // The weekday groups partition the input, so the latest group date is the latest date overall.
    let Some(latest) = last_dates.iter().max().copied() else {
        return Ok(Vec::new());
    };

    let mut rfm = labels
        .into_iter()
        .zip(last_dates)
        .zip(frequencies)
        .zip(monetary)
        .map(|(((label, last_date), frequency), monetary)| {
            Ok(WeekdayRfm {
                weekday: parse_weekday(&label)?,
                recency_days: (latest - last_date).num_days(),
                frequency,
                monetary,
            })
        })
        .collect::<Result<Vec<_>, AggregationError>>()?;
    rfm.sort_by_key(|entry| entry.weekday.num_days_from_sunday());
    Ok(rfm)
}

fn parse_weekday(label: &str) -> Result<Weekday, AggregationError> {
    label
        .trim()
        .parse::<Weekday>()
        .map_err(|_| AggregationError::UnknownWeekday(label.to_string()))
}

/// Registered and total rides over the whole input.
pub fn headline_metrics(daily: &DailyFrame) -> Result<Headline, AggregationError> {
    let df = daily
        .frame
        .clone()
        .select([
            len().alias(FREQUENCY),
            col(columns::REGISTERED).sum(),
            col(columns::COUNT).sum(),
        ])
        .collect()?;

    Ok(Headline {
        days: u32_values(&df, FREQUENCY)?.first().copied().unwrap_or(0),
        registered: i64_values(&df, columns::REGISTERED)?
            .first()
            .copied()
            .unwrap_or(0),
        total: i64_values(&df, columns::COUNT)?
            .first()
            .copied()
            .unwrap_or(0),
    })
}
