//! The aggregation engine: independent, pure summaries over a filtered table.
//!
//! Each function takes a (usually date-filtered) frame, runs one Polars
//! group-by plan, and reads the result into the typed structures of
//! [`summaries`]. An empty input always yields an empty output.

pub mod correlation;
pub mod daily;
pub mod error;
pub(crate) mod extract;
pub mod hourly;
pub mod summaries;

use crate::aggregations::error::AggregationError;
use crate::aggregations::extract::{f64_values, i64_values, opt_f64_values, u32_values};
use crate::aggregations::summaries::CountSummary;
use crate::types::table_kind::columns;
use polars::prelude::{col, DataFrame, Expr, LazyFrame, SortMultipleOptions};

pub(crate) const DISTINCT: &str = "distinct";
pub(crate) const SUM: &str = "sum";
pub(crate) const MIN: &str = "min";
pub(crate) const MAX: &str = "max";
pub(crate) const MEAN: &str = "mean";
pub(crate) const STD: &str = "std";

/// Distinct count of `distinct` plus sum/min/max/mean of the ride count.
pub(crate) fn count_summary_aggs(distinct: Expr) -> Vec<Expr> {
    vec![
        distinct.n_unique().alias(DISTINCT),
        col(columns::COUNT).sum().alias(SUM),
        col(columns::COUNT).min().alias(MIN),
        col(columns::COUNT).max().alias(MAX),
        col(columns::COUNT).mean().alias(MEAN),
    ]
}

/// Sample standard deviation of the ride count (ddof = 1).
pub(crate) fn count_std_agg() -> Expr {
    col(columns::COUNT).std(1).alias(STD)
}

/// Orders groups by descending ride sum; ties fall back to the ascending key.
pub(crate) fn sort_by_sum_desc(frame: LazyFrame, key: &str) -> LazyFrame {
    frame.sort_by_exprs(
        [col(SUM), col(key)],
        SortMultipleOptions::default()
            .with_order_descending_multi([true, false])
            .with_maintain_order(true),
    )
}

pub(crate) fn read_distinct(df: &DataFrame) -> Result<Vec<u32>, AggregationError> {
    u32_values(df, DISTINCT)
}

pub(crate) fn read_count_summaries(df: &DataFrame) -> Result<Vec<CountSummary>, AggregationError> {
    let sums = i64_values(df, SUM)?;
    let mins = i64_values(df, MIN)?;
    let maxs = i64_values(df, MAX)?;
    let means = f64_values(df, MEAN)?;
    Ok(sums
        .into_iter()
        .zip(mins)
        .zip(maxs)
        .zip(means)
        .map(|(((sum, min), max), mean)| CountSummary {
            sum,
            min,
            max,
            mean,
        })
        .collect())
}

pub(crate) fn read_std(df: &DataFrame) -> Result<Vec<Option<f64>>, AggregationError> {
    opt_f64_values(df, STD)
}
