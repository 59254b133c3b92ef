//! Pearson correlation between the weather variables and the ride count.

use crate::aggregations::error::AggregationError;
use crate::aggregations::extract::f64_values;
use crate::aggregations::summaries::{CorrelationMatrix, WeatherVariable};
use crate::types::frames::hourly_frame::HourlyFrame;
use log::debug;
use polars::prelude::*;

/// Pairwise Pearson coefficients of temperature, humidity, windspeed and count.
///
/// The diagonal is exactly `1.0`. Pairs involving a variable that never changes
/// (or inputs of a single row) have no defined coefficient and come out as `None`.
pub fn weather_correlation(hourly: &HourlyFrame) -> Result<CorrelationMatrix, AggregationError> {
    let variables = WeatherVariable::ALL;
    let df = hourly
        .frame
        .clone()
        .select(variables.iter().map(|v| col(v.column())).collect::<Vec<_>>())
        .collect()?;
    if df.height() == 0 {
        return Ok(CorrelationMatrix::default());
    }

    let series = variables
        .iter()
        .map(|v| f64_values(&df, v.column()))
        .collect::<Result<Vec<_>, _>>()?;

    let size = variables.len();
    let mut coefficients = vec![vec![None; size]; size];
    for i in 0..size {
        coefficients[i][i] = Some(1.0);
        for j in (i + 1)..size {
            let r = pearson(&series[i], &series[j]);
            coefficients[i][j] = r;
            coefficients[j][i] = r;
        }
    }

    debug!("Correlated {} variables over {} rows", size, df.height());
    Ok(CorrelationMatrix {
        variables: variables.to_vec(),
        coefficients,
    })
}

/// Sample Pearson coefficient from centered sums, clamped to `[-1, 1]`.
fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    let r = sxy / (sxx.sqrt() * syy.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}
