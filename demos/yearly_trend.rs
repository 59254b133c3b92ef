//! demos/yearly_trend.rs
//!
//! Loads the published bike-sharing tables and plots rides per day, one line
//! per year, for the whole dataset using the `plotlars` crate.
//!
//! To run this demo:
//! cargo run --example yearly_trend --features examples

use std::error::Error;

use bikeshare::{BikeShare, YearlyDailyTotals};
use plotlars::{Legend, Line, Plot, Rgb, Text, TimeSeriesPlot};
use polars::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    println!("Loading bike-sharing data...");

    // 1. Create a client and load both tables
    let client = BikeShare::new().await?;
    let data = client.load().call().await?;

    // 2. Summarize everything the dataset covers
    let Some(range) = data.coverage()? else {
        println!("The dataset is empty.");
        return Ok(());
    };
    let bundle = data.summarize(&range)?;

    // 3. Plot the year pivot
    println!("Generating yearly trend plot for {}...", range);
    let frame = pivot_to_frame(&bundle.yearly_totals)?;
    plot_trend(&frame, &bundle.yearly_totals.years);
    println!("Plot shown in browser.");

    Ok(())
}

/// One `day` column plus one column per year.
fn pivot_to_frame(totals: &YearlyDailyTotals) -> PolarsResult<DataFrame> {
    let days: Vec<String> = totals
        .by_date
        .keys()
        .map(|date| date.format("%m-%d").to_string())
        .collect();
    let mut columns = vec![Column::new("day".into(), days)];
    for year in &totals.years {
        let rides: Vec<i64> = totals.series(*year).into_iter().map(|(_, n)| n).collect();
        columns.push(Column::new(year.to_string().into(), rides));
    }
    DataFrame::new(columns)
}

fn plot_trend(data: &DataFrame, years: &[i32]) {
    let Some((first, rest)) = years.split_first() else {
        return;
    };
    let first = first.to_string();
    let rest: Vec<String> = rest.iter().map(|year| year.to_string()).collect();

    TimeSeriesPlot::builder()
        .data(data)
        .x("day")
        .y(&first)
        .additional_series(rest.iter().map(String::as_str).collect())
        .colors(vec![Rgb(69, 157, 230), Rgb(235, 117, 0)])
        .lines(vec![Line::Solid, Line::Dash])
        .plot_title(Text::from("Rides per day by year").font("Arial").size(18))
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("day")
        .y_title("rides")
        .build()
        .plot();
}
