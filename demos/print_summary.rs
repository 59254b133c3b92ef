//! demos/print_summary.rs
//!
//! Loads the two tables (from the published files, or from local paths given
//! as arguments), summarizes a date selection and prints every view.
//!
//! To run this demo:
//! cargo run --example print_summary -- [day.csv hour.csv] [start end]

use std::env;
use std::error::Error;

use bikeshare::{BikeShare, DateRange};
use chrono::NaiveDate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();

    let client = BikeShare::new().await?;
    let data = match args.as_slice() {
        [day, hour, ..] => {
            client
                .load()
                .daily(day.as_str())
                .hourly(hour.as_str())
                .call()
                .await?
        }
        _ => client.load().call().await?,
    };

    let range = match args.as_slice() {
        [_, _, start, end, ..] => DateRange::from_any(start.as_str(), end.as_str())?,
        _ => match data.coverage()? {
            Some(range) => range,
            None => {
                println!("The dataset is empty.");
                return Ok(());
            }
        },
    };

    match data.summarize_selection(Some(range.start()), Some(range.end())) {
        Ok(bundle) => {
            println!("Range: {}", bundle.range);
            println!(
                "Registered riders: {}, total rides: {}",
                bundle.headline.registered, bundle.headline.total
            );

            println!("\nBy season:");
            for season in &bundle.seasons {
                println!(
                    "  {:<10} {:>4} days {:>9} rides (mean {:.1})",
                    season.label, season.days, season.count.sum, season.count.mean
                );
            }

            println!("\nBusiest hours:");
            for hour in bundle.hours.iter().take(5) {
                println!("  {:02}:00 {:>9} rides", hour.hour, hour.count.sum);
            }

            println!("\nRFM by weekday:");
            for entry in &bundle.rfm {
                println!(
                    "  {:?} recency {} frequency {} monetary {}",
                    entry.weekday, entry.recency_days, entry.frequency, entry.monetary
                );
            }

            let first = bundle.yearly_totals.by_date.keys().next().copied();
            let last: Option<NaiveDate> = bundle.yearly_totals.by_date.keys().last().copied();
            println!("\nYearly pivot covers {:?} to {:?}", first, last);
        }
        Err(e) => println!("{}", e.user_message()),
    }

    Ok(())
}
