//! Normalizes a freshly parsed table and checks the dataset invariants.

use crate::data::error::LoadError;
use crate::types::table_kind::{columns, TableKind};
use log::{debug, warn};
use polars::prelude::*;

const ROWS: &str = "rows";

/// Coerces `df` to the documented column types and validates it.
///
/// Extra source columns are dropped. Running this on an already prepared
/// table is a no-op apart from the checks.
pub(crate) fn prepare_table(df: DataFrame, table: TableKind) -> Result<DataFrame, LoadError> {
    let df = normalize(df, table)?;
    validate(&df, table)?;
    debug!(
        "Prepared {} table with {} rows and {} columns",
        table,
        df.height(),
        df.width()
    );
    Ok(df)
}

fn normalize(df: DataFrame, table: TableKind) -> Result<DataFrame, LoadError> {
    let missing: Vec<String> = table
        .schema_column_names()
        .into_iter()
        .filter(|name| df.column(name).is_err())
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        warn!("The {} table lacks columns {:?}", table, missing);
        return Err(LoadError::MissingColumns {
            table,
            columns: missing,
        });
    }

    let mut exprs = vec![date_expr(df.column(columns::DATE)?.dtype())];
    exprs.extend(
        table
            .typed_columns()
            .into_iter()
            .map(|(name, dtype)| col(name).cast(dtype)),
    );

    df.lazy()
        .select(exprs)
        .collect()
        .map_err(|source| LoadError::Normalize { table, source })
}

/// Parses the date column into a calendar date, whatever the CSV reader inferred.
fn date_expr(dtype: &DataType) -> Expr {
    let date = col(columns::DATE);
    match dtype {
        DataType::String => date.str().to_date(StrptimeOptions {
            format: Some("%Y-%m-%d".into()),
            strict: false,
            exact: false,
            ..Default::default()
        }),
        DataType::Date => date,
        _ => date.cast(DataType::Date),
    }
    .alias(columns::DATE)
}

fn validate(df: &DataFrame, table: TableKind) -> Result<(), LoadError> {
    for name in table.schema_column_names() {
        let count = df.column(name)?.null_count();
        if count > 0 {
            warn!("Column {} of the {} table has {} nulls", name, table, count);
            return Err(LoadError::NullValues {
                table,
                column: name.to_string(),
                count,
            });
        }
    }

    let inconsistent = df
        .clone()
        .lazy()
        .filter(col(columns::COUNT).neq(col(columns::CASUAL) + col(columns::REGISTERED)))
        .collect()?
        .height();
    if inconsistent > 0 {
        warn!(
            "{} rows of the {} table break cnt == casual + registered",
            inconsistent, table
        );
        return Err(LoadError::InconsistentTotals {
            table,
            rows: inconsistent,
        });
    }

    let key = table.key_columns();
    let duplicates = df
        .clone()
        .lazy()
        .group_by(key.iter().map(|name| col(*name)).collect::<Vec<_>>())
        .agg([len().alias(ROWS)])
        .filter(col(ROWS).gt(lit(1)))
        .collect()?
        .height();
    if duplicates > 0 {
        warn!("{} duplicate keys in the {} table", duplicates, table);
        return Err(LoadError::DuplicateKeys {
            table,
            key: key.into_iter().map(str::to_string).collect(),
            rows: duplicates,
        });
    }

    if table == TableKind::Hourly {
        let out_of_range = df
            .clone()
            .lazy()
            .filter(
                col(columns::HOUR)
                    .lt(lit(0))
                    .or(col(columns::HOUR).gt(lit(23))),
            )
            .collect()?
            .height();
        if out_of_range > 0 {
            return Err(LoadError::HourOutOfRange { rows: out_of_range });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw_daily(dates: &[&str], casual: &[i64], registered: &[i64], cnt: &[i64]) -> DataFrame {
        let n = dates.len();
        df!(
            "instant" => (1..=n as i64).collect::<Vec<_>>(),
            columns::DATE => dates,
            columns::YEAR => vec![0i64; n],
            columns::MONTH => vec!["Jan"; n],
            columns::WEEKDAY => vec!["Saturday"; n],
            columns::SEASON => vec!["Winter"; n],
            columns::WEATHER => vec!["Clear"; n],
            columns::WORKING_DAY => vec![0i64; n],
            columns::TEMPERATURE => vec![0.3; n],
            columns::HUMIDITY => vec![0.5; n],
            columns::WINDSPEED => vec![0.2; n],
            columns::CASUAL => casual,
            columns::REGISTERED => registered,
            columns::COUNT => cnt,
        )
        .unwrap()
    }

    #[test]
    fn prepare_coerces_types_and_drops_extra_columns() -> Result<(), Box<dyn std::error::Error>> {
        let df = prepare_table(
            raw_daily(&["2011-01-01", "2011-01-02"], &[1, 2], &[3, 4], &[4, 6]),
            TableKind::Daily,
        )?;

        assert_eq!(df.width(), TableKind::Daily.schema_column_names().len());
        assert!(df.column("instant").is_err());
        assert_eq!(df.column(columns::DATE)?.dtype(), &DataType::Date);
        assert_eq!(df.column(columns::WORKING_DAY)?.dtype(), &DataType::Boolean);
        assert_eq!(df.column(columns::YEAR)?.dtype(), &DataType::Int32);

        let again = prepare_table(df.clone(), TableKind::Daily)?;
        assert!(again.equals(&df));

        let first = crate::aggregations::extract::date_values(&df, columns::DATE)?;
        assert_eq!(first[0], NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        Ok(())
    }

    #[test]
    fn rejects_missing_columns() {
        let df = raw_daily(&["2011-01-01"], &[1], &[3], &[4])
            .drop(columns::WEATHER)
            .unwrap();
        match prepare_table(df, TableKind::Daily) {
            Err(LoadError::MissingColumns { columns: missing, .. }) => {
                assert_eq!(missing, vec![columns::WEATHER.to_string()])
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn rejects_unparseable_dates() {
        let df = raw_daily(&["2011-01-01", "not a date"], &[1, 1], &[3, 3], &[4, 4]);
        assert!(matches!(
            prepare_table(df, TableKind::Daily),
            Err(LoadError::NullValues { column, count: 1, .. }) if column == columns::DATE
        ));
    }

    #[test]
    fn rejects_inconsistent_totals() {
        let df = raw_daily(&["2011-01-01", "2011-01-02"], &[1, 2], &[3, 4], &[4, 7]);
        assert!(matches!(
            prepare_table(df, TableKind::Daily),
            Err(LoadError::InconsistentTotals { rows: 1, .. })
        ));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let df = raw_daily(&["2011-01-01", "2011-01-01"], &[1, 2], &[3, 4], &[4, 6]);
        assert!(matches!(
            prepare_table(df, TableKind::Daily),
            Err(LoadError::DuplicateKeys { rows: 1, .. })
        ));
    }

    #[test]
    fn hourly_key_includes_hour() -> Result<(), Box<dyn std::error::Error>> {
        let mut df = raw_daily(&["2011-01-01", "2011-01-01"], &[1, 2], &[3, 4], &[4, 6]);
        df.with_column(Column::new(columns::HOUR.into(), [0i64, 1]))?;
        assert_eq!(prepare_table(df.clone(), TableKind::Hourly)?.height(), 2);

        df.with_column(Column::new(columns::HOUR.into(), [0i64, 24]))?;
        assert!(matches!(
            prepare_table(df, TableKind::Hourly),
            Err(LoadError::HourOutOfRange { rows: 1 })
        ));
        Ok(())
    }
}
