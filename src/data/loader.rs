use crate::data::error::LoadError;
use crate::data::validate::prepare_table;
use crate::types::data_source::DataSource;
use crate::types::table_kind::TableKind;
use async_compression::tokio::bufread::GzipDecoder;
use futures_util::TryStreamExt;
use log::{info, warn};
use polars::frame::DataFrame;
use polars::prelude::*;
use reqwest::Client;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::AsyncReadExt;
use tokio::{fs, task};
use tokio_util::io::StreamReader;

/// Fetches, parses, validates and caches the input tables.
pub struct TableLoader {
    cache_dir: PathBuf,
    download_client: Client,
}

impl TableLoader {
    pub fn new(cache_dir: &Path) -> TableLoader {
        let download_client = Client::new();
        TableLoader {
            cache_dir: cache_dir.to_path_buf(),
            download_client,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Loads one table from `source`, normalized and validated.
    ///
    /// Remote sources are cached as Parquet; a cache hit skips the download
    /// unless `force_download` is set. Local files are always read directly.
    pub async fn load(
        &self,
        table: TableKind,
        source: &DataSource,
        force_download: bool,
    ) -> Result<DataFrame, LoadError> {
        let df = match source {
            DataSource::Path(path) => {
                let raw_bytes = Self::read_local(path, source.is_gzip()).await?;
                let df = Self::csv_to_dataframe(raw_bytes, table).await?;
                prepare_table(df, table)?
            }
            DataSource::Url(url) => {
                let parquet_path = self.cache_dir.join(source.cache_file_name(table));

                if !force_download && fs::metadata(&parquet_path).await.is_ok() {
                    info!(
                        "Cache hit for the {} table at {:?}",
                        table, parquet_path
                    );
                    let cached = Self::read_cache(&parquet_path)?;
                    prepare_table(cached, table)?
                } else {
                    if force_download {
                        info!("Forced download of the {} table from {}", table, url);
                    } else {
                        warn!(
                            "Cache miss for the {} table. Downloading and processing.",
                            table
                        );
                    }
                    let raw_bytes = self.download(url, source.is_gzip()).await?;
                    let df = Self::csv_to_dataframe(raw_bytes, table).await?;
                    let df = prepare_table(df, table)?;

                    fs::create_dir_all(&self.cache_dir)
                        .await
                        .map_err(|e| LoadError::CacheDirCreation(self.cache_dir.clone(), e))?;
                    Self::cache_dataframe(df.clone(), &parquet_path).await?;
                    info!("Cached the {} table to {:?}", table, parquet_path);
                    df
                }
            }
        };

        info!("Loaded {} rows into the {} table", df.height(), table);
        Ok(df)
    }

    /// Downloads a CSV body, decompressing it while streaming when it is gzip.
    async fn download(&self, url: &str, gzip: bool) -> Result<Vec<u8>, LoadError> {
        info!("Downloading data from {}", url);

        let response = self
            .download_client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    LoadError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    LoadError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let mut stream_reader = StreamReader::new(stream);
        let mut body = Vec::new();
        if gzip {
            GzipDecoder::new(stream_reader)
                .read_to_end(&mut body)
                .await
                .map_err(LoadError::DownloadIo)?;
        } else {
            stream_reader
                .read_to_end(&mut body)
                .await
                .map_err(LoadError::DownloadIo)?;
        }
        info!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }

    async fn read_local(path: &Path, gzip: bool) -> Result<Vec<u8>, LoadError> {
        info!("Reading data from {:?}", path);
        let raw = fs::read(path)
            .await
            .map_err(|e| LoadError::SourceRead(path.to_path_buf(), e))?;
        if !gzip {
            return Ok(raw);
        }
        let mut decompressed = Vec::new();
        GzipDecoder::new(raw.as_slice())
            .read_to_end(&mut decompressed)
            .await
            .map_err(LoadError::DownloadIo)?;
        Ok(decompressed)
    }

    /// Parses raw CSV bytes (with a header row) into a DataFrame using a blocking task.
    async fn csv_to_dataframe(bytes: Vec<u8>, table: TableKind) -> Result<DataFrame, LoadError> {
        task::spawn_blocking(move || {
            let mut temp_file =
                NamedTempFile::new().map_err(|source| LoadError::CsvReadIo { table, source })?;
            temp_file
                .write_all(&bytes)
                .map_err(|source| LoadError::CsvReadIo { table, source })?;
            temp_file
                .flush()
                .map_err(|source| LoadError::CsvReadIo { table, source })?;

            CsvReadOptions::default()
                .with_has_header(true)
                .try_into_reader_with_file_path(Some(temp_file.path().to_path_buf()))
                .map_err(|source| LoadError::CsvReadPolars { table, source })?
                .finish()
                .map_err(|source| LoadError::CsvReadPolars { table, source })
        })
        .await?
    }

    /// Writes a DataFrame to a Parquet file using spawn_blocking.
    async fn cache_dataframe(mut df: DataFrame, path: &Path) -> Result<(), LoadError> {
        let path_buf = path.to_path_buf();
        task::spawn_blocking(move || {
            let file = std::fs::File::create(&path_buf)
                .map_err(|e| LoadError::ParquetWriteIo(path_buf.clone(), e))?;
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map_err(|e| LoadError::ParquetWritePolars(path_buf, e))?;
            Ok::<(), LoadError>(())
        })
        .await??;
        Ok(())
    }

    fn read_cache(path: &Path) -> Result<DataFrame, LoadError> {
        LazyFrame::scan_parquet(path, Default::default())
            .and_then(|frame| frame.collect())
            .map_err(|e| LoadError::ParquetScan(path.to_path_buf(), e))
    }
}

/// Whether `file_name` is a table cached by [`TableLoader`].
pub(crate) fn is_cached_table(file_name: &str) -> bool {
    let Some(stem) = file_name.strip_suffix(".parquet") else {
        return false;
    };
    [TableKind::Daily, TableKind::Hourly].iter().any(|kind| {
        stem.strip_prefix(kind.name())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('-'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::table_kind::columns;
    use async_compression::tokio::write::GzipEncoder;
    use tempfile::TempDir;
    use tokio::io::AsyncWriteExt;

    const HEADER: &str = "instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt,weekday_name";

    fn daily_csv(rows: &[&str]) -> String {
        let mut csv = HEADER.to_string();
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        csv.push('\n');
        csv
    }

    const GOOD_ROWS: [&str; 2] = [
        "1,2011-01-01,Spring,2011,Jan,0,6,0,Misty,0.34,0.36,0.80,0.16,331,654,985,Saturday",
        "2,2011-01-02,Spring,2011,Jan,0,0,0,Misty,0.36,0.35,0.69,0.25,131,670,801,Sunday",
    ];

    async fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).await.unwrap();
        path
    }

    #[tokio::test]
    async fn loads_local_csv() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = write_file(&dir, "day_clean.csv", daily_csv(&GOOD_ROWS).as_bytes()).await;
        let loader = TableLoader::new(&dir.path().join("cache"));

        let df = loader
            .load(TableKind::Daily, &DataSource::Path(path), false)
            .await?;

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), TableKind::Daily.schema_column_names().len());
        assert_eq!(df.column(columns::DATE)?.dtype(), &DataType::Date);
        // Local sources are never cached.
        assert!(fs::metadata(loader.cache_dir()).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn loads_gzip_csv() -> Result<(), Box<dyn std::error::Error>> {
        let mut encoder = GzipEncoder::new(Vec::new());
        encoder.write_all(daily_csv(&GOOD_ROWS).as_bytes()).await?;
        encoder.shutdown().await?;
        let compressed = encoder.into_inner();

        let dir = TempDir::new()?;
        let path = write_file(&dir, "day_clean.csv.gz", &compressed).await;
        let loader = TableLoader::new(dir.path());

        let df = loader
            .load(TableKind::Daily, &DataSource::Path(path), false)
            .await?;
        assert_eq!(df.height(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn rejects_inconsistent_totals_on_load() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let bad = "3,2011-01-03,Spring,2011,Jan,0,1,1,Clear,0.19,0.18,0.43,0.24,120,1229,1000,Monday";
        let csv = daily_csv(&[GOOD_ROWS[0], bad]);
        let path = write_file(&dir, "day_clean.csv", csv.as_bytes()).await;

        let result = TableLoader::new(dir.path())
            .load(TableKind::Daily, &DataSource::Path(path), false)
            .await;
        assert!(matches!(
            result,
            Err(LoadError::InconsistentTotals { rows: 1, .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn rejects_missing_hour_column() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = write_file(&dir, "hour_clean.csv", daily_csv(&GOOD_ROWS).as_bytes()).await;

        let result = TableLoader::new(dir.path())
            .load(TableKind::Hourly, &DataSource::Path(path), false)
            .await;
        match result {
            Err(LoadError::MissingColumns { table, columns: missing }) => {
                assert_eq!(table, TableKind::Hourly);
                assert_eq!(missing, vec![columns::HOUR.to_string()]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_a_source_error() {
        let dir = TempDir::new().unwrap();
        let result = TableLoader::new(dir.path())
            .load(
                TableKind::Daily,
                &DataSource::Path(dir.path().join("absent.csv")),
                false,
            )
            .await;
        assert!(matches!(result, Err(LoadError::SourceRead(..))));
    }

    #[tokio::test]
    async fn cached_parquet_round_trips() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = write_file(&dir, "day_clean.csv", daily_csv(&GOOD_ROWS).as_bytes()).await;
        let df = TableLoader::new(dir.path())
            .load(TableKind::Daily, &DataSource::Path(path), false)
            .await?;

        let parquet_path = dir.path().join("daily-day_clean.parquet");
        TableLoader::cache_dataframe(df.clone(), &parquet_path).await?;
        let cached = prepare_table(TableLoader::read_cache(&parquet_path)?, TableKind::Daily)?;
        assert!(cached.equals(&df));
        Ok(())
    }

    #[test]
    fn recognizes_cached_table_names() {
        assert!(is_cached_table("daily-day_clean.parquet"));
        assert!(is_cached_table("hourly.parquet"));
        assert!(!is_cached_table("daily-day_clean.csv"));
        assert!(!is_cached_table("stations.parquet"));
        assert!(!is_cached_table("daily_backup.parquet"));
        assert!(!is_cached_table("hourlyish.parquet"));
    }
}
