//! This module provides the main entry point of the crate: a client that loads
//! the daily and hourly bike-sharing tables, from the published files or from
//! any other location, and caches downloads on disk.

use crate::data::loader::{is_cached_table, TableLoader};
use crate::dashboard::BikeShareData;
use crate::error::BikeShareError;
use crate::types::data_source::DataSource;
use crate::types::frames::daily_frame::DailyFrame;
use crate::types::frames::hourly_frame::HourlyFrame;
use crate::types::table_kind::TableKind;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use log::info;
use polars::prelude::IntoLazy;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// The client for loading the bike-sharing dataset.
///
/// Create an instance using [`BikeShare::new()`] for the default cache
/// directory or [`BikeShare::with_cache_folder()`] for a custom one, then call
/// [`BikeShare::load`] once at startup.
///
/// # Examples
///
/// ```rust,no_run
/// # use bikeshare::{BikeShare, BikeShareError};
/// # async fn run() -> Result<(), BikeShareError> {
/// let client = BikeShare::new().await?;
/// let data = client.load().call().await?;
/// if let Some(range) = data.coverage()? {
///     let bundle = data.summarize(&range)?;
///     println!("{} rides in total", bundle.headline.total);
/// }
/// # Ok(())
/// # }
/// ```
pub struct BikeShare {
    loader: TableLoader,
}

#[bon]
impl BikeShare {
    /// Creates a client that caches downloaded tables in `cache_folder`.
    ///
    /// The directory is created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`BikeShareError::CacheDirCreation`] if the directory cannot be created.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, BikeShareError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| BikeShareError::CacheDirCreation(cache_folder.clone(), e))?;
        Ok(Self {
            loader: TableLoader::new(&cache_folder),
        })
    }

    /// Creates a client using the default cache directory.
    ///
    /// The default is determined using the `dirs` crate, typically
    /// `~/.cache/bikeshare_rs_cache` on Linux.
    ///
    /// # Errors
    ///
    /// Returns [`BikeShareError::CacheDirResolution`] if the default cache directory cannot be found.
    /// Returns [`BikeShareError::CacheDirCreation`] if it cannot be created.
    pub async fn new() -> Result<Self, BikeShareError> {
        let cache_folder = get_cache_dir().map_err(BikeShareError::CacheDirResolution)?;
        Self::with_cache_folder(cache_folder).await
    }

    pub fn cache_folder(&self) -> &Path {
        self.loader.cache_dir()
    }

    /// Loads both tables, concurrently.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.daily(impl Into<DataSource>)`: Optional. Where to read the daily table from. Defaults to the published `day_clean.csv`.
    /// * `.hourly(impl Into<DataSource>)`: Optional. Where to read the hourly table from. Defaults to the published `hour_clean.csv`.
    /// * `.force_download(bool)`: Optional. Ignore cached copies of remote sources. Defaults to `false`.
    ///
    /// # Errors
    ///
    /// Returns [`BikeShareError::Load`] if either table cannot be fetched,
    /// parsed or validated. There is no retry.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use bikeshare::{BikeShare, BikeShareError};
    /// # async fn run() -> Result<(), BikeShareError> {
    /// let client = BikeShare::new().await?;
    /// let data = client
    ///     .load()
    ///     .daily("data/day_clean.csv")
    ///     .hourly("data/hour_clean.csv")
    ///     .call()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn load(
        &self,
        #[builder(into)] daily: Option<DataSource>,
        #[builder(into)] hourly: Option<DataSource>,
        force_download: Option<bool>,
    ) -> Result<BikeShareData, BikeShareError> {
        let daily_source = daily.unwrap_or_else(|| DataSource::default_for(TableKind::Daily));
        let hourly_source = hourly.unwrap_or_else(|| DataSource::default_for(TableKind::Hourly));
        let force_download = force_download.unwrap_or(false);

        let (daily_df, hourly_df) = tokio::try_join!(
            self.loader
                .load(TableKind::Daily, &daily_source, force_download),
            self.loader
                .load(TableKind::Hourly, &hourly_source, force_download),
        )?;

        Ok(BikeShareData::new(
            DailyFrame::new(daily_df.lazy()),
            HourlyFrame::new(hourly_df.lazy()),
        ))
    }

    /// Deletes the cached copies of downloaded tables and returns how many were removed.
    ///
    /// Other files in the cache folder are left alone.
    pub async fn clear_cache(&self) -> Result<usize, BikeShareError> {
        let dir = self.cache_folder();
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(BikeShareError::CacheDeletion(dir.to_path_buf(), e)),
        };

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| BikeShareError::CacheDeletion(dir.to_path_buf(), e))?
        {
            let path = entry.path();
            let is_table = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(is_cached_table);
            if is_table {
                fs::remove_file(&path)
                    .await
                    .map_err(|e| BikeShareError::CacheDeletion(path.clone(), e))?;
                removed += 1;
            }
        }
        info!("Removed {} cached tables from {:?}", removed, dir);
        Ok(removed)
    }
}
