//! Describes where a table is read from.

use crate::types::table_kind::TableKind;
use std::fmt;
use std::path::{Path, PathBuf};

/// Published location of the cleaned daily table.
pub const DEFAULT_DAILY_URL: &str = "https://raw.githubusercontent.com/Prayoga-bit/Bike-Sharing-Data-Analysis/refs/heads/main/dashboard/day_clean.csv";

/// Published location of the cleaned hourly table.
pub const DEFAULT_HOURLY_URL: &str = "https://raw.githubusercontent.com/Prayoga-bit/Bike-Sharing-Data-Analysis/refs/heads/main/dashboard/hour_clean.csv";

/// The location of one comma-separated input table.
///
/// Remote sources are downloaded once and cached; local files are read as-is.
/// A location ending in `.gz` is decompressed while it is read.
///
/// # Examples
///
/// ```
/// use bikeshare::DataSource;
/// use std::path::PathBuf;
///
/// assert!(matches!(DataSource::from("https://example.com/day.csv"), DataSource::Url(_)));
/// assert_eq!(
///     DataSource::from("data/day_clean.csv"),
///     DataSource::Path(PathBuf::from("data/day_clean.csv"))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataSource {
    /// An `http://` or `https://` location.
    Url(String),
    /// A file on the local filesystem.
    Path(PathBuf),
}

impl DataSource {
    /// The published location for the given table.
    pub fn default_for(kind: TableKind) -> Self {
        match kind {
            TableKind::Daily => DataSource::Url(DEFAULT_DAILY_URL.to_string()),
            TableKind::Hourly => DataSource::Url(DEFAULT_HOURLY_URL.to_string()),
        }
    }

    pub(crate) fn is_gzip(&self) -> bool {
        match self {
            DataSource::Url(url) => strip_query(url).ends_with(".gz"),
            DataSource::Path(path) => path.extension().is_some_and(|ext| ext == "gz"),
        }
    }

    /// File name under which a downloaded copy of this source is cached.
    ///
    /// Built from the table kind and the whole location (host and path for a
    /// URL) so that switching sources never reuses a stale cache entry of
    /// another file, even when both end in the same file name.
    pub(crate) fn cache_file_name(&self, kind: TableKind) -> String {
        let location = match self {
            DataSource::Url(url) => {
                let url = strip_query(url);
                url.split_once("://").map_or(url, |(_, rest)| rest).to_string()
            }
            DataSource::Path(path) => path.to_string_lossy().into_owned(),
        };
        let stem = location
            .trim_end_matches('/')
            .trim_end_matches(".gz")
            .trim_end_matches(".csv");
        let sanitized: String = stem
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let sanitized = sanitized.trim_matches('_');
        if sanitized.is_empty() {
            format!("{}.parquet", kind)
        } else {
            format!("{}-{}.parquet", kind, sanitized)
        }
    }
}

fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

impl From<&str> for DataSource {
    fn from(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            DataSource::Url(value.to_string())
        } else {
            DataSource::Path(PathBuf::from(value))
        }
    }
}

impl From<String> for DataSource {
    fn from(value: String) -> Self {
        DataSource::from(value.as_str())
    }
}

impl From<PathBuf> for DataSource {
    fn from(value: PathBuf) -> Self {
        DataSource::Path(value)
    }
}

impl From<&Path> for DataSource {
    fn from(value: &Path) -> Self {
        DataSource::Path(value.to_path_buf())
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{}", url),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}
