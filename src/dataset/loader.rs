//! Dataset loading and shape validation.
//!
//! The dataset is fetched once per session from a static resource and held
//! read-only in memory; malformed countries and records are skipped with a
//! warning, while a root document that is not a JSON object is fatal.

use crate::models::{Dataset, TariffRecord};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while acquiring or validating the dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch dataset from {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("dataset has the wrong shape: {0}")]
    Shape(String),
}

/// Where the dataset JSON comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Local file path.
    File(PathBuf),
    /// HTTP(S) URL.
    Url(String),
}

impl DataSource {
    /// Interpret a CLI/config string: anything starting with `http://` or
    /// `https://` is a URL, everything else a local path.
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            DataSource::Url(value.to_string())
        } else {
            DataSource::File(PathBuf::from(value))
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Load and validate the dataset from a file or URL.
pub async fn load_dataset(source: &DataSource) -> Result<Dataset, DatasetError> {
    let raw = match source {
        DataSource::File(path) => read_file(path).await?,
        DataSource::Url(url) => fetch_url(url).await?,
    };

    let value: Value = serde_json::from_str(&raw)?;
    let dataset = dataset_from_value(value)?;

    info!(
        "Loaded {} countries with {} tariff records from {}",
        dataset.len(),
        dataset.record_count(),
        source
    );

    Ok(dataset)
}

async fn read_file(path: &Path) -> Result<String, DatasetError> {
    debug!("Reading dataset file: {}", path.display());
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn fetch_url(url: &str) -> Result<String, DatasetError> {
    debug!("Fetching dataset from: {}", url);
    let wrap = |source| DatasetError::Http {
        url: url.to_string(),
        source,
    };

    let response = reqwest::get(url).await.map_err(wrap)?;
    let response = response.error_for_status().map_err(wrap)?;
    response.text().await.map_err(wrap)
}

/// Build a [`Dataset`] from a parsed JSON document.
///
/// The root must be an object mapping country names to arrays of records.
/// A country whose value is not an array, or an array element that does not
/// deserialize as a record, is skipped; only the root shape is fatal.
pub fn dataset_from_value(value: Value) -> Result<Dataset, DatasetError> {
    let Value::Object(map) = value else {
        return Err(DatasetError::Shape(
            "expected a JSON object mapping country names to record arrays".to_string(),
        ));
    };

    let mut entries = Vec::with_capacity(map.len());

    for (country, country_value) in map {
        let Value::Array(items) = country_value else {
            warn!("Skipping {}: value is not an array of records", country);
            continue;
        };

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value::<TariffRecord>(item) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping malformed record for {}: {}", country, e),
            }
        }

        entries.push((country, records));
    }

    Ok(Dataset::from_entries(entries))
}
