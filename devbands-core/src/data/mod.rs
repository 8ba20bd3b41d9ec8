//! Bar ingestion — CSV and JSON Lines files — and synthetic bar generation.
//!
//! CSV carries flat bars only:
//! `timestamp,trade_date,high,low,close,volume,bid_volume,ask_volume`
//! with an empty `trade_date` marking an incomplete bar. JSON Lines carries
//! one serialized [`Bar`] per line, including an optional `profile` array.

pub mod csv_bars;
pub mod jsonl;
pub mod synthetic;

pub use synthetic::{generate_synthetic_bars, SyntheticSpec};

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::Bar;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("read error on line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported bar file format: {path} (expected .csv, .jsonl or .ndjson)")]
    UnsupportedFormat { path: PathBuf },

    #[error("bar at {timestamp} has a volume profile, which CSV cannot represent")]
    ProfileNotRepresentable { timestamp: String },
}

/// On-disk bar file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarFormat {
    Csv,
    JsonLines,
}

impl BarFormat {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(BarFormat::Csv),
            Some("jsonl") | Some("ndjson") => Ok(BarFormat::JsonLines),
            _ => Err(DataError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Load bars from a file, picking the format from its extension.
pub fn load_bars(path: &Path) -> Result<Vec<Bar>, DataError> {
    let format = BarFormat::from_path(path)?;
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match format {
        BarFormat::Csv => csv_bars::read_bars(file),
        BarFormat::JsonLines => jsonl::read_bars(std::io::BufReader::new(file)),
    }
}

/// Write bars to a file, picking the format from its extension.
pub fn write_bars(path: &Path, bars: &[Bar]) -> Result<(), DataError> {
    let format = BarFormat::from_path(path)?;
    let file = std::fs::File::create(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match format {
        BarFormat::Csv => csv_bars::write_bars(file, bars),
        BarFormat::JsonLines => jsonl::write_bars(std::io::BufWriter::new(file), bars).map_err(
            |source| DataError::Io {
                path: path.to_path_buf(),
                source,
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(BarFormat::from_path(Path::new("a.csv")).unwrap(), BarFormat::Csv);
        assert_eq!(BarFormat::from_path(Path::new("a.CSV")).unwrap(), BarFormat::Csv);
        assert_eq!(
            BarFormat::from_path(Path::new("dir/a.jsonl")).unwrap(),
            BarFormat::JsonLines
        );
        assert_eq!(
            BarFormat::from_path(Path::new("a.ndjson")).unwrap(),
            BarFormat::JsonLines
        );
        assert!(matches!(
            BarFormat::from_path(Path::new("a.parquet")),
            Err(DataError::UnsupportedFormat { .. })
        ));
        assert!(BarFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_bars(Path::new("/nonexistent/bars.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
