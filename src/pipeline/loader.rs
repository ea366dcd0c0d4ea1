//! Dataset loader for CSV and Parquet files

use polars::prelude::*;
use std::path::Path;

use super::error::{PrepError, Result};

/// Default number of rows scanned when inferring CSV column types
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10000;

/// Infer CSV column types from every row
pub const FULL_SCHEMA_SCAN: usize = 0;

/// CSV cell contents read as missing in every column, besides empty fields
pub const CSV_NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn load_error(path: &Path, reason: impl ToString) -> PrepError {
    PrepError::Load {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn scan_dataset(path: &Path, infer_schema_length: usize) -> Result<LazyFrame> {
    if !path.is_file() {
        return Err(load_error(path, "file not found"));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let schema_length = if infer_schema_length == FULL_SCHEMA_SCAN {
        None
    } else {
        Some(infer_schema_length)
    };

    match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_length)
            .with_null_values(Some(NullValues::AllColumns(
                CSV_NULL_TOKENS.iter().map(|&token| token.into()).collect(),
            )))
            .finish()
            .map_err(|e| load_error(path, e)),
        "parquet" => {
            LazyFrame::scan_parquet(path, Default::default()).map_err(|e| load_error(path, e))
        }
        _ => Err(load_error(
            path,
            format!(
                "unsupported file format '{}'. Supported formats: csv, parquet",
                extension
            ),
        )),
    }
}

/// Load a dataset from a file (CSV or Parquet based on extension).
///
/// The table is read once and fully materialized; every later step works
/// on the in-memory frame.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    scan_dataset(path, infer_schema_length)?
        .collect()
        .map_err(|e| load_error(path, e))
}

/// Read only the column names of a dataset (cheap schema scan)
pub fn get_column_names(path: &Path) -> Result<Vec<String>> {
    let schema = scan_dataset(path, DEFAULT_INFER_SCHEMA_LENGTH)?
        .collect_schema()
        .map_err(|e| load_error(path, e))?;

    Ok(schema.iter_names().map(|name| name.to_string()).collect())
}

/// Estimated in-memory size of a frame in megabytes
pub fn estimated_size_mb(df: &DataFrame) -> f64 {
    df.estimated_size() as f64 / (1024.0 * 1024.0)
}
