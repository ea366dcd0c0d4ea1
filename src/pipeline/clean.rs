//! Row and column cleaning applied before labels are extracted

use polars::prelude::*;

use super::error::{PrepError, Result};

/// Remove exact-duplicate rows, keeping the first occurrence in input order.
///
/// Returns the de-duplicated frame and the number of rows removed.
pub fn drop_duplicate_rows(df: &DataFrame) -> Result<(DataFrame, usize)> {
    let deduped = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
    let removed = df.height() - deduped.height();
    Ok((deduped, removed))
}

/// Drop rows whose target value is missing.
///
/// Nulls count as missing, and so does NaN in a float target. Returns the
/// filtered frame and the number of rows removed.
pub fn drop_missing_target(df: &DataFrame, target: &str) -> Result<(DataFrame, usize)> {
    let target_col = df.column(target).map_err(|_| {
        PrepError::config(format!("Target column '{}' not found in dataset", target))
    })?;

    let mask: BooleanChunked = if target_col.dtype().is_float() {
        let values = target_col.cast(&DataType::Float64)?;
        values
            .f64()?
            .into_iter()
            .map(|v| Some(matches!(v, Some(x) if !x.is_nan())))
            .collect()
    } else {
        target_col.is_not_null()
    };

    let filtered = df.filter(&mask)?;
    let removed = df.height() - filtered.height();
    Ok((filtered, removed))
}

/// Drop whichever of `candidates` exist in the frame.
///
/// Returns the frame and the names actually dropped, in candidate order.
pub fn drop_columns_if_present(df: &DataFrame, candidates: &[String]) -> (DataFrame, Vec<String>) {
    let present: Vec<String> = candidates
        .iter()
        .filter(|name| df.column(name).is_ok())
        .cloned()
        .collect();

    if present.is_empty() {
        return (df.clone(), present);
    }

    (df.drop_many(&present), present)
}

/// Fail unless every name in `required` is a column of the frame
pub fn require_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for column in required {
        if !names.iter().any(|n| n == column) {
            return Err(PrepError::config(format!(
                "Column '{}' not found in dataset. Available columns: {:?}",
                column, names
            )));
        }
    }
    Ok(())
}
