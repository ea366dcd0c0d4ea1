//! Rare category collapsing
//!
//! Levels that occur fewer than `min_count` times are merged into a single
//! `"Other"` level to keep one-hot encodings from exploding in width.
//! Missing values count as a level of their own.

use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

use super::error::Result;
use super::schema::categorical_values;

/// Sentinel level that replaces every rare value
pub const OTHER_LABEL: &str = "Other";

/// Display name for the missing-value level in summaries
pub const MISSING_LEVEL: &str = "<missing>";

/// What collapsing did to one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollapseSummary {
    pub column: String,
    /// Levels replaced by the sentinel, sorted
    pub collapsed_levels: Vec<String>,
    /// Number of rows whose value changed
    pub rows_relabelled: usize,
}

/// Replace values occurring fewer than `min_count` times with `"Other"`.
///
/// Values at or above the threshold are returned unchanged, including a
/// frequent missing level. Row count and order are preserved.
pub fn collapse_rare_categories(
    values: &[Option<String>],
    min_count: usize,
) -> (Vec<Option<String>>, Vec<Option<String>>) {
    let mut counts: HashMap<Option<&str>, usize> = HashMap::new();
    for v in values {
        *counts.entry(v.as_deref()).or_insert(0) += 1;
    }

    let mut rare: Vec<Option<String>> = counts
        .iter()
        .filter(|(_, &count)| count < min_count)
        .map(|(level, _)| level.map(|s| s.to_string()))
        .collect();
    rare.sort();

    if rare.is_empty() {
        return (values.to_vec(), rare);
    }

    let collapsed = values
        .iter()
        .map(|v| {
            if counts.get(&v.as_deref()).copied().unwrap_or(0) < min_count {
                Some(OTHER_LABEL.to_string())
            } else {
                v.clone()
            }
        })
        .collect();

    (collapsed, rare)
}

/// Collapse rare levels in each of `columns`, replacing them in the frame
/// with text columns.
///
/// Statistics are computed over the whole frame handed in.
pub fn collapse_frame(
    df: &DataFrame,
    columns: &[String],
    min_count: usize,
) -> Result<(DataFrame, Vec<CollapseSummary>)> {
    let mut out = df.clone();
    let mut summaries = Vec::with_capacity(columns.len());

    for column in columns {
        let values = categorical_values(df, column)?;
        let (collapsed, rare) = collapse_rare_categories(&values, min_count);

        let rows_relabelled = values
            .iter()
            .zip(&collapsed)
            .filter(|(before, after)| before != after)
            .count();

        out.with_column(Series::new(column.as_str().into(), collapsed))?;

        if !rare.is_empty() {
            summaries.push(CollapseSummary {
                column: column.clone(),
                collapsed_levels: rare
                    .into_iter()
                    .map(|level| level.unwrap_or_else(|| MISSING_LEVEL.to_string()))
                    .collect(),
                rows_relabelled,
            });
        }
    }

    Ok((out, summaries))
}
