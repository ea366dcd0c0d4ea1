//! Target column extraction
//!
//! Regression targets are read as numbers. Classification targets are
//! normalized text mapped to a binary 0/1 label: the positive class maps to
//! 1 and every other value maps to 0.

use polars::prelude::*;
use serde::Serialize;

use super::error::{PrepError, Result};
use super::schema::{categorical_values, numeric_values};

/// Normalize a raw label for comparison: trim whitespace and case-fold
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Extract a continuous regression target.
///
/// The frame must already be free of missing targets; a value that is blank
/// or cannot be read as a number fails with its row.
pub fn regression_labels(df: &DataFrame, target: &str) -> Result<Vec<f64>> {
    numeric_values(df, target)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| PrepError::MalformedValue {
                column: target.to_string(),
                row,
                value: String::new(),
            })
        })
        .collect()
}

/// Map a text target to binary labels.
///
/// Values equal to `positive_class` after normalization map to 1; everything
/// else, including missing values, maps to 0.
pub fn binary_labels(df: &DataFrame, target: &str, positive_class: &str) -> Result<Vec<i32>> {
    let positive = normalize_label(positive_class);

    let labels = categorical_values(df, target)?
        .iter()
        .map(|v| match v {
            Some(s) if normalize_label(s) == positive => 1,
            _ => 0,
        })
        .collect();

    Ok(labels)
}

/// Fraction of positive labels, or `None` when there are no labels
pub fn prevalence(labels: &[i32]) -> Option<f64> {
    if labels.is_empty() {
        return None;
    }
    let (positives, _) = count_labels(labels);
    Some(positives as f64 / labels.len() as f64)
}

/// Count of (positive, negative) labels
pub fn count_labels(labels: &[i32]) -> (usize, usize) {
    let positives = labels.iter().filter(|&&v| v == 1).count();
    (positives, labels.len() - positives)
}

/// Descriptive statistics of a regression target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summarize a regression target; `None` for an empty slice
pub fn summarize_target(values: &[f64]) -> Option<TargetSummary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    Some(TargetSummary {
        count: n,
        mean,
        std,
        min: sorted[0],
        q25: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q75: quantile_sorted(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

/// Linear-interpolation quantile of an already sorted, non-empty slice
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}
