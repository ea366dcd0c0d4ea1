//! Exporting diagnostics (JSON) and prepared arrays (CSV)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use faer::Mat;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::{Partition, PipelineConfig, PipelineDiagnostics, PreparedDataset};

/// Metadata about the preparation run
#[derive(Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub tabprep_version: String,
    pub input_file: String,
    pub config: PipelineConfig,
}

/// Complete diagnostics export with metadata
#[derive(Serialize)]
pub struct PreparationReport<'a> {
    pub metadata: ReportMetadata,
    pub diagnostics: &'a PipelineDiagnostics,
    /// Encoded output columns, in matrix order
    pub feature_names: &'a [String],
}

/// Write the diagnostics of a run to a pretty-printed JSON file
pub fn export_report(
    diagnostics: &PipelineDiagnostics,
    feature_names: &[String],
    input_file: &Path,
    config: &PipelineConfig,
    output_path: &Path,
) -> Result<()> {
    let report = PreparationReport {
        metadata: ReportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            tabprep_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.display().to_string(),
            config: config.clone(),
        },
        diagnostics,
        feature_names,
    };

    let json = serde_json::to_string_pretty(&report)
        .context("Failed to serialize preparation report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    Ok(())
}

/// Label types that can be written as a single-column frame
pub trait LabelColumn: Sized {
    fn to_column(name: &str, labels: &[Self]) -> Column;
}

impl LabelColumn for f64 {
    fn to_column(name: &str, labels: &[Self]) -> Column {
        Column::new(name.into(), labels)
    }
}

impl LabelColumn for i32 {
    fn to_column(name: &str, labels: &[Self]) -> Column {
        Column::new(name.into(), labels)
    }
}

/// Convert a feature matrix into a frame with the given column names
pub fn matrix_to_frame(matrix: &Mat<f64>, names: &[String]) -> Result<DataFrame> {
    anyhow::ensure!(
        names.len() == matrix.ncols(),
        "Expected {} feature names, got {}",
        matrix.ncols(),
        names.len()
    );

    let columns: Vec<Column> = names
        .iter()
        .enumerate()
        .map(|(c, name)| {
            let values: Vec<f64> = (0..matrix.nrows()).map(|r| matrix[(r, c)]).collect();
            Column::new(name.as_str().into(), values)
        })
        .collect();

    DataFrame::new(columns).context("Failed to build frame from feature matrix")
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .finish(df)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(())
}

/// Write `X_{train,tune,test}.csv` and `y_{train,tune,test}.csv` into `dir`.
///
/// Returns the written paths in order. Only the arrays are written; the
/// fitted transform itself is not persisted.
pub fn export_arrays<L: LabelColumn>(
    prepared: &PreparedDataset<L>,
    target: &str,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let mut written = Vec::with_capacity(6);
    for partition in Partition::ALL {
        let x_path = dir.join(format!("X_{}.csv", partition));
        let mut x = matrix_to_frame(prepared.features.get(partition), &prepared.feature_names)?;
        write_csv(&mut x, &x_path)?;
        written.push(x_path);

        let y_path = dir.join(format!("y_{}.csv", partition));
        let mut y = DataFrame::new(vec![L::to_column(target, prepared.labels.get(partition))])
            .context("Failed to build label frame")?;
        write_csv(&mut y, &y_path)?;
        written.push(y_path);
    }

    Ok(written)
}
