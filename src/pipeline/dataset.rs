//! Dataset pipelines
//!
//! A [`DatasetSpec`] declares everything dataset-specific: the target and
//! how to read it, identifier columns to discard, and leakage columns that
//! must never reach the feature set. The pipeline functions run the same
//! ordered steps for every spec:
//!
//! 1. load
//! 2. drop duplicate rows
//! 3. drop rows with a missing target
//! 4. drop identifier columns
//! 5. extract the label
//! 6. drop leakage columns
//! 7. collapse rare categorical levels
//! 8. partition into train / tune / test
//! 9. fit the column transform on train, apply to all partitions
//! 10. collect diagnostics

use faer::Mat;
use polars::prelude::*;
use serde::Serialize;
use std::path::Path;

use super::clean::{drop_columns_if_present, drop_duplicate_rows, drop_missing_target, require_columns};
use super::collapse::{collapse_frame, CollapseSummary};
use super::config::PipelineConfig;
use super::error::{PrepError, Result};
use super::loader::{load_dataset, FULL_SCHEMA_SCAN};
use super::partition::{split_train_tune_test, take_labels, take_rows, Partitioned};
use super::schema::{columns_of_kind, resolve_schema, ColumnKind};
use super::target::{binary_labels, prevalence, regression_labels, summarize_target, TargetSummary};
use super::transform::{ColumnTransformer, FittedTransform};

/// How the target column is turned into a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TargetTask {
    /// Continuous numeric target, used as-is
    Regression,
    /// Text target mapped to 1 for `positive_class`, 0 otherwise
    Classification { positive_class: String },
}

/// Declarative description of one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSpec {
    pub name: String,
    pub target: String,
    pub task: TargetTask,
    /// Dropped when present; they carry no signal and invite memorization
    pub identifier_columns: Vec<String>,
    /// Known only after the outcome; always removed from features
    pub leakage_columns: Vec<String>,
    /// Columns forced to categorical regardless of dtype
    pub categorical_overrides: Vec<String>,
    /// Columns forced to numeric regardless of dtype
    pub numeric_overrides: Vec<String>,
}

impl DatasetSpec {
    /// Institution-level dataset: predict enrollment size
    pub fn college() -> Self {
        Self {
            name: "college".to_string(),
            target: "student_count".to_string(),
            task: TargetTask::Regression,
            identifier_columns: Vec::new(),
            leakage_columns: Vec::new(),
            categorical_overrides: Vec::new(),
            numeric_overrides: Vec::new(),
        }
    }

    /// Student-level dataset: predict job placement
    pub fn job() -> Self {
        Self {
            name: "job".to_string(),
            target: "status".to_string(),
            task: TargetTask::Classification {
                positive_class: "placed".to_string(),
            },
            identifier_columns: vec!["sl_no".to_string(), "id".to_string(), "ID".to_string()],
            leakage_columns: vec!["salary".to_string()],
            categorical_overrides: Vec::new(),
            numeric_overrides: Vec::new(),
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_positive_class(mut self, positive_class: impl Into<String>) -> Self {
        self.task = TargetTask::Classification {
            positive_class: positive_class.into(),
        };
        self
    }
}

/// Everything learned and produced while preparing one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineDiagnostics {
    pub dataset: String,
    pub target: String,
    pub rows_loaded: usize,
    pub duplicates_removed: usize,
    pub missing_target_removed: usize,
    pub identifier_columns_dropped: Vec<String>,
    pub leakage_columns_dropped: Vec<String>,
    /// Declared leakage columns that the source does not contain
    pub leakage_columns_absent: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    /// Columns of unsupported type, not encoded
    pub unsupported_columns: Vec<String>,
    pub collapsed: Vec<CollapseSummary>,
    pub n_features: usize,
    /// (rows, columns) of each transformed matrix
    pub shapes: Partitioned<(usize, usize)>,
    /// Classification only: positive fraction in train
    pub train_prevalence: Option<f64>,
    /// Classification only: positive fraction per partition
    pub prevalence: Option<Partitioned<f64>>,
    /// Regression only: distribution of the train target
    pub target_summary: Option<TargetSummary>,
}

/// Model-ready output of a pipeline run
#[derive(Debug, Clone)]
pub struct PreparedDataset<L> {
    pub features: Partitioned<Mat<f64>>,
    pub labels: Partitioned<Vec<L>>,
    pub feature_names: Vec<String>,
    pub transform: FittedTransform,
    pub diagnostics: PipelineDiagnostics,
}

struct CleanedFrame {
    frame: DataFrame,
    rows_loaded: usize,
    duplicates_removed: usize,
    missing_target_removed: usize,
    identifiers_dropped: Vec<String>,
}

/// Steps 2-4: validate, de-duplicate, drop missing targets and identifiers
fn clean(df: &DataFrame, spec: &DatasetSpec, config: &PipelineConfig) -> Result<CleanedFrame> {
    config.validate()?;
    require_columns(df, &[spec.target.as_str()])?;

    if spec.identifier_columns.contains(&spec.target) || spec.leakage_columns.contains(&spec.target)
    {
        return Err(PrepError::config(format!(
            "Target column '{}' cannot also be an identifier or leakage column",
            spec.target
        )));
    }

    let rows_loaded = df.height();
    let (frame, duplicates_removed) = drop_duplicate_rows(df)?;
    let (frame, missing_target_removed) = drop_missing_target(&frame, &spec.target)?;
    let (frame, identifiers_dropped) = drop_columns_if_present(&frame, &spec.identifier_columns);

    Ok(CleanedFrame {
        frame,
        rows_loaded,
        duplicates_removed,
        missing_target_removed,
        identifiers_dropped,
    })
}

/// Steps 6-9 for an already extracted label vector
fn partition_and_transform<L: Clone>(
    cleaned: CleanedFrame,
    labels: Vec<L>,
    stratify: Option<&[i32]>,
    spec: &DatasetSpec,
    config: &PipelineConfig,
) -> Result<PreparedDataset<L>> {
    let leakage_present: Vec<String> = spec
        .leakage_columns
        .iter()
        .filter(|name| cleaned.frame.column(name).is_ok())
        .cloned()
        .collect();
    let leakage_absent: Vec<String> = spec
        .leakage_columns
        .iter()
        .filter(|name| !leakage_present.contains(name))
        .cloned()
        .collect();

    let mut excluded = vec![spec.target.clone()];
    excluded.extend(leakage_present.iter().cloned());
    let features = cleaned.frame.drop_many(&excluded);

    let schema = resolve_schema(
        &features,
        &spec.categorical_overrides,
        &spec.numeric_overrides,
    )?;
    let categorical = columns_of_kind(&schema, ColumnKind::Categorical);

    // Level counts span every row, before partitioning
    let (features, collapsed) = collapse_frame(&features, &categorical, config.min_count)?;

    let indices = split_train_tune_test(features.height(), config, stratify)?;
    let frames = indices.try_map(|rows| take_rows(&features, rows))?;
    let labels = indices.map(|rows| take_labels(&labels, rows));

    let transformer = ColumnTransformer::from_schema(&schema);
    let fitted = transformer.fit(&frames.train)?;
    let matrices = frames.try_map(|frame| fitted.transform(frame))?;

    let diagnostics = PipelineDiagnostics {
        dataset: spec.name.clone(),
        target: spec.target.clone(),
        rows_loaded: cleaned.rows_loaded,
        duplicates_removed: cleaned.duplicates_removed,
        missing_target_removed: cleaned.missing_target_removed,
        identifier_columns_dropped: cleaned.identifiers_dropped,
        leakage_columns_dropped: leakage_present,
        leakage_columns_absent: leakage_absent,
        categorical_columns: transformer.categorical_columns().to_vec(),
        numeric_columns: transformer.numeric_columns().to_vec(),
        unsupported_columns: transformer.dropped_columns().to_vec(),
        collapsed,
        n_features: fitted.n_features(),
        shapes: matrices.map(|m| (m.nrows(), m.ncols())),
        train_prevalence: None,
        prevalence: None,
        target_summary: None,
    };

    Ok(PreparedDataset {
        features: matrices,
        labels,
        feature_names: fitted.feature_names(),
        transform: fitted,
        diagnostics,
    })
}

/// Prepare an in-memory table with a continuous target.
///
/// The split is not stratified.
pub fn prepare_regression(
    df: &DataFrame,
    spec: &DatasetSpec,
    config: &PipelineConfig,
) -> Result<PreparedDataset<f64>> {
    if spec.task != TargetTask::Regression {
        return Err(PrepError::config(format!(
            "Dataset '{}' is not declared as a regression task",
            spec.name
        )));
    }

    let cleaned = clean(df, spec, config)?;
    let labels = regression_labels(&cleaned.frame, &spec.target)?;

    let mut prepared = partition_and_transform(cleaned, labels, None, spec, config)?;
    prepared.diagnostics.target_summary = summarize_target(&prepared.labels.train);
    Ok(prepared)
}

/// Prepare an in-memory table with a binary target.
///
/// Both splits are stratified by the label.
pub fn prepare_classification(
    df: &DataFrame,
    spec: &DatasetSpec,
    config: &PipelineConfig,
) -> Result<PreparedDataset<i32>> {
    let TargetTask::Classification { positive_class } = &spec.task else {
        return Err(PrepError::config(format!(
            "Dataset '{}' is not declared as a classification task",
            spec.name
        )));
    };

    let cleaned = clean(df, spec, config)?;
    let labels = binary_labels(&cleaned.frame, &spec.target, positive_class)?;
    let stratify = labels.clone();

    let mut prepared = partition_and_transform(cleaned, labels, Some(&stratify), spec, config)?;

    let per_partition = prepared
        .labels
        .map(|labels| prevalence(labels).unwrap_or(0.0));
    prepared.diagnostics.train_prevalence = Some(per_partition.train);
    prepared.diagnostics.prevalence = Some(per_partition);
    Ok(prepared)
}

/// Load a file and prepare it as a regression dataset
pub fn run_regression(
    path: &Path,
    spec: &DatasetSpec,
    config: &PipelineConfig,
    infer_schema_length: usize,
) -> Result<PreparedDataset<f64>> {
    config.validate()?;
    let df = load_dataset(path, infer_schema_length)?;
    prepare_regression(&df, spec, config)
}

/// Load a file and prepare it as a binary classification dataset
pub fn run_classification(
    path: &Path,
    spec: &DatasetSpec,
    config: &PipelineConfig,
    infer_schema_length: usize,
) -> Result<PreparedDataset<i32>> {
    config.validate()?;
    let df = load_dataset(path, infer_schema_length)?;
    prepare_classification(&df, spec, config)
}

/// College pipeline with default options: regression on `target`.
///
/// CSV column types are inferred from the whole file.
pub fn college_pipeline(
    path: &Path,
    target: &str,
    random_state: u64,
) -> Result<PreparedDataset<f64>> {
    let spec = DatasetSpec::college().with_target(target);
    let config = PipelineConfig::default().with_random_state(random_state);
    run_regression(path, &spec, &config, FULL_SCHEMA_SCAN)
}

/// Job placement pipeline with default options: stratified binary
/// classification on `target`. CSV column types are inferred from the
/// whole file.
pub fn job_pipeline(path: &Path, target: &str, random_state: u64) -> Result<PreparedDataset<i32>> {
    let spec = DatasetSpec::job().with_target(target);
    let config = PipelineConfig::default().with_random_state(random_state);
    run_classification(path, &spec, &config, FULL_SCHEMA_SCAN)
}
