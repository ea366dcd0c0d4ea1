//! Command-line argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::{
    DatasetSpec, PipelineConfig, DEFAULT_INFER_SCHEMA_LENGTH, DEFAULT_MIN_COUNT,
    DEFAULT_RANDOM_STATE, DEFAULT_TEST_SIZE, DEFAULT_TUNE_SIZE,
};

/// tabprep - Prepare tabular datasets as leakage-safe train/tune/test matrices
#[derive(Parser, Debug)]
#[command(name = "tabprep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prepare the institution-level dataset (regression on enrollment size)
    College {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Prepare the job placement dataset (binary classification on placement status)
    Job {
        #[command(flatten)]
        common: CommonArgs,

        /// Target value (case-insensitive, whitespace-trimmed) that maps to 1.
        /// Every other value maps to 0.
        #[arg(long, default_value = "placed")]
        positive_class: String,
    },
}

impl Commands {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::College { common } | Commands::Job { common, .. } => common,
        }
    }

    /// Dataset spec with CLI overrides applied
    pub fn spec(&self) -> DatasetSpec {
        match self {
            Commands::College { common } => common.apply_to(DatasetSpec::college()),
            Commands::Job {
                common,
                positive_class,
            } => common.apply_to(DatasetSpec::job().with_positive_class(positive_class.clone())),
        }
    }

    /// Input path, falling back to the conventional file name of the dataset
    pub fn input(&self) -> PathBuf {
        let fallback = match self {
            Commands::College { .. } => "cc_institution_details.csv",
            Commands::Job { .. } => "job_placement.csv",
        };
        self.common()
            .input
            .clone()
            .unwrap_or_else(|| PathBuf::from(fallback))
    }
}

/// Options shared by every dataset pipeline
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Target column name. Defaults to the dataset's conventional target.
    #[arg(short, long)]
    pub target: Option<String>,

    /// Fraction of rows reserved for the test partition
    #[arg(long, default_value_t = DEFAULT_TEST_SIZE, value_parser = validate_fraction)]
    pub test_size: f64,

    /// Fraction of all rows (not of the remainder) reserved for the tune partition
    #[arg(long, default_value_t = DEFAULT_TUNE_SIZE, value_parser = validate_fraction)]
    pub tune_size: f64,

    /// Seed for reproducible partitioning
    #[arg(long, default_value_t = DEFAULT_RANDOM_STATE)]
    pub random_state: u64,

    /// Categorical levels occurring fewer times than this are merged into "Other"
    #[arg(long, default_value_t = DEFAULT_MIN_COUNT)]
    pub min_count: usize,

    /// Additional identifier columns to drop when present (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub drop_columns: Vec<String>,

    /// Additional leakage columns to remove from the features (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub leakage_columns: Vec<String>,

    /// Columns to treat as categorical regardless of type (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub categorical: Vec<String>,

    /// Columns to treat as numeric regardless of type (comma-separated).
    /// Values that cannot be parsed as numbers fail the run.
    #[arg(long, value_delimiter = ',')]
    pub numeric: Vec<String>,

    /// Write the diagnostics report as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Write X_/y_ train, tune and test CSV files into this directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value_t = DEFAULT_INFER_SCHEMA_LENGTH)]
    pub infer_schema_length: usize,
}

impl CommonArgs {
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            test_size: self.test_size,
            tune_size: self.tune_size,
            random_state: self.random_state,
            min_count: self.min_count,
        }
    }

    pub fn apply_to(&self, mut spec: DatasetSpec) -> DatasetSpec {
        if let Some(target) = &self.target {
            spec.target = target.clone();
        }
        spec.identifier_columns.extend(self.drop_columns.iter().cloned());
        spec.leakage_columns.extend(self.leakage_columns.iter().cloned());
        spec.categorical_overrides.extend(self.categorical.iter().cloned());
        spec.numeric_overrides.extend(self.numeric.iter().cloned());
        spec
    }
}

/// Validator for partition fractions
fn validate_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "fraction must be between 0.0 and 1.0 (exclusive), got {}",
            value
        ))
    }
}
