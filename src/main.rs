//! tabprep: Dataset Preparation CLI Tool
//!
//! Loads a table, cleans it, collapses rare categories, partitions it into
//! train/tune/test and encodes every partition with a transform fit on
//! train only.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use polars::prelude::DataFrame;

use tabprep::cli::{Cli, Commands};
use tabprep::pipeline::{
    estimated_size_mb, load_dataset, prepare_classification, prepare_regression, DatasetSpec,
    PipelineConfig, PreparedDataset,
};
use tabprep::report::{display_summary, export_arrays, export_report, LabelColumn};
use tabprep::utils::{
    create_spinner, finish_with_failure, finish_with_success, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = &cli.command;
    let spec = command.spec();
    let input = command.input();

    match command {
        Commands::College { .. } => run_dataset(command, &spec, &input, prepare_regression),
        Commands::Job { .. } => run_dataset(command, &spec, &input, prepare_classification),
    }
}

fn run_dataset<L, F>(command: &Commands, spec: &DatasetSpec, input: &Path, prepare: F) -> Result<()>
where
    L: LabelColumn,
    F: Fn(&DataFrame, &DatasetSpec, &PipelineConfig) -> tabprep::pipeline::Result<PreparedDataset<L>>,
{
    let common = command.common();
    let config = common.config();

    // Reject bad fractions before touching the data
    config.validate()?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&spec.name, input, &spec.target, &config);

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading dataset...");
    let df = match load_dataset(input, common.infer_schema_length) {
        Ok(df) => {
            finish_with_success(&spinner, "Dataset loaded");
            df
        }
        Err(e) => {
            finish_with_failure(&spinner, "Failed to load dataset");
            return Err(e.into());
        }
    };

    let (rows, cols) = df.shape();
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", estimated_size_mb(&df));
    print_step_time(step_start.elapsed());

    // Step 2: Clean, collapse, partition, transform
    print_step_header(2, "Prepare Partitions");
    let step_start = Instant::now();
    let spinner = create_spinner("Cleaning, partitioning and encoding...");
    let prepared = match prepare(&df, spec, &config) {
        Ok(prepared) => {
            finish_with_success(&spinner, "Partitions prepared");
            prepared
        }
        Err(e) => {
            finish_with_failure(&spinner, "Preparation failed");
            return Err(e).with_context(|| format!("Failed to prepare dataset '{}'", spec.name));
        }
    };

    let diag = &prepared.diagnostics;
    if diag.duplicates_removed > 0 {
        print_count("duplicate row(s)", diag.duplicates_removed, Some("(removed)"));
    }
    if diag.missing_target_removed > 0 {
        print_count(
            "row(s) with missing target",
            diag.missing_target_removed,
            Some("(removed)"),
        );
    }
    for absent in &diag.leakage_columns_absent {
        print_warning(&format!(
            "Declared leakage column '{}' is not in the dataset",
            absent
        ));
    }
    if let Some(prevalence) = diag.train_prevalence {
        print_info(&format!("Training prevalence (positive = 1): {:.3}", prevalence));
    }
    print_step_time(step_start.elapsed());

    // Step 3: Export
    if common.report.is_some() || common.output_dir.is_some() {
        print_step_header(3, "Export Results");
        let step_start = Instant::now();

        if let Some(report_path) = &common.report {
            export_report(diag, &prepared.feature_names, input, &config, report_path)?;
            print_success(&format!("Report saved to {}", report_path.display()));
        }

        if let Some(dir) = &common.output_dir {
            let spinner = create_spinner("Writing partition arrays...");
            let written = export_arrays(&prepared, &spec.target, dir)?;
            finish_with_success(
                &spinner,
                &format!("Wrote {} file(s) to {}", written.len(), dir.display()),
            );
        }
        print_step_time(step_start.elapsed());
    }

    display_summary(diag);
    print_completion();

    Ok(())
}
