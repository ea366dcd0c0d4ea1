//! Unit tests for dataset loader

use polars::prelude::*;
use std::io::Write;
use tabprep::pipeline::{
    college_pipeline, get_column_names, load_dataset, resolve_schema, ColumnKind, PrepError,
};
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_load_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "a,b,c").unwrap();
    writeln!(file, "1,x,3.5").unwrap();
    writeln!(file, "4,y,").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, 100).unwrap();

    assert_eq!(df.shape(), (2, 3));
    assert_eq!(df.get_column_names(), &["a", "b", "c"]);
    assert_eq!(df.column("b").unwrap().dtype(), &DataType::String);
    assert_eq!(df.column("c").unwrap().null_count(), 1, "Blank cell should be null");
}

#[test]
fn test_load_parquet_file() {
    let mut df = df! {
        "x" => [1i32, 2, 3],
        "y" => ["a", "b", "c"],
    }
    .unwrap();
    let (_dir, path) = common::create_temp_parquet(&mut df, "test.parquet");

    let loaded = load_dataset(&path, 100).unwrap();
    assert_eq!(loaded.shape(), (3, 2));
    assert!(loaded.equals(&df));
}

#[test]
fn test_load_full_schema_scan() {
    let mut df = common::create_job_dataframe(50, 30, 1);
    let (_dir, path) = common::create_temp_csv(&mut df, "job.csv");

    let loaded = load_dataset(&path, 0).unwrap();
    assert_eq!(loaded.height(), 50);
}

#[test]
fn test_missing_file_is_load_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = load_dataset(&temp_dir.path().join("absent.csv"), 100);

    match result {
        Err(PrepError::Load { path, .. }) => assert!(path.ends_with("absent.csv")),
        other => panic!("Expected Load error, got {:?}", other),
    }
}

#[test]
fn test_unsupported_extension_is_load_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.xlsx");
    std::fs::write(&path, "not a table").unwrap();

    let result = load_dataset(&path, 100);
    match result {
        Err(PrepError::Load { reason, .. }) => assert!(reason.contains("unsupported file format")),
        other => panic!("Expected Load error, got {:?}", other),
    }
}

#[test]
fn test_get_column_names() {
    let mut df = common::create_college_dataframe(3);
    let (_dir, path) = common::create_temp_csv(&mut df, "college.csv");

    let names = get_column_names(&path).unwrap();
    assert_eq!(
        names,
        vec!["state", "control", "aid_value", "grad_100_value", "student_count"]
    );
}

#[test]
fn test_csv_null_tokens_are_missing() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("tokens.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "med_sat_value,control").unwrap();
    writeln!(file, "NULL,Public").unwrap();
    writeln!(file, "901.5,NA").unwrap();
    writeln!(file, "N/A,Private").unwrap();
    writeln!(file, "1012.0,Public").unwrap();
    writeln!(file, "nan,null").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, 100).unwrap();

    let sat = df.column("med_sat_value").unwrap();
    assert_eq!(sat.dtype(), &DataType::Float64);
    assert_eq!(sat.null_count(), 3);
    assert_eq!(df.column("control").unwrap().null_count(), 2);

    let schema = resolve_schema(&df, &[], &[]).unwrap();
    assert_eq!(schema[0].kind, ColumnKind::Numeric);
}

#[test]
fn test_csv_null_token_target_is_dropped_not_malformed() {
    let df = common::create_college_dataframe(5);
    let counts: Vec<String> = df
        .column("student_count")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .enumerate()
        .map(|(i, v)| match v {
            Some(x) if i % 100 != 7 => format!("{}", x),
            _ => "NULL".to_string(),
        })
        .collect();
    let mut df = df;
    df.with_column(Series::new("student_count".into(), counts)).unwrap();
    let (_dir, path) = common::create_temp_csv(&mut df, "cc_institution_details.csv");

    let prepared = college_pipeline(&path, "student_count", 42).unwrap();
    assert_eq!(prepared.diagnostics.missing_target_removed, 5);
    assert!(prepared.labels.train.iter().all(|v| v.is_finite()));
}
