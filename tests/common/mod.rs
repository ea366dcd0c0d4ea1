//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// States used by the college fixture that occur only 5 times each
pub const RARE_STATES: [&str; 5] = ["AK", "ND", "SD", "VT", "WY"];

/// Job placement table with `positives` rows labelled "Placed" out of `rows`.
///
/// Columns:
/// - `sl_no`: serial number (identifier, unique per row)
/// - `gender`: two levels
/// - `degree_t`: three levels, all frequent
/// - `ssc_p`: secondary school percentage
/// - `salary`: only present for placed students (leakage)
/// - `status`: "Placed" / "Not Placed"
pub fn create_job_dataframe(rows: usize, positives: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let degrees = ["Sci&Tech", "Comm&Mgmt", "Others"];

    let sl_no: Vec<i64> = (1..=rows as i64).collect();
    let gender: Vec<&str> = (0..rows).map(|i| if i % 2 == 0 { "M" } else { "F" }).collect();
    let degree_t: Vec<&str> = (0..rows).map(|i| degrees[i % 3]).collect();
    let ssc_p: Vec<f64> = (0..rows).map(|_| 40.0 + rng.gen::<f64>() * 50.0).collect();
    let placed: Vec<bool> = (0..rows).map(|i| i < positives).collect();
    let salary: Vec<Option<f64>> = placed
        .iter()
        .map(|&p| p.then(|| 200000.0 + rng.gen::<f64>() * 300000.0))
        .collect();
    let status: Vec<&str> = placed
        .iter()
        .map(|&p| if p { "Placed" } else { "Not Placed" })
        .collect();

    df! {
        "sl_no" => sl_no,
        "gender" => gender,
        "degree_t" => degree_t,
        "ssc_p" => ssc_p,
        "salary" => salary,
        "status" => status,
    }
    .unwrap()
}

/// Institution table with a `state` column holding two frequent levels and
/// five levels that occur exactly 5 times each.
///
/// Total rows: 500. `student_count` is never missing.
pub fn create_college_dataframe(seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut state: Vec<&str> = Vec::with_capacity(500);
    state.extend(std::iter::repeat("CA").take(240));
    state.extend(std::iter::repeat("NY").take(235));
    for rare in RARE_STATES {
        state.extend(std::iter::repeat(rare).take(5));
    }
    let rows = state.len();

    let control: Vec<&str> = (0..rows)
        .map(|i| if i % 3 == 0 { "Private not-for-profit" } else { "Public" })
        .collect();
    let aid_value: Vec<f64> = (0..rows)
        .map(|i| 2000.0 + i as f64 * 3.5 + rng.gen::<f64>() * 100.0)
        .collect();
    let grad_100_value: Vec<Option<f64>> = (0..rows)
        .map(|i| if i % 50 == 0 { None } else { Some(rng.gen::<f64>() * 100.0) })
        .collect();
    let student_count: Vec<f64> = aid_value
        .iter()
        .map(|aid| (aid * 1.7 + rng.gen::<f64>() * 500.0).round())
        .collect();

    df! {
        "state" => state,
        "control" => control,
        "aid_value" => aid_value,
        "grad_100_value" => grad_100_value,
        "student_count" => student_count,
    }
    .unwrap()
}

/// Write `df` to a CSV file in a fresh temporary directory.
///
/// The directory is deleted when the returned `TempDir` is dropped.
pub fn create_temp_csv(df: &mut DataFrame, file_name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(file_name);
    let mut file = std::fs::File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();
    (temp_dir, path)
}

/// Write `df` to a Parquet file in a fresh temporary directory
pub fn create_temp_parquet(df: &mut DataFrame, file_name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(file_name);
    let file = std::fs::File::create(&path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();
    (temp_dir, path)
}

/// Column `index` of a matrix as a vector
pub fn matrix_column(matrix: &faer::Mat<f64>, index: usize) -> Vec<f64> {
    (0..matrix.nrows()).map(|r| matrix[(r, index)]).collect()
}

/// Population mean and standard deviation, ignoring NaN
pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    let n = present.len() as f64;
    let mean = present.iter().sum::<f64>() / n;
    let var = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}
