//! tabprep: Tabular Dataset Preparation Library
//!
//! Turns raw tables into leakage-safe train/tune/test matrices using
//! rare-category collapsing, seeded (optionally stratified) partitioning,
//! and a one-hot + standard-scaling transform fit on train only.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
