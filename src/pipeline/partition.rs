//! Train / tune / test partitioning
//!
//! Partitioning works on row positions so the same assignment can be applied
//! to the feature frame and the label vector. Two seeded splits are made:
//! first the test share is held out of the full set, then the tune share is
//! held out of what remains. Because the second split sees only
//! `(1 - test_size)` of the rows, its fraction is corrected to
//! `tune_size / (1 - test_size)` so tune ends up holding `tune_size` of the
//! original total.

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::BTreeMap;

use super::config::PipelineConfig;
use super::error::{PrepError, Result};

/// Guards `ceil` against products like 200.00000000000003
const CEIL_TOLERANCE: f64 = 1e-9;

/// One of the three disjoint row subsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Partition {
    Train,
    Tune,
    Test,
}

impl Partition {
    pub const ALL: [Partition; 3] = [Partition::Train, Partition::Tune, Partition::Test];
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Partition::Train => write!(f, "train"),
            Partition::Tune => write!(f, "tune"),
            Partition::Test => write!(f, "test"),
        }
    }
}

/// A value held once per partition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partitioned<T> {
    pub train: T,
    pub tune: T,
    pub test: T,
}

impl<T> Partitioned<T> {
    pub fn get(&self, partition: Partition) -> &T {
        match partition {
            Partition::Train => &self.train,
            Partition::Tune => &self.tune,
            Partition::Test => &self.test,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Partitioned<U> {
        Partitioned {
            train: f(&self.train),
            tune: f(&self.tune),
            test: f(&self.test),
        }
    }

    pub fn try_map<U, E>(&self, mut f: impl FnMut(&T) -> std::result::Result<U, E>) -> std::result::Result<Partitioned<U>, E> {
        Ok(Partitioned {
            train: f(&self.train)?,
            tune: f(&self.tune)?,
            test: f(&self.test)?,
        })
    }
}

/// Row positions assigned to each partition
pub type PartitionIndices = Partitioned<Vec<usize>>;

/// Split `n_rows` row positions into train, tune and test.
///
/// With `stratify`, each split preserves the label proportions of its input
/// (up to rounding). The same seed and inputs always give the same
/// assignment.
pub fn split_train_tune_test<S: Ord + Clone>(
    n_rows: usize,
    config: &PipelineConfig,
    stratify: Option<&[S]>,
) -> Result<PartitionIndices> {
    config.validate()?;

    if let Some(labels) = stratify {
        if labels.len() != n_rows {
            return Err(PrepError::config(format!(
                "Stratification labels have {} entries but the dataset has {} rows",
                labels.len(),
                n_rows
            )));
        }
    }

    if n_rows == 0 {
        return Err(PrepError::config("Cannot partition an empty dataset"));
    }

    let all: Vec<usize> = (0..n_rows).collect();

    let (train_tune, test) = shuffle_split(&all, config.test_size, config.random_state, stratify);

    let tune_fraction = config.tune_fraction_of_remainder();
    let (train, tune) = shuffle_split(&train_tune, tune_fraction, config.random_state, stratify);

    for (name, rows) in [("train", &train), ("tune", &tune), ("test", &test)] {
        if rows.is_empty() {
            return Err(PrepError::config(format!(
                "The {} partition would be empty for {} rows with test_size={} and tune_size={}",
                name, n_rows, config.test_size, config.tune_size
            )));
        }
    }

    Ok(Partitioned { train, tune, test })
}

/// Number of rows held out of `n` for a fraction, rounded up
fn held_out_count(n: usize, fraction: f64) -> usize {
    let raw = (fraction * n as f64 - CEIL_TOLERANCE).ceil();
    (raw.max(0.0) as usize).min(n)
}

/// Shuffle `rows` and hold out `fraction` of them.
///
/// Returns `(kept, held_out)`. Stratification labels are indexed by the
/// original row position, not by position within `rows`.
fn shuffle_split<S: Ord + Clone>(
    rows: &[usize],
    fraction: f64,
    seed: u64,
    stratify: Option<&[S]>,
) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let n_held = held_out_count(rows.len(), fraction);

    let Some(labels) = stratify else {
        let mut shuffled = rows.to_vec();
        shuffled.shuffle(&mut rng);
        let kept = shuffled.split_off(n_held);
        return (kept, shuffled);
    };

    let mut classes: BTreeMap<S, Vec<usize>> = BTreeMap::new();
    for &row in rows {
        classes.entry(labels[row].clone()).or_default().push(row);
    }

    let sizes: Vec<usize> = classes.values().map(|members| members.len()).collect();
    let allocation = allocate_by_largest_remainder(&sizes, n_held);

    let mut held = Vec::with_capacity(n_held);
    let mut kept = Vec::with_capacity(rows.len() - n_held);
    for (members, &take) in classes.values_mut().zip(&allocation) {
        members.shuffle(&mut rng);
        held.extend_from_slice(&members[..take]);
        kept.extend_from_slice(&members[take..]);
    }

    // Interleave classes so partition order carries no label information
    held.shuffle(&mut rng);
    kept.shuffle(&mut rng);

    (kept, held)
}

/// Distribute `total` draws across groups proportionally to their sizes.
///
/// Each group first gets the floor of its exact quota; leftover draws go to
/// the largest fractional parts, ties broken by larger group then by order.
fn allocate_by_largest_remainder(sizes: &[usize], total: usize) -> Vec<usize> {
    let n: usize = sizes.iter().sum();
    if n == 0 {
        return vec![0; sizes.len()];
    }

    let quotas: Vec<f64> = sizes
        .iter()
        .map(|&size| total as f64 * size as f64 / n as f64)
        .collect();

    let mut allocation: Vec<usize> = quotas
        .iter()
        .zip(sizes)
        .map(|(&q, &size)| ((q + CEIL_TOLERANCE).floor() as usize).min(size))
        .collect();

    let assigned: usize = allocation.iter().sum();
    let mut leftover = total.saturating_sub(assigned);

    let mut order: Vec<usize> = (0..sizes.len()).collect();
    order.sort_by(|&a, &b| {
        let frac_a = quotas[a] - allocation[a] as f64;
        let frac_b = quotas[b] - allocation[b] as f64;
        frac_b
            .partial_cmp(&frac_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(sizes[b].cmp(&sizes[a]))
            .then(a.cmp(&b))
    });

    for &group in order.iter().cycle().take(order.len() * 2) {
        if leftover == 0 {
            break;
        }
        if allocation[group] < sizes[group] {
            allocation[group] += 1;
            leftover -= 1;
        }
    }

    allocation
}

/// Materialize the rows at `indices` (in that order) as a new frame
pub fn take_rows(df: &DataFrame, indices: &[usize]) -> Result<DataFrame> {
    let idx = IdxCa::from_vec(
        "idx".into(),
        indices.iter().map(|&i| i as IdxSize).collect(),
    );
    Ok(df.take(&idx)?)
}

/// Select the labels at `indices` (in that order)
pub fn take_labels<L: Clone>(labels: &[L], indices: &[usize]) -> Vec<L> {
    indices.iter().map(|&i| labels[i].clone()).collect()
}
