//! Tests for train / tune / test partitioning

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tabprep::pipeline::{split_train_tune_test, Partition, PipelineConfig, PrepError};

fn config(test_size: f64, tune_size: f64, random_state: u64) -> PipelineConfig {
    PipelineConfig {
        test_size,
        tune_size,
        random_state,
        ..Default::default()
    }
}

#[test]
fn test_partitions_cover_every_row_once() {
    let cases = [
        (100, 0.2, 0.2),
        (101, 0.1, 0.3),
        (999, 0.33, 0.33),
        (20, 0.25, 0.25),
    ];

    for (n, test_size, tune_size) in cases {
        let parts = split_train_tune_test::<i32>(n, &config(test_size, tune_size, 42), None).unwrap();

        let mut seen = HashSet::new();
        for partition in Partition::ALL {
            for &row in parts.get(partition) {
                assert!(row < n);
                assert!(seen.insert(row), "row {} appears in two partitions", row);
            }
        }
        assert_eq!(seen.len(), n, "n={} test={} tune={}", n, test_size, tune_size);
    }
}

#[test]
fn test_tune_fraction_is_of_original_total() {
    let parts = split_train_tune_test::<i32>(2000, &config(0.25, 0.15, 42), None).unwrap();

    assert_eq!(parts.test.len(), 500);
    assert_eq!(parts.tune.len(), 300, "Tune should hold 15% of all rows, not of the remainder");
    assert_eq!(parts.train.len(), 1200);
}

#[test]
fn test_seed_reproducibility() {
    let labels: Vec<i32> = (0..500).map(|i| (i % 4 == 0) as i32).collect();

    let a = split_train_tune_test(500, &config(0.2, 0.2, 123), Some(&labels)).unwrap();
    let b = split_train_tune_test(500, &config(0.2, 0.2, 123), Some(&labels)).unwrap();
    assert_eq!(a, b);

    let c = split_train_tune_test(500, &config(0.2, 0.2, 124), Some(&labels)).unwrap();
    assert_ne!(a.train, c.train, "A different seed should change the assignment");
}

#[test]
fn test_stratified_prevalence_within_tolerance() {
    let mut rng = StdRng::seed_from_u64(7);
    let labels: Vec<i32> = (0..1200).map(|_| (rng.gen::<f64>() < 0.3) as i32).collect();
    let global = labels.iter().sum::<i32>() as f64 / labels.len() as f64;

    let parts = split_train_tune_test(labels.len(), &config(0.2, 0.2, 42), Some(&labels)).unwrap();

    for partition in Partition::ALL {
        let rows = parts.get(partition);
        let positives = rows.iter().filter(|&&r| labels[r] == 1).count();
        let share = positives as f64 / rows.len() as f64;
        assert!(
            (share - global).abs() <= 0.02,
            "{} prevalence {:.3} too far from {:.3}",
            partition,
            share,
            global
        );
    }
}

#[test]
fn test_stratified_with_text_labels() {
    let labels: Vec<String> = (0..300)
        .map(|i| ["a", "b", "c"][i % 3].to_string())
        .collect();
    let parts = split_train_tune_test(300, &config(0.2, 0.2, 42), Some(&labels)).unwrap();

    for partition in Partition::ALL {
        let rows = parts.get(partition);
        let a_count = rows.iter().filter(|&&r| labels[r] == "a").count();
        assert_eq!(a_count * 3, rows.len());
    }
}

#[test]
fn test_invalid_fractions_rejected() {
    for (test_size, tune_size) in [(0.6, 0.5), (0.0, 0.2), (0.2, 1.0), (-0.1, 0.2), (0.5, 0.5)] {
        let result = split_train_tune_test::<i32>(100, &config(test_size, tune_size, 42), None);
        assert!(
            matches!(result, Err(PrepError::Configuration(_))),
            "test={} tune={} should be rejected",
            test_size,
            tune_size
        );
    }
}

#[test]
fn test_empty_dataset_rejected() {
    let result = split_train_tune_test::<i32>(0, &config(0.2, 0.2, 42), None);
    assert!(matches!(result, Err(PrepError::Configuration(_))));
}
