//! Pipeline configuration and validation

use serde::{Deserialize, Serialize};

use super::error::{PrepError, Result};

/// Default fraction of rows reserved for the test partition
pub const DEFAULT_TEST_SIZE: f64 = 0.20;

/// Default fraction of rows (of the full dataset) reserved for the tune partition
pub const DEFAULT_TUNE_SIZE: f64 = 0.20;

/// Default seed for reproducible partitioning
pub const DEFAULT_RANDOM_STATE: u64 = 42;

/// Default minimum count before a categorical level is collapsed into "Other"
pub const DEFAULT_MIN_COUNT: usize = 20;

/// Options recognized by every dataset pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Fraction of the cleaned dataset reserved for the test partition
    pub test_size: f64,
    /// Fraction of the cleaned dataset (not of the remainder) reserved for tuning
    pub tune_size: f64,
    /// Seed governing both partition splits
    pub random_state: u64,
    /// Levels occurring fewer than this many times are collapsed
    pub min_count: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            test_size: DEFAULT_TEST_SIZE,
            tune_size: DEFAULT_TUNE_SIZE,
            random_state: DEFAULT_RANDOM_STATE,
            min_count: DEFAULT_MIN_COUNT,
        }
    }
}

impl PipelineConfig {
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = random_state;
        self
    }

    /// Check partition fractions before any data is touched.
    ///
    /// Both fractions must lie strictly between 0 and 1 and their sum must
    /// leave a non-empty share for the train partition.
    pub fn validate(&self) -> Result<()> {
        check_fraction("test_size", self.test_size)?;
        check_fraction("tune_size", self.tune_size)?;

        if self.test_size + self.tune_size >= 1.0 {
            return Err(PrepError::config(format!(
                "test_size + tune_size must be < 1.0 (got {} + {} = {}); the train partition would be empty",
                self.test_size,
                self.tune_size,
                self.test_size + self.tune_size
            )));
        }

        Ok(())
    }

    /// Share of the post-test pool that must go to tune so that tune ends up
    /// holding `tune_size` of the original total.
    pub fn tune_fraction_of_remainder(&self) -> f64 {
        self.tune_size / (1.0 - self.test_size)
    }
}

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return Err(PrepError::config(format!(
            "{} must be between 0.0 and 1.0 (exclusive), got {}",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.test_size, 0.20);
        assert_eq!(config.tune_size, 0.20);
        assert_eq!(config.random_state, 42);
        assert_eq!(config.min_count, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fractions_summing_past_one_rejected() {
        let config = PipelineConfig {
            test_size: 0.6,
            tune_size: 0.5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, PrepError::Configuration(_)));
    }

    #[test]
    fn test_fractions_summing_to_exactly_one_rejected() {
        let config = PipelineConfig {
            test_size: 0.5,
            tune_size: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_fraction_rejected() {
        for bad in [0.0, -0.1, 1.0, f64::NAN] {
            let config = PipelineConfig {
                test_size: bad,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "test_size={} should fail", bad);
        }
    }

    #[test]
    fn test_tune_fraction_is_corrected_for_remainder() {
        let config = PipelineConfig {
            test_size: 0.2,
            tune_size: 0.2,
            ..Default::default()
        };
        assert!((config.tune_fraction_of_remainder() - 0.25).abs() < 1e-12);

        let config = PipelineConfig {
            test_size: 0.3,
            tune_size: 0.1,
            ..Default::default()
        };
        assert!((config.tune_fraction_of_remainder() - 0.1 / 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = PipelineConfig::default().with_random_state(7);
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
