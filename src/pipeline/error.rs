//! Error types for dataset preparation.
//!
//! Every failure surfaced by the pipeline maps onto one of the variants
//! below. Loading and configuration problems are fatal and are returned to
//! the caller unmodified; nothing is retried.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors that can occur while preparing a dataset.
#[derive(Debug, Error)]
pub enum PrepError {
    /// The data source is missing, unreadable, or in an unsupported format.
    #[error("Failed to load dataset '{path}': {reason}")]
    Load {
        /// Path that was being read
        path: String,
        /// Underlying cause
        reason: String,
    },

    /// Invalid partition fractions, absent target column, or a declared
    /// column that does not exist in the loaded table.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A value in a declared-numeric column could not be coerced to a number.
    #[error("Malformed value '{value}' in numeric column '{column}' at row {row}")]
    MalformedValue {
        column: String,
        /// Zero-based row index within the frame being read
        row: usize,
        value: String,
    },

    /// A column seen at fit time is absent from a frame being transformed.
    #[error("Column '{column}' was present at fit time but is missing from the input")]
    MissingColumn { column: String },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl PrepError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        PrepError::Configuration(message.into())
    }
}

/// Result alias used throughout the pipeline module.
pub type Result<T> = std::result::Result<T, PrepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_value_message_has_context() {
        let err = PrepError::MalformedValue {
            column: "ssc_p".to_string(),
            row: 17,
            value: "n/a".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ssc_p"));
        assert!(msg.contains("17"));
        assert!(msg.contains("n/a"));
    }

    #[test]
    fn test_configuration_helper() {
        let err = PrepError::config("fractions too large");
        assert!(matches!(err, PrepError::Configuration(_)));
        assert!(err.to_string().contains("fractions too large"));
    }
}
