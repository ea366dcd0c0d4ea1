//! Column-wise encoding and scaling
//!
//! A [`ColumnTransformer`] knows which columns are categorical and which are
//! numeric. Fitting it on the train partition yields a [`FittedTransform`]
//! holding the observed levels and the per-column mean/std; that fitted
//! state is immutable and is applied unchanged to tune and test.
//!
//! Output layout: one indicator column per (categorical column, level) pair,
//! levels sorted, followed by one standardized column per numeric column.

use faer::Mat;
use polars::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::collapse::MISSING_LEVEL;
use super::error::Result;
use super::schema::{
    categorical_values, columns_of_kind, numeric_values, resolve_schema, ColumnKind, ColumnSchema,
};

/// Unfitted encoding rule: which columns get which treatment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnTransformer {
    categorical: Vec<String>,
    numeric: Vec<String>,
    dropped: Vec<String>,
}

impl ColumnTransformer {
    /// Build from an already resolved schema
    pub fn from_schema(schema: &[ColumnSchema]) -> Self {
        Self {
            categorical: columns_of_kind(schema, ColumnKind::Categorical),
            numeric: columns_of_kind(schema, ColumnKind::Numeric),
            dropped: columns_of_kind(schema, ColumnKind::Unsupported),
        }
    }

    /// Build by inferring column kinds from the frame's dtypes
    pub fn infer(df: &DataFrame) -> Result<Self> {
        Ok(Self::from_schema(&resolve_schema(df, &[], &[])?))
    }

    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric
    }

    /// Columns that are neither categorical nor numeric; never encoded
    pub fn dropped_columns(&self) -> &[String] {
        &self.dropped
    }

    /// Learn levels and scaling statistics from the train partition only
    pub fn fit(&self, train: &DataFrame) -> Result<FittedTransform> {
        let categorical = self
            .categorical
            .iter()
            .map(|column| {
                let mut levels = categorical_values(train, column)?;
                levels.sort();
                levels.dedup();
                Ok(CategoricalEncoding {
                    column: column.clone(),
                    levels,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let numeric = self
            .numeric
            .iter()
            .map(|column| {
                let values = numeric_values(train, column)?;
                let (mean, scale) = mean_and_scale(&values);
                Ok(NumericScaling {
                    column: column.clone(),
                    mean,
                    scale,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FittedTransform {
            categorical,
            numeric,
        })
    }

    /// Fit on `train` and transform it in one step
    pub fn fit_transform(&self, train: &DataFrame) -> Result<(FittedTransform, Mat<f64>)> {
        let fitted = self.fit(train)?;
        let matrix = fitted.transform(train)?;
        Ok((fitted, matrix))
    }
}

/// Levels observed for one categorical column at fit time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalEncoding {
    pub column: String,
    /// Sorted, unique; `None` is the missing level
    pub levels: Vec<Option<String>>,
}

/// Standardization statistics for one numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericScaling {
    pub column: String,
    pub mean: f64,
    /// Population standard deviation, or 1.0 for a constant column
    pub scale: f64,
}

/// Encoding and scaling state learned from the train partition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedTransform {
    categorical: Vec<CategoricalEncoding>,
    numeric: Vec<NumericScaling>,
}

impl FittedTransform {
    pub fn categorical(&self) -> &[CategoricalEncoding] {
        &self.categorical
    }

    pub fn numeric(&self) -> &[NumericScaling] {
        &self.numeric
    }

    /// Width of every transformed matrix
    pub fn n_features(&self) -> usize {
        self.categorical.iter().map(|c| c.levels.len()).sum::<usize>() + self.numeric.len()
    }

    /// Output column names, in matrix column order.
    ///
    /// Names are unique: a name already taken by an earlier column gets a
    /// `_2`, `_3`, ... suffix.
    pub fn feature_names(&self) -> Vec<String> {
        let mut raw = Vec::with_capacity(self.n_features());
        for encoding in &self.categorical {
            for level in &encoding.levels {
                raw.push(format!(
                    "{}_{}",
                    encoding.column,
                    level.as_deref().unwrap_or(MISSING_LEVEL)
                ));
            }
        }
        raw.extend(self.numeric.iter().map(|n| n.column.clone()));

        let mut taken: HashSet<String> = HashSet::with_capacity(raw.len());
        raw.into_iter()
            .map(|name| {
                let mut candidate = name.clone();
                let mut n = 2;
                while taken.contains(&candidate) {
                    candidate = format!("{}_{}", name, n);
                    n += 1;
                }
                taken.insert(candidate.clone());
                candidate
            })
            .collect()
    }

    /// Apply the fitted encoding to any frame with the fitted columns.
    ///
    /// Categorical values not seen at fit time produce an all-zero indicator
    /// block. Missing numeric values come out as NaN.
    pub fn transform(&self, df: &DataFrame) -> Result<Mat<f64>> {
        let n_rows = df.height();
        let mut matrix = Mat::<f64>::zeros(n_rows, self.n_features());
        let mut offset = 0;

        for encoding in &self.categorical {
            let lookup: HashMap<Option<&str>, usize> = encoding
                .levels
                .iter()
                .enumerate()
                .map(|(i, level)| (level.as_deref(), i))
                .collect();

            let values = categorical_values(df, &encoding.column)?;
            for (row, value) in values.iter().enumerate() {
                if let Some(&level_idx) = lookup.get(&value.as_deref()) {
                    matrix[(row, offset + level_idx)] = 1.0;
                }
            }
            offset += encoding.levels.len();
        }

        for scaling in &self.numeric {
            let values = numeric_values(df, &scaling.column)?;
            for (row, value) in values.iter().enumerate() {
                matrix[(row, offset)] = match value {
                    Some(x) => (x - scaling.mean) / scaling.scale,
                    None => f64::NAN,
                };
            }
            offset += 1;
        }

        Ok(matrix)
    }
}

/// Mean and population std over the non-missing, non-NaN values
fn mean_and_scale(values: &[Option<f64>]) -> (f64, f64) {
    let present: Vec<f64> = values
        .iter()
        .filter_map(|v| *v)
        .filter(|v| !v.is_nan())
        .collect();

    if present.is_empty() {
        return (0.0, 1.0);
    }

    let n = present.len() as f64;
    let mean = present.iter().sum::<f64>() / n;
    let variance = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();

    let scale = if std > 0.0 && std.is_finite() { std } else { 1.0 };
    (mean, scale)
}
