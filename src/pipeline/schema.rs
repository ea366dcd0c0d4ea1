//! Per-column semantic types
//!
//! Each column is classified exactly once, right after loading, as
//! categorical, numeric, or unsupported. Later steps read values through
//! the typed accessors here instead of re-inspecting dtypes.

use polars::prelude::*;
use serde::Serialize;

use super::error::{PrepError, Result};

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    /// Text, boolean, or categorical values - one-hot encoded
    Categorical,
    /// Integer or floating point values - standardized
    Numeric,
    /// Anything else (dates, lists, ...) - dropped by the transformer
    Unsupported,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Categorical => write!(f, "categorical"),
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// A named column with its resolved semantic type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    pub name: String,
    pub kind: ColumnKind,
}

/// Infer the semantic type implied by a polars dtype
pub fn kind_of_dtype(dtype: &DataType) -> ColumnKind {
    match dtype {
        DataType::String | DataType::Boolean => ColumnKind::Categorical,
        DataType::Categorical(_, _) | DataType::Enum(_, _) => ColumnKind::Categorical,
        dt if dt.is_primitive_numeric() => ColumnKind::Numeric,
        _ => ColumnKind::Unsupported,
    }
}

/// Resolve the semantic type of every column in the frame.
///
/// Overrides win over the dtype-derived kind. Naming a column that does not
/// exist in the frame is a configuration error.
pub fn resolve_schema(
    df: &DataFrame,
    categorical_overrides: &[String],
    numeric_overrides: &[String],
) -> Result<Vec<ColumnSchema>> {
    for name in categorical_overrides.iter().chain(numeric_overrides) {
        if df.column(name).is_err() {
            return Err(PrepError::config(format!(
                "Type override names column '{}' which is not in the dataset",
                name
            )));
        }
    }

    if let Some(both) = categorical_overrides
        .iter()
        .find(|name| numeric_overrides.contains(name))
    {
        return Err(PrepError::config(format!(
            "Column '{}' is declared both categorical and numeric",
            both
        )));
    }

    let schema = df
        .get_columns()
        .iter()
        .map(|col| {
            let name = col.name().to_string();
            let kind = if categorical_overrides.contains(&name) {
                ColumnKind::Categorical
            } else if numeric_overrides.contains(&name) {
                ColumnKind::Numeric
            } else {
                kind_of_dtype(col.dtype())
            };
            ColumnSchema { name, kind }
        })
        .collect();

    Ok(schema)
}

/// Names of the columns of one kind, in schema order
pub fn columns_of_kind(schema: &[ColumnSchema], kind: ColumnKind) -> Vec<String> {
    schema
        .iter()
        .filter(|c| c.kind == kind)
        .map(|c| c.name.clone())
        .collect()
}

/// Read a column as optional strings, whatever its physical dtype
pub fn categorical_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    let col = df
        .column(column)
        .map_err(|_| PrepError::MissingColumn {
            column: column.to_string(),
        })?;

    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.map(|n| format!("{}", n)))
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}

/// Read a column as optional floats.
///
/// Numeric and boolean dtypes are cast directly. Text columns are parsed
/// value by value: blanks become missing, and anything else that does not
/// parse fails with the offending row and column.
pub fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    let col = df
        .column(column)
        .map_err(|_| PrepError::MissingColumn {
            column: column.to_string(),
        })?;

    let dtype = col.dtype();
    if dtype.is_primitive_numeric() || matches!(dtype, DataType::Boolean) {
        let cast = col.cast(&DataType::Float64)?;
        return Ok(cast.f64()?.into_iter().collect());
    }

    match dtype {
        DataType::String => col
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| parse_numeric(column, row, v))
            .collect(),
        other => Err(PrepError::config(format!(
            "Column '{}' has type {} which cannot be read as numeric",
            column, other
        ))),
    }
}

fn parse_numeric(column: &str, row: usize, value: Option<&str>) -> Result<Option<f64>> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| PrepError::MalformedValue {
            column: column.to_string(),
            row,
            value: raw.to_string(),
        })
}
