//! CSV Data Loader Module
//! Handles farmer CSV loading and column inspection using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("No header row in {0}")]
    NoHeader(PathBuf),
}

/// Holds the farmer table once it has been read from disk.
pub struct DataLoader {
    df: Option<DataFrame>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { df: None }
    }

    /// Load a CSV file using Polars.
    ///
    /// Cells that do not fit the inferred column type are read as null.
    pub fn load_csv(&mut self, file_path: impl AsRef<Path>) -> Result<&DataFrame, LoadError> {
        let path = file_path.as_ref();
        if !path.is_file() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()
            .and_then(|lf| lf.collect())
            .map_err(|e| {
                if is_no_data(&e) {
                    LoadError::NoHeader(path.to_path_buf())
                } else {
                    LoadError::Csv(e)
                }
            })?;

        if df.width() == 0 {
            return Err(LoadError::NoHeader(path.to_path_buf()));
        }

        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded farmer records"
        );
        debug!(columns = ?df.get_column_names(), "schema");

        Ok(&*self.df.insert(df))
    }

    /// Get list of column names from loaded DataFrame.
    pub fn columns(&self) -> Vec<String> {
        self.df.as_ref().map(column_names).unwrap_or_default()
    }

    /// Unique non-null values of a column, in first-seen order.
    pub fn unique_values(&self, column: &str) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| unique_strings(df, column))
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Take ownership of the loaded DataFrame.
    pub fn into_dataframe(self) -> Option<DataFrame> {
        self.df
    }
}

/// Polars reports an empty input as `NoData`, possibly wrapped in scan context.
fn is_no_data(err: &PolarsError) -> bool {
    match err {
        PolarsError::NoData(_) => true,
        PolarsError::Context { error, .. } => is_no_data(error),
        _ => false,
    }
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Read a column as optional strings, whatever its inferred dtype.
pub fn string_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<String>>> {
    let casted = df.column(column)?.cast(&DataType::String)?;
    let ca = casted.as_materialized_series().str()?;
    Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
}

/// Read a column as fruit counts.
///
/// Nulls, unparseable text, NaN, infinities and negative values all become 0.
pub fn numeric_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<f64>> {
    let casted = df.column(column)?.cast(&DataType::Float64)?;
    let ca = casted.as_materialized_series().f64()?;
    Ok(ca
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite() && *x > 0.0).unwrap_or(0.0))
        .collect())
}

/// Unique non-null values of a column in first-seen order.
pub fn unique_strings(df: &DataFrame, column: &str) -> Vec<String> {
    let Ok(values) = string_values(df, column) else {
        return Vec::new();
    };

    let mut seen: Vec<String> = Vec::new();
    for value in values.into_iter().flatten() {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
