//! Value objects produced by [`super::analyze`].

use serde::Serialize;

use crate::types::{DataType, Value};

/// Structural and statistical diagnostics for a [`crate::types::DataSet`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    /// Total number of rows.
    pub row_count: usize,
    /// Column names in schema order.
    pub column_names: Vec<String>,
    /// Per-column null/type/cardinality diagnostics, in schema order.
    pub columns: Vec<ColumnQuality>,
    /// Rows whose full value tuple repeats an earlier row.
    pub duplicate_rows: usize,
    /// Columns holding at least one null, in schema order.
    pub columns_with_nulls: Vec<String>,
    /// Descriptive statistics (numeric columns, plus non-numeric ones when requested).
    pub statistics: Vec<ColumnStatistics>,
}

impl QualityReport {
    /// Diagnostics for column `name`, if present.
    pub fn column(&self, name: &str) -> Option<&ColumnQuality> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Descriptive statistics for column `name`, if it was summarised.
    pub fn statistics_for(&self, name: &str) -> Option<&ColumnStatistics> {
        self.statistics.iter().find(|s| s.column() == name)
    }

    /// Sum of nulls across all columns.
    pub fn total_nulls(&self) -> usize {
        self.columns.iter().map(|c| c.null_count).sum()
    }

    /// Pretty-printed JSON rendering for a presentation layer.
    ///
    /// Statistics entries carry a `"kind"` tag (`"numeric"` or `"categorical"`);
    /// not-applicable values are `null`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Per-column diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnQuality {
    pub name: String,
    pub data_type: DataType,
    pub null_count: usize,
    /// `null_count / row_count * 100`, rounded; `0` for an empty dataset.
    pub null_percentage: f64,
    /// Distinct non-null values.
    pub distinct_count: usize,
}

/// Descriptive statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnStatistics {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

impl ColumnStatistics {
    /// Name of the summarized column.
    pub fn column(&self) -> &str {
        match self {
            ColumnStatistics::Numeric(s) => &s.column,
            ColumnStatistics::Categorical(s) => &s.column,
        }
    }
}

/// Summary of a numeric column; nulls are ignored.
///
/// Fields other than `count` are `None` when undefined (empty column, or `std` with fewer
/// than two values).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (divisor `n - 1`).
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

/// Summary of a non-numeric column; nulls are ignored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    /// Most frequent value; ties go to the value seen first.
    pub top: Option<Value>,
    /// Occurrences of `top`.
    pub freq: usize,
}
