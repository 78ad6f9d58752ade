//! Data quality diagnostics.
//!
//! [`analyze`] turns a [`DataSet`] into a [`QualityReport`]: row count, per-column null
//! counts and percentages, declared types, distinct counts, duplicate rows, and a
//! descriptive-statistics table.
//!
//! ## Example
//!
//! ```rust
//! use rust_data_quality::quality::analyze;
//! use rust_data_quality::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![Field::new("value", DataType::Int64)]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Int64(1)],
//!         vec![Value::Int64(2)],
//!         vec![Value::Int64(3)],
//!         vec![Value::Null],
//!         vec![Value::Int64(5)],
//!     ],
//! );
//!
//! let report = analyze(&ds, false);
//! let col = report.column("value").unwrap();
//! assert_eq!(col.null_count, 1);
//! assert_eq!(col.null_percentage, 20.0);
//! assert_eq!(col.distinct_count, 4);
//! ```

mod describe;
pub mod report;

use std::collections::HashSet;

use crate::stats::round_to;
use crate::types::{DataSet, ValueKey};

pub use report::{
    CategoricalSummary, ColumnQuality, ColumnStatistics, NumericSummary, QualityReport,
};

/// Options for [`analyze_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct QualityOptions {
    /// Summarise non-numeric columns too (count/unique/top/freq).
    pub include_all_columns: bool,
    /// Decimal places kept in null percentages.
    pub precision: u32,
}

impl Default for QualityOptions {
    fn default() -> Self {
        Self {
            include_all_columns: false,
            precision: 2,
        }
    }
}

/// Analyze `dataset` with the default display precision.
///
/// When `include_all_columns` is set, non-numeric columns are also summarised in
/// [`QualityReport::statistics`]; otherwise only numeric columns are.
pub fn analyze(dataset: &DataSet, include_all_columns: bool) -> QualityReport {
    analyze_with(
        dataset,
        &QualityOptions {
            include_all_columns,
            ..Default::default()
        },
    )
}

/// Analyze `dataset` with explicit [`QualityOptions`].
///
/// Never fails: an empty dataset yields zero counts and 0% nulls.
pub fn analyze_with(dataset: &DataSet, options: &QualityOptions) -> QualityReport {
    let row_count = dataset.row_count();

    let columns: Vec<ColumnQuality> = dataset
        .schema
        .fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let null_count = dataset.column_values(idx).filter(|v| v.is_null()).count();
            let distinct_count = dataset
                .column_values(idx)
                .filter(|v| !v.is_null())
                .map(|v| v.key())
                .collect::<HashSet<_>>()
                .len();
            ColumnQuality {
                name: field.name.clone(),
                data_type: field.data_type,
                null_count,
                null_percentage: null_percentage(null_count, row_count, options.precision),
                distinct_count,
            }
        })
        .collect();

    let columns_with_nulls = columns
        .iter()
        .filter(|c| c.null_count > 0)
        .map(|c| c.name.clone())
        .collect();

    let statistics = dataset
        .schema
        .fields
        .iter()
        .enumerate()
        .filter_map(|(idx, field)| {
            if field.data_type.is_numeric() {
                Some(ColumnStatistics::Numeric(describe::describe_numeric(dataset, idx)))
            } else if options.include_all_columns {
                Some(ColumnStatistics::Categorical(describe::describe_categorical(
                    dataset, idx,
                )))
            } else {
                None
            }
        })
        .collect();

    let duplicate_rows = count_duplicate_rows(dataset);

    tracing::debug!(
        rows = row_count,
        columns = dataset.column_count(),
        duplicate_rows,
        "quality analysis complete"
    );

    QualityReport {
        row_count,
        column_names: dataset.schema.field_names().map(str::to_string).collect(),
        columns,
        duplicate_rows,
        columns_with_nulls,
        statistics,
    }
}

fn null_percentage(null_count: usize, row_count: usize, precision: u32) -> f64 {
    if row_count == 0 {
        return 0.0;
    }
    round_to(null_count as f64 / row_count as f64 * 100.0, precision)
}

/// Rows whose full key tuple was already seen earlier in the dataset.
fn count_duplicate_rows(dataset: &DataSet) -> usize {
    let mut seen: HashSet<Vec<ValueKey<'_>>> = HashSet::with_capacity(dataset.row_count());
    dataset
        .rows
        .iter()
        .filter(|row| !seen.insert(row.iter().map(|v| v.key()).collect()))
        .count()
}
