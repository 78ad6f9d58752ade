//! Descriptive statistics for a single column.

use std::collections::HashMap;

use crate::stats::{mean, quantile_sorted, sample_std, sorted};
use crate::types::{DataSet, Value, ValueKey};

use super::report::{CategoricalSummary, NumericSummary};

pub(crate) fn describe_numeric(dataset: &DataSet, idx: usize) -> NumericSummary {
    let values: Vec<f64> = dataset
        .column_values(idx)
        .filter_map(Value::as_f64)
        .collect();
    let sorted = sorted(&values);

    NumericSummary {
        column: dataset.schema.fields[idx].name.clone(),
        count: values.len(),
        mean: mean(&values),
        std: sample_std(&values),
        min: sorted.first().copied(),
        p25: quantile_sorted(&sorted, 0.25),
        p50: quantile_sorted(&sorted, 0.50),
        p75: quantile_sorted(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

pub(crate) fn describe_categorical(dataset: &DataSet, idx: usize) -> CategoricalSummary {
    // key -> (count, first row seen, value)
    let mut counts: HashMap<ValueKey<'_>, (usize, usize, &Value)> = HashMap::new();
    let mut count = 0usize;

    for (row, value) in dataset.column_values(idx).enumerate() {
        if value.is_null() {
            continue;
        }
        count += 1;
        counts
            .entry(value.key())
            .and_modify(|e| e.0 += 1)
            .or_insert((1, row, value));
    }

    let top = counts
        .values()
        .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1)));

    CategoricalSummary {
        column: dataset.schema.fields[idx].name.clone(),
        count,
        unique: counts.len(),
        top: top.map(|(_, _, v)| (*v).clone()),
        freq: top.map(|(n, _, _)| *n).unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema};

    fn utf8(s: &str) -> Value {
        Value::Utf8(s.to_string())
    }

    #[test]
    fn numeric_summary_matches_hand_computation() {
        let schema = Schema::new(vec![Field::new("x", DataType::Int64)]);
        let ds = DataSet::new(
            schema,
            vec![
                vec![Value::Int64(4)],
                vec![Value::Int64(1)],
                vec![Value::Null],
                vec![Value::Int64(3)],
                vec![Value::Int64(2)],
            ],
        );
        let s = describe_numeric(&ds, 0);
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, Some(2.5));
        assert_eq!(s.min, Some(1.0));
        assert_eq!(s.max, Some(4.0));
        assert_eq!(s.p25, Some(1.75));
        assert_eq!(s.p50, Some(2.5));
        assert_eq!(s.p75, Some(3.25));
        let std = s.std.unwrap();
        assert!((std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn numeric_summary_of_single_value_has_no_std() {
        let schema = Schema::new(vec![Field::new("x", DataType::Float64)]);
        let ds = DataSet::new(schema, vec![vec![Value::Float64(7.0)]]);
        let s = describe_numeric(&ds, 0);
        assert_eq!(s.count, 1);
        assert_eq!(s.std, None);
        assert_eq!(s.p75, Some(7.0));
    }

    #[test]
    fn categorical_top_breaks_ties_by_first_seen() {
        let schema = Schema::new(vec![Field::new("c", DataType::Utf8)]);
        let ds = DataSet::new(
            schema,
            vec![
                vec![utf8("b")],
                vec![utf8("a")],
                vec![Value::Null],
                vec![utf8("a")],
                vec![utf8("b")],
                vec![utf8("c")],
            ],
        );
        let s = describe_categorical(&ds, 0);
        assert_eq!(s.count, 5);
        assert_eq!(s.unique, 3);
        assert_eq!(s.top, Some(utf8("b")));
        assert_eq!(s.freq, 2);
    }

    #[test]
    fn categorical_summary_of_all_null_column() {
        let schema = Schema::new(vec![Field::new("c", DataType::Bool)]);
        let ds = DataSet::new(schema, vec![vec![Value::Null], vec![Value::Null]]);
        let s = describe_categorical(&ds, 0);
        assert_eq!(s.count, 0);
        assert_eq!(s.unique, 0);
        assert_eq!(s.top, None);
        assert_eq!(s.freq, 0);
    }
}
