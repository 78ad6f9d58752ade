//! Core data model types.
//!
//! Ingestion produces an in-memory [`DataSet`] shaped by a [`Schema`] (a list of typed
//! [`Field`]s). Every analysis in this crate borrows a `DataSet` immutably; operations that
//! derive new columns or subsets return a fresh `DataSet`.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult, IngestionError, IngestionResult};

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// Date-time without timezone.
    Timestamp,
}

impl DataType {
    /// `true` for `Int64` and `Float64`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int64 | DataType::Float64)
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// A list of fields describing the shape of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Date-time without timezone.
    Timestamp(NaiveDateTime),
}

impl Value {
    /// `true` for [`Value::Null`] and for a NaN float, both of which mark a missing cell.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float64(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value; `None` for nulls, NaN and non-numeric variants.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// Hashable projection used for equality-based grouping (duplicates, distinct counts).
    pub fn key(&self) -> ValueKey<'_> {
        match self {
            Value::Null => ValueKey::Null,
            Value::Float64(v) if v.is_nan() => ValueKey::Null,
            Value::Int64(v) => ValueKey::Int64(*v),
            Value::Float64(v) => ValueKey::Float64(float_bits(*v)),
            Value::Bool(v) => ValueKey::Bool(*v),
            Value::Utf8(s) => ValueKey::Utf8(s.as_str()),
            Value::Timestamp(t) => ValueKey::Timestamp(*t),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Utf8(s) => f.write_str(s),
            Value::Timestamp(t) => write!(f, "{t}"),
        }
    }
}

/// Borrowed, hashable form of a [`Value`].
///
/// Floats compare by bit pattern, with `-0.0` folded into `0.0`. A NaN float keys as
/// `Null`, and `Null` equals `Null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKey<'a> {
    Null,
    Int64(i64),
    Float64(u64),
    Bool(bool),
    Utf8(&'a str),
    Timestamp(NaiveDateTime),
}

fn float_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields. Every row
/// holds exactly one value per field; absent cells are [`Value::Null`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    ///
    /// # Panics
    ///
    /// Panics if any row length differs from the schema field count. Use [`Self::try_new`]
    /// for untrusted input.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        let expected_len = schema.fields.len();
        for row in &rows {
            assert!(
                row.len() == expected_len,
                "row length {} does not match schema length {}",
                row.len(),
                expected_len
            );
        }
        Self { schema, rows }
    }

    /// Create a dataset, rejecting rows whose length differs from the schema.
    pub fn try_new(schema: Schema, rows: Vec<Vec<Value>>) -> IngestionResult<Self> {
        let expected_len = schema.fields.len();
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != expected_len)
        {
            return Err(IngestionError::SchemaMismatch {
                message: format!(
                    "row {idx} has {} values but schema has {expected_len} fields",
                    row.len()
                ),
            });
        }
        Ok(Self { schema, rows })
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// Index of `name` in the schema, or [`AnalysisError::UnknownColumn`].
    pub fn column_index(&self, name: &str) -> AnalysisResult<usize> {
        self.schema
            .index_of(name)
            .ok_or_else(|| AnalysisError::UnknownColumn {
                column: name.to_string(),
            })
    }

    /// Field metadata for `name`, or [`AnalysisError::UnknownColumn`].
    pub fn field(&self, name: &str) -> AnalysisResult<&Field> {
        let idx = self.column_index(name)?;
        Ok(&self.schema.fields[idx])
    }

    /// Iterate the values of the column at `idx`, in row order.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds for the schema.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        assert!(idx < self.column_count(), "column index {idx} out of bounds");
        self.rows.iter().map(move |row| &row[idx])
    }

    /// Iterate the values of column `name`, in row order.
    pub fn column(&self, name: &str) -> AnalysisResult<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Ok(self.column_values(idx))
    }

    /// Values of numeric `column` as `f64`, with `None` for nulls.
    ///
    /// Fails with [`AnalysisError::NotNumeric`] unless the column is `Int64` or `Float64`.
    pub fn numeric_column(&self, name: &str) -> AnalysisResult<Vec<Option<f64>>> {
        let field = self.field(name)?;
        if !field.data_type.is_numeric() {
            return Err(AnalysisError::NotNumeric {
                column: name.to_string(),
                data_type: field.data_type,
            });
        }
        Ok(self.column(name)?.map(Value::as_f64).collect())
    }

    /// The first `n` rows (fewer if the dataset is shorter).
    pub fn head(&self, n: usize) -> Self {
        Self {
            schema: self.schema.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Return a new dataset with `field` appended as the last column.
    ///
    /// # Panics
    ///
    /// Panics if `values.len()` differs from the row count.
    pub fn with_column(&self, field: Field, values: Vec<Value>) -> Self {
        assert!(
            values.len() == self.row_count(),
            "column '{}' has {} values but dataset has {} rows",
            field.name,
            values.len(),
            self.row_count()
        );
        let mut schema = self.schema.clone();
        schema.fields.push(field);
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, v)| {
                let mut out = Vec::with_capacity(row.len() + 1);
                out.extend(row.iter().cloned());
                out.push(v);
                out
            })
            .collect();
        Self { schema, rows }
    }

    /// Return a new dataset where column `name` is replaced by `values` typed as `data_type`.
    ///
    /// # Panics
    ///
    /// Panics if `values.len()` differs from the row count.
    pub fn replace_column(
        &self,
        name: &str,
        data_type: DataType,
        values: Vec<Value>,
    ) -> AnalysisResult<Self> {
        let idx = self.column_index(name)?;
        assert!(
            values.len() == self.row_count(),
            "column '{name}' has {} values but dataset has {} rows",
            values.len(),
            self.row_count()
        );
        let mut schema = self.schema.clone();
        schema.fields[idx].data_type = data_type;
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, v)| {
                let mut out = row.clone();
                out[idx] = v;
                out
            })
            .collect();
        Ok(Self { schema, rows })
    }
}
