//! Text-cell typing: schema inference and typed parsing shared by CSV and Excel ingestion.

use crate::error::{IngestionError, IngestionResult};
use crate::time_range::parse_timestamp;
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Cell texts read as null (compared after trimming, case-sensitive).
pub const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// `true` if `raw` should become [`Value::Null`].
pub fn is_null_token(raw: &str) -> bool {
    NULL_TOKENS.contains(&raw.trim())
}

/// Infer the narrowest [`DataType`] that every non-null cell parses as.
///
/// Candidates are tried in order `Int64`, `Float64`, `Bool`, `Timestamp`, falling back to
/// `Utf8`. A column with no non-null cells is `Utf8`.
pub fn infer_data_type<'a>(cells: impl IntoIterator<Item = &'a str>) -> DataType {
    let present: Vec<&str> = cells
        .into_iter()
        .map(str::trim)
        .filter(|c| !is_null_token(c))
        .collect();
    if present.is_empty() {
        return DataType::Utf8;
    }

    if present.iter().all(|c| c.parse::<i64>().is_ok()) {
        DataType::Int64
    } else if present.iter().all(|c| c.parse::<f64>().is_ok()) {
        DataType::Float64
    } else if present.iter().all(|c| parse_bool(c).is_ok()) {
        DataType::Bool
    } else if present.iter().all(|c| parse_timestamp(c).is_some()) {
        DataType::Timestamp
    } else {
        DataType::Utf8
    }
}

/// Infer a schema for text rows laid out under `headers`.
pub fn infer_schema(headers: &[String], rows: &[Vec<String>]) -> Schema {
    let fields = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells = rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or(""));
            Field::new(name.trim(), infer_data_type(cells))
        })
        .collect();
    Schema::new(fields)
}

/// Parse text rows (already projected to `schema` order) into a [`DataSet`].
///
/// `first_user_row` is the 1-based row number reported for `rows[0]` in parse errors.
pub(crate) fn typed_dataset(
    schema: &Schema,
    rows: &[Vec<String>],
    first_user_row: usize,
) -> IngestionResult<DataSet> {
    let mut out: Vec<Vec<Value>> = Vec::with_capacity(rows.len());
    for (offset, row) in rows.iter().enumerate() {
        let user_row = first_user_row + offset;
        let mut typed = Vec::with_capacity(schema.fields.len());
        for (idx, field) in schema.fields.iter().enumerate() {
            let raw = row.get(idx).map(String::as_str).unwrap_or("");
            typed.push(parse_typed_value(user_row, &field.name, field.data_type, raw)?);
        }
        out.push(typed);
    }
    DataSet::try_new(schema.clone(), out)
}

pub(crate) fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: DataType,
    raw: &str,
) -> IngestionResult<Value> {
    let trimmed = raw.trim();
    if is_null_token(trimmed) {
        return Ok(Value::Null);
    }

    let parse_err = |message: String| IngestionError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_err(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_err(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_err),
        DataType::Timestamp => parse_timestamp(trimmed)
            .map(Value::Timestamp)
            .ok_or_else(|| parse_err("expected a date or date-time".to_string())),
    }
}

pub(crate) fn parse_bool(s: &str) -> Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}
