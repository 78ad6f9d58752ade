#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType as _, Reader};

use crate::error::{IngestionError, IngestionResult};
use crate::time_range::parse_timestamp;
use crate::types::{DataSet, DataType, Schema, Value};

use super::infer::{infer_schema, is_null_token, parse_bool, typed_dataset};

/// Ingest an Excel document (`.xlsx`, `.xls`, `.ods`, etc.) into an in-memory `DataSet`.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Validates that all schema fields exist as headers
/// - Reads remaining rows and converts cells into typed `Value`s (date cells become
///   [`Value::Timestamp`])
pub fn ingest_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
    schema: &Schema,
) -> IngestionResult<DataSet> {
    let sheets: Option<Vec<&str>> = sheet_name.map(|s| vec![s]);
    ingest_excel_workbook_from_path(path, sheets.as_deref(), schema)
}

/// Ingest multiple sheets from an Excel workbook and concatenate all rows into one `DataSet`.
///
/// - If `sheet_names` is `None`, ingests **all sheets** in workbook order.
/// - If `sheet_names` is `Some(&[...])`, ingests only those sheets (in the provided order).
///
/// All tabs must carry every schema column.
pub fn ingest_excel_workbook_from_path(
    path: impl AsRef<Path>,
    sheet_names: Option<&[&str]>,
    schema: &Schema,
) -> IngestionResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;

    let sheets: Vec<String> = match sheet_names {
        Some(names) => names.iter().map(|s| s.to_string()).collect(),
        None => workbook.sheet_names().to_vec(),
    };
    if sheets.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "workbook has no sheets".to_string(),
        });
    }

    let mut all_rows: Vec<Vec<Value>> = Vec::new();
    for sheet in sheets {
        let range = workbook.worksheet_range(&sheet)?;
        let mut sheet_rows = ingest_sheet_range(&sheet, &range, schema)?;
        all_rows.append(&mut sheet_rows);
    }

    DataSet::try_new(schema.clone(), all_rows)
}

/// Ingest one sheet (the first when `sheet_name` is `None`), inferring column types.
///
/// Cells are rendered to text and typed with the same rules as CSV inference; date cells
/// render as ISO date-times, so date columns infer as `Timestamp`.
pub fn ingest_excel_inferred_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
) -> IngestionResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| IngestionError::SchemaMismatch {
                message: "workbook has no sheets".to_string(),
            })?,
    };
    let range = workbook.worksheet_range(&sheet)?;

    let header_row_idx =
        find_header_row(&range).map_err(|e| wrap_schema_err_with_sheet(&sheet, e))?;
    let mut rows_iter = range.rows().skip(header_row_idx);
    let headers: Vec<String> = rows_iter
        .next()
        .map(|row| row.iter().map(cell_to_text).collect())
        .unwrap_or_default();
    let rows: Vec<Vec<String>> = rows_iter
        .map(|row| row.iter().map(cell_to_text).collect())
        .collect();

    let schema = infer_schema(&headers, &rows);
    // header sits at 1-based row `header_row_idx + 1`
    typed_dataset(&schema, &rows, header_row_idx + 2)
}

fn ingest_sheet_range(
    sheet: &str,
    range: &calamine::Range<Data>,
    schema: &Schema,
) -> IngestionResult<Vec<Vec<Value>>> {
    let (header_row_idx, col_idxs) = build_header_projection(range, schema)
        .map_err(|e| wrap_schema_err_with_sheet(sheet, e))?;

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (idx0, row) in range.rows().enumerate().skip(header_row_idx + 1) {
        // Report 1-based row number (Excel-like).
        let user_row = idx0 + 1;

        let mut out_row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &col_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let cell = row.get(col_idx).unwrap_or(&Data::Empty);
            let col_label = format!("{sheet}:{name}", name = field.name);
            out_row.push(convert_cell(user_row, &col_label, field.data_type, cell)?);
        }
        rows.push(out_row);
    }

    Ok(rows)
}

fn wrap_schema_err_with_sheet(sheet: &str, err: IngestionError) -> IngestionError {
    match err {
        IngestionError::SchemaMismatch { message } => IngestionError::SchemaMismatch {
            message: format!("sheet '{sheet}': {message}"),
        },
        other => other,
    }
}

fn find_header_row(range: &calamine::Range<Data>) -> IngestionResult<usize> {
    range
        .rows()
        .position(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .ok_or_else(|| IngestionError::SchemaMismatch {
            message: "sheet has no non-empty rows (no header row found)".to_string(),
        })
}

fn build_header_projection(
    range: &calamine::Range<Data>,
    schema: &Schema,
) -> IngestionResult<(usize, Vec<usize>)> {
    let header_row_idx = find_header_row(range)?;
    let header_cells: Vec<String> = range
        .rows()
        .nth(header_row_idx)
        .map(|row| row.iter().map(cell_to_text).collect())
        .unwrap_or_default();

    let mut col_idxs: Vec<usize> = Vec::with_capacity(schema.fields.len());
    for f in &schema.fields {
        match header_cells.iter().position(|h| h.trim() == f.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(IngestionError::SchemaMismatch {
                    message: format!(
                        "missing required column '{}'. headers={:?}",
                        f.name, header_cells
                    ),
                });
            }
        }
    }

    Ok((header_row_idx, col_idxs))
}

/// Text rendering used for headers and for inferred ingestion.
fn cell_to_text(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) => c
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}

fn convert_cell(row: usize, column: &str, data_type: DataType, c: &Data) -> IngestionResult<Value> {
    match c {
        Data::Empty => return Ok(Value::Null),
        Data::String(s) if is_null_token(s) => return Ok(Value::Null),
        _ => {}
    }

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(cell_to_string(c))),
        DataType::Bool => parse_bool_cell(row, column, c).map(Value::Bool),
        DataType::Int64 => parse_i64_cell(row, column, c).map(Value::Int64),
        DataType::Float64 => parse_f64_cell(row, column, c).map(Value::Float64),
        DataType::Timestamp => parse_timestamp_cell(row, column, c).map(Value::Timestamp),
    }
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        _ => c.to_string(),
    }
}

fn cell_error(row: usize, column: &str, c: &Data, message: impl Into<String>) -> IngestionError {
    IngestionError::ParseError {
        row,
        column: column.to_string(),
        raw: cell_to_string(c),
        message: message.into(),
    }
}

fn parse_bool_cell(row: usize, column: &str, c: &Data) -> IngestionResult<bool> {
    match c {
        Data::Bool(b) => Ok(*b),
        Data::Int(i) => Ok(*i != 0),
        Data::Float(f) => Ok(*f != 0.0),
        Data::String(s) => parse_bool(s).map_err(|message| cell_error(row, column, c, message)),
        _ => Err(cell_error(row, column, c, "expected bool")),
    }
}

fn parse_i64_cell(row: usize, column: &str, c: &Data) -> IngestionResult<i64> {
    match c {
        Data::Int(i) => Ok(*i),
        Data::Float(f) if f.fract() == 0.0 => Ok(*f as i64),
        Data::Float(_) => Err(cell_error(
            row,
            column,
            c,
            "expected integer (got non-integer float)",
        )),
        Data::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| cell_error(row, column, c, e.to_string())),
        _ => Err(cell_error(row, column, c, "expected integer")),
    }
}

fn parse_f64_cell(row: usize, column: &str, c: &Data) -> IngestionResult<f64> {
    match c {
        Data::Float(f) => Ok(*f),
        Data::Int(i) => Ok(*i as f64),
        Data::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| cell_error(row, column, c, e.to_string())),
        _ => Err(cell_error(row, column, c, "expected number")),
    }
}

fn parse_timestamp_cell(
    row: usize,
    column: &str,
    c: &Data,
) -> IngestionResult<chrono::NaiveDateTime> {
    let parsed = match c {
        Data::DateTime(_) => c.as_datetime(),
        Data::DateTimeIso(s) | Data::String(s) => parse_timestamp(s),
        _ => None,
    };
    parsed.ok_or_else(|| cell_error(row, column, c, "expected a date or date-time"))
}
