//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest_from_path`], which ingests a file into an in-memory
//! [`crate::types::DataSet`] using a provided [`crate::types::Schema`], or
//! [`ingest_inferred_from_path`] when the column types are not known up front.
//!
//! If [`IngestionOptions::format`] is `None`, the ingestion format is inferred from the file
//! extension. Outcomes are emitted as `tracing` events (`info` on success, `warn` on failure).

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, Schema};

use super::csv;

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// How to choose sheet(s) when ingesting an Excel workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExcelSheetSelection {
    /// Ingest the first sheet (default).
    #[default]
    First,
    /// Ingest a single named sheet.
    Sheet(String),
    /// Ingest all sheets and concatenate rows.
    AllSheets,
    /// Ingest only the listed sheets (in order) and concatenate rows.
    Sheets(Vec<String>),
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// Excel-specific options. Inferred ingestion only honours `First` and `Sheet`.
    pub excel_sheet_selection: ExcelSheetSelection,
}

/// Unified ingestion entry point for path-based sources.
///
/// - If `options.format` is `None`, format is inferred from the file extension.
/// - Use `options.excel_sheet_selection` for Excel multi-tab behavior.
///
/// # Examples
///
/// ## CSV (auto-detect by extension)
///
/// ```no_run
/// use rust_data_quality::ingestion::{ingest_from_path, IngestionOptions};
/// use rust_data_quality::types::{DataType, Field, Schema};
///
/// # fn main() -> Result<(), rust_data_quality::IngestionError> {
/// let schema = Schema::new(vec![
///     Field::new("date", DataType::Timestamp),
///     Field::new("sales", DataType::Float64),
/// ]);
///
/// let ds = ingest_from_path("sales.csv", &schema, &IngestionOptions::default())?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
///
/// ## Force a format explicitly (override extension inference)
///
/// ```no_run
/// use rust_data_quality::ingestion::{ingest_from_path, IngestionFormat, IngestionOptions};
/// use rust_data_quality::types::{DataType, Field, Schema};
///
/// # fn main() -> Result<(), rust_data_quality::IngestionError> {
/// let schema = Schema::new(vec![Field::new("id", DataType::Int64)]);
///
/// let opts = IngestionOptions {
///     format: Some(IngestionFormat::Csv),
///     ..Default::default()
/// };
///
/// let ds = ingest_from_path("input_without_extension", &schema, &opts)?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
///
/// ## Excel (feature-gated)
///
/// To ingest Excel files, enable the `excel` feature in your `Cargo.toml`:
///
/// ```toml
/// rust-data-quality = { path = ".", features = ["excel"] }
/// ```
///
/// ```no_run
/// use rust_data_quality::ingestion::{
///     ingest_from_path, ExcelSheetSelection, IngestionFormat, IngestionOptions,
/// };
/// use rust_data_quality::types::{DataType, Field, Schema};
///
/// # fn main() -> Result<(), rust_data_quality::IngestionError> {
/// let schema = Schema::new(vec![
///     Field::new("id", DataType::Int64),
///     Field::new("name", DataType::Utf8),
/// ]);
///
/// let opts = IngestionOptions {
///     format: Some(IngestionFormat::Excel),
///     excel_sheet_selection: ExcelSheetSelection::Sheet("Sheet1".to_string()),
/// };
///
/// let ds = ingest_from_path("workbook.xlsx", &schema, &opts)?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &IngestionOptions,
) -> IngestionResult<DataSet> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let result = match fmt {
        IngestionFormat::Csv => csv::ingest_csv_from_path(path, schema),
        IngestionFormat::Excel => {
            ingest_excel_dispatch(path, schema, &options.excel_sheet_selection)
        }
    };
    trace_outcome(path, fmt, &result);
    result
}

/// Like [`ingest_from_path`], but infers the schema from the file's cells.
///
/// ```no_run
/// use rust_data_quality::ingestion::{ingest_inferred_from_path, IngestionOptions};
///
/// # fn main() -> Result<(), rust_data_quality::IngestionError> {
/// let ds = ingest_inferred_from_path("upload.csv", &IngestionOptions::default())?;
/// for field in &ds.schema.fields {
///     println!("{}: {:?}", field.name, field.data_type);
/// }
/// # Ok(())
/// # }
/// ```
pub fn ingest_inferred_from_path(
    path: impl AsRef<Path>,
    options: &IngestionOptions,
) -> IngestionResult<DataSet> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let result = match fmt {
        IngestionFormat::Csv => csv::ingest_csv_inferred_from_path(path),
        IngestionFormat::Excel => {
            ingest_excel_inferred_dispatch(path, &options.excel_sheet_selection)
        }
    };
    trace_outcome(path, fmt, &result);
    result
}

fn trace_outcome(path: &Path, fmt: IngestionFormat, result: &IngestionResult<DataSet>) {
    match result {
        Ok(ds) => tracing::info!(
            path = %path.display(),
            format = ?fmt,
            rows = ds.row_count(),
            columns = ds.column_count(),
            "ingestion succeeded"
        ),
        Err(e) => tracing::warn!(
            path = %path.display(),
            format = ?fmt,
            error = %e,
            "ingestion failed"
        ),
    }
}

fn infer_format_from_path(path: &Path) -> IngestionResult<IngestionFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IngestionError::SchemaMismatch {
            message: format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ),
        })?;

    IngestionFormat::from_extension(ext).ok_or_else(|| IngestionError::SchemaMismatch {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

#[cfg(not(feature = "excel"))]
fn excel_disabled() -> IngestionError {
    IngestionError::SchemaMismatch {
        message: "excel ingestion not enabled (enable cargo feature 'excel')".to_string(),
    }
}

fn ingest_excel_dispatch(
    path: &Path,
    schema: &Schema,
    sel: &ExcelSheetSelection,
) -> IngestionResult<DataSet> {
    #[cfg(feature = "excel")]
    {
        use super::excel;

        match sel {
            ExcelSheetSelection::First => excel::ingest_excel_from_path(path, None, schema),
            ExcelSheetSelection::Sheet(name) => {
                excel::ingest_excel_from_path(path, Some(name.as_str()), schema)
            }
            ExcelSheetSelection::AllSheets => {
                excel::ingest_excel_workbook_from_path(path, None, schema)
            }
            ExcelSheetSelection::Sheets(names) => {
                let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
                excel::ingest_excel_workbook_from_path(path, Some(refs.as_slice()), schema)
            }
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = (path, schema, sel);
        Err(excel_disabled())
    }
}

fn ingest_excel_inferred_dispatch(
    path: &Path,
    sel: &ExcelSheetSelection,
) -> IngestionResult<DataSet> {
    #[cfg(feature = "excel")]
    {
        use super::excel;

        match sel {
            ExcelSheetSelection::First => excel::ingest_excel_inferred_from_path(path, None),
            ExcelSheetSelection::Sheet(name) => {
                excel::ingest_excel_inferred_from_path(path, Some(name.as_str()))
            }
            ExcelSheetSelection::AllSheets | ExcelSheetSelection::Sheets(_) => {
                Err(IngestionError::SchemaMismatch {
                    message: "schema inference reads a single sheet; pick First or Sheet(..)"
                        .to_string(),
                })
            }
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = (path, sel);
        Err(excel_disabled())
    }
}
