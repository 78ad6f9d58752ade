//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - performs ingestion into an in-memory [`crate::types::DataSet`]
//! - emits a `tracing` event describing the outcome
//!
//! [`ingest_inferred_from_path`] does the same without a caller-provided schema; column
//! types come from [`infer::infer_data_type`].
//!
//! Format-specific functions are also available under [`csv`] and (feature `excel`) `excel`.

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod infer;
pub mod unified;

pub use infer::{infer_data_type, infer_schema};
pub use unified::{
    ingest_from_path, ingest_inferred_from_path, ExcelSheetSelection, IngestionFormat,
    IngestionOptions,
};
