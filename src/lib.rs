//! `rust-data-quality` turns a tabular dataset into quality diagnostics and time-series
//! analytics.
//!
//! The crate has two halves:
//!
//! - **Ingestion** ([`ingestion`]): load CSV (and, with the `excel` feature, spreadsheet)
//!   files into an in-memory [`types::DataSet`], either against a user-provided
//!   [`types::Schema`] or with per-column type inference.
//! - **Analysis engine**: pure, stateless functions over `&DataSet` that return value
//!   objects for a presentation layer to render.
//!
//! ## Engine components
//!
//! - [`quality::analyze`]: row count, per-column nulls and distinct counts, duplicate rows,
//!   descriptive statistics ([`quality::QualityReport`])
//! - [`time_range::resolve`] / [`time_range::apply`]: pick a date window
//!   ([`time_range::RangeMode`]) and slice the rows inside it
//! - [`smoothing::ewma`]: exponentially weighted moving average, parameterised by alpha,
//!   span or center of mass
//! - [`anomaly::detect`]: isolation-forest outlier labels aligned with the source rows
//!
//! None of these mutate their input; every failure is a typed [`AnalysisError`].
//!
//! ## Supported value types
//!
//! - [`types::DataType::Int64`]
//! - [`types::DataType::Float64`]
//! - [`types::DataType::Bool`]
//! - [`types::DataType::Utf8`]
//! - [`types::DataType::Timestamp`]
//!
//! Empty cells (and common markers such as `NA` or `null`) map to [`types::Value::Null`].
//!
//! ## Quick example: ingest, window, smooth
//!
//! ```no_run
//! use rust_data_quality::ingestion::{ingest_inferred_from_path, IngestionOptions};
//! use rust_data_quality::smoothing::{ewma, EwmaMode};
//! use rust_data_quality::time_range::{apply, resolve, RangeMode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ds = ingest_inferred_from_path("sales.csv", &IngestionOptions::default())?;
//! let range = resolve(&ds, "date", &RangeMode::last_30_days())?;
//! let window = apply(&ds, "date", &range)?;
//! let smoothed = ewma(&window, "sales", EwmaMode::Span(7.0))?;
//! println!("{} rows, last smoothed = {:?}", window.row_count(), smoothed.last());
//! # Ok(())
//! # }
//! ```
//!
//! ## Quality report example
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

pub mod anomaly;
pub mod error;
pub mod ingestion;
pub mod quality;
pub mod smoothing;
pub mod stats;
pub mod time_range;
pub mod types;

pub use error::{AnalysisError, AnalysisResult, IngestionError, IngestionResult};
