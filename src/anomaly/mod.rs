//! Unsupervised outlier labelling for a single numeric column.
//!
//! [`detect`] fits an [`IsolationForest`] on the non-null values of a column, scores every
//! value, and labels the top `contamination` fraction of scores as anomalous. Rows whose
//! value is null are labelled [`AnomalyLabel::NotEvaluable`] and keep their position, so the
//! result lines up one-to-one with the source rows.
//!
//! Labels are only reproducible when [`DetectorOptions::seed`] is pinned.
//!
//! ## Example
//!
//! ```rust
//! use rust_data_quality::anomaly::{detect_with, AnomalyLabel, DetectorOptions};
//! use rust_data_quality::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![Field::new("latency_ms", DataType::Float64)]);
//! let mut rows: Vec<Vec<Value>> = (0..99)
//!     .map(|i| vec![Value::Float64(20.0 + (i % 10) as f64 * 0.1)])
//!     .collect();
//! rows.push(vec![Value::Float64(900.0)]);
//! rows.push(vec![Value::Null]);
//! let ds = DataSet::new(schema, rows);
//!
//! let opts = DetectorOptions { seed: Some(7), ..Default::default() };
//! let result = detect_with(&ds, "latency_ms", &opts).unwrap();
//! assert_eq!(result.labels[99], AnomalyLabel::Anomalous);
//! assert_eq!(result.labels[100], AnomalyLabel::NotEvaluable);
//! ```

mod forest;

use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};
use crate::stats::{quantile_sorted, sorted};
use crate::types::DataSet;

pub use forest::{ForestParams, IsolationForest};

/// Model convention for an inlier.
const INLIER: i8 = 1;
/// Model convention for an outlier.
const OUTLIER: i8 = -1;

/// Options for [`detect_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorOptions {
    /// Expected fraction of anomalies, strictly inside `(0, 0.5)`.
    pub contamination: f64,
    /// Number of trees in the ensemble.
    pub n_trees: usize,
    /// Subsample size per tree (capped by the number of values).
    pub max_samples: usize,
    /// Pin the ensemble's randomness for reproducible labels.
    pub seed: Option<u64>,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            contamination: 0.05,
            n_trees: 100,
            max_samples: 256,
            seed: None,
        }
    }
}

impl DetectorOptions {
    fn validate(&self) -> AnalysisResult<()> {
        let c = self.contamination;
        if !(c > 0.0 && c < 0.5) {
            return Err(AnalysisError::InvalidContamination { value: c });
        }
        self.forest_params().validate()
    }

    fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_trees: self.n_trees,
            max_samples: self.max_samples,
            seed: self.seed,
        }
    }
}

/// Per-row outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyLabel {
    Normal,
    Anomalous,
    /// The row's value was null, so it was not scored.
    NotEvaluable,
}

impl AnomalyLabel {
    /// `0` for normal, `1` for anomalous, `None` when not evaluable.
    pub fn code(&self) -> Option<u8> {
        match self {
            AnomalyLabel::Normal => Some(0),
            AnomalyLabel::Anomalous => Some(1),
            AnomalyLabel::NotEvaluable => None,
        }
    }

    fn from_prediction(prediction: i8) -> Self {
        if prediction == OUTLIER {
            AnomalyLabel::Anomalous
        } else {
            AnomalyLabel::Normal
        }
    }
}

/// Labels and scores aligned with the source rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyResult {
    /// One label per source row.
    pub labels: Vec<AnomalyLabel>,
    /// Anomaly score per row; `None` for null rows.
    pub scores: Vec<Option<f64>>,
    /// Scores strictly above this are anomalous.
    pub threshold: f64,
    /// Contamination the threshold was derived from.
    pub contamination: f64,
}

impl AnomalyResult {
    /// Rows labelled anomalous.
    pub fn anomaly_count(&self) -> usize {
        self.labels
            .iter()
            .filter(|l| **l == AnomalyLabel::Anomalous)
            .count()
    }

    /// Rows that had a value to score.
    pub fn evaluable_count(&self) -> usize {
        self.labels
            .iter()
            .filter(|l| **l != AnomalyLabel::NotEvaluable)
            .count()
    }

    /// 0/1 codes per row (`None` for not-evaluable rows).
    pub fn codes(&self) -> Vec<Option<u8>> {
        self.labels.iter().map(AnomalyLabel::code).collect()
    }

    /// Row indices labelled anomalous.
    pub fn anomalous_rows(&self) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == AnomalyLabel::Anomalous)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Detect outliers in `column` with default forest settings and the given contamination.
pub fn detect(dataset: &DataSet, column: &str, contamination: f64) -> AnalysisResult<AnomalyResult> {
    detect_with(
        dataset,
        column,
        &DetectorOptions {
            contamination,
            ..Default::default()
        },
    )
}

/// Detect outliers in `column` with explicit [`DetectorOptions`].
pub fn detect_with(
    dataset: &DataSet,
    column: &str,
    options: &DetectorOptions,
) -> AnalysisResult<AnomalyResult> {
    options.validate()?;
    let inputs = dataset.numeric_column(column)?;
    let fitted: Vec<f64> = inputs.iter().flatten().copied().collect();
    if fitted.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            column: column.to_string(),
            available: fitted.len(),
        });
    }

    let forest = IsolationForest::fit(&fitted, &options.forest_params())?;
    let fitted_scores = forest.score_many(&fitted);
    let threshold = quantile_sorted(&sorted(&fitted_scores), 1.0 - options.contamination)
        .unwrap_or(f64::INFINITY);

    let mut next = fitted_scores.into_iter();
    let mut labels = Vec::with_capacity(inputs.len());
    let mut scores = Vec::with_capacity(inputs.len());
    for value in &inputs {
        match value.and_then(|_| next.next()) {
            Some(score) => {
                let prediction = if score > threshold { OUTLIER } else { INLIER };
                labels.push(AnomalyLabel::from_prediction(prediction));
                scores.push(Some(score));
            }
            None => {
                labels.push(AnomalyLabel::NotEvaluable);
                scores.push(None);
            }
        }
    }

    let result = AnomalyResult {
        labels,
        scores,
        threshold,
        contamination: options.contamination,
    };
    tracing::debug!(
        column,
        evaluable = result.evaluable_count(),
        anomalies = result.anomaly_count(),
        threshold,
        "anomaly detection complete"
    );
    Ok(result)
}
