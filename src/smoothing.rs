//! Exponentially weighted moving average (EWMA) over a numeric column.
//!
//! # Algorithm
//!
//! ```text
//! S_first = x_first
//! S_t     = α x_t + (1 - α) S_{t-1}     if x_t is present
//! S_t     = S_{t-1}                     if x_t is absent
//! ```
//!
//! Outputs before the first present input stay absent. There is no look-ahead and no
//! bias adjustment of early weights.
//!
//! The smoothing factor can be given directly or derived from a span or a center of mass:
//!
//! ```text
//! α = 2 / (span + 1)        span >= 1
//! α = 1 / (com + 1)         com >= 0
//! ```
//!
//! ## Example
//!
//! ```rust
//! use rust_data_quality::smoothing::{ewma_values, EwmaMode};
//!
//! let out = ewma_values(&[Some(10.0), Some(20.0), Some(30.0)], EwmaMode::Alpha(0.5)).unwrap();
//! assert_eq!(out.values, vec![Some(10.0), Some(15.0), Some(22.5)]);
//! ```

use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::DataSet;

/// Parameterisation of the smoothing factor α.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum EwmaMode {
    /// α directly, in `(0, 1]`.
    Alpha(f64),
    /// Span `s >= 1`; α = 2 / (s + 1).
    Span(f64),
    /// Center of mass `c >= 0`; α = 1 / (c + 1).
    CenterOfMass(f64),
}

impl EwmaMode {
    /// Resolve the smoothing factor, or [`AnalysisError::InvalidSmoothingParameter`].
    pub fn alpha(&self) -> AnalysisResult<f64> {
        match *self {
            EwmaMode::Alpha(a) if a.is_finite() && a > 0.0 && a <= 1.0 => Ok(a),
            EwmaMode::Alpha(a) => Err(invalid(format!("alpha {a} must be in (0, 1]"))),
            EwmaMode::Span(s) if s.is_finite() && s >= 1.0 => Ok(2.0 / (s + 1.0)),
            EwmaMode::Span(s) => Err(invalid(format!("span {s} must be >= 1"))),
            EwmaMode::CenterOfMass(c) if c.is_finite() && c >= 0.0 => Ok(1.0 / (c + 1.0)),
            EwmaMode::CenterOfMass(c) => {
                Err(invalid(format!("center of mass {c} must be >= 0")))
            }
        }
    }
}

fn invalid(message: String) -> AnalysisError {
    AnalysisError::InvalidSmoothingParameter { message }
}

/// A smoothed series aligned row-for-row with its input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmoothedSeries {
    /// Smoothed values; `None` before the first present input.
    pub values: Vec<Option<f64>>,
    /// Resolved smoothing factor.
    pub alpha: f64,
}

impl SmoothedSeries {
    /// Number of rows, equal to the input length.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when the input had no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Last smoothed value, i.e. the one-step-ahead level.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }
}

/// Smooth numeric `column` of `dataset`.
///
/// Fails with [`AnalysisError::UnknownColumn`] for a missing column and
/// [`AnalysisError::NotNumeric`] for a non-numeric one.
pub fn ewma(dataset: &DataSet, column: &str, mode: EwmaMode) -> AnalysisResult<SmoothedSeries> {
    let inputs = dataset.numeric_column(column)?;
    let series = ewma_values(&inputs, mode)?;
    tracing::debug!(column, alpha = series.alpha, rows = series.len(), "ewma computed");
    Ok(series)
}

/// Apply the EWMA recurrence to raw values (`None` and NaN are absent).
pub fn ewma_values(inputs: &[Option<f64>], mode: EwmaMode) -> AnalysisResult<SmoothedSeries> {
    let alpha = mode.alpha()?;
    let mut values = Vec::with_capacity(inputs.len());
    let mut level: Option<f64> = None;

    for x in inputs {
        level = match (level, x.filter(|v| !v.is_nan())) {
            (None, None) => None,
            (None, Some(x)) => Some(x),
            (Some(s), Some(x)) => Some(alpha * x + (1.0 - alpha) * s),
            (Some(s), None) => Some(s),
        };
        values.push(level);
    }

    Ok(SmoothedSeries { values, alpha })
}
