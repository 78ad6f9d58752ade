//! Date-range resolution and filtering over a designated time column.
//!
//! The time column is coerced to timestamps on the fly: [`Value::Timestamp`] cells are used
//! as-is, [`Value::Utf8`] cells are parsed (see [`parse_timestamp`]), and anything else is
//! treated as absent. Absent rows never take part in range computation and are dropped by
//! [`apply`], but the source [`DataSet`] is left untouched.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rust_data_quality::time_range::{apply, resolve, RangeMode};
//! use rust_data_quality::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![Field::new("date", DataType::Utf8)]);
//! let rows = (1..=10)
//!     .map(|d| vec![Value::Utf8(format!("2024-01-{d:02}"))])
//!     .collect();
//! let ds = DataSet::new(schema, rows);
//!
//! let range = resolve(&ds, "date", &RangeMode::LastNDays(2)).unwrap();
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! assert_eq!(range.start(), day(8));
//! assert_eq!(range.end(), day(10));
//! assert_eq!(apply(&ds, "date", &range).unwrap().row_count(), 3);
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};
use crate::stats::quantile_sorted;
use crate::types::{DataSet, DataType, Value};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// An inclusive `[start, end]` window with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    /// Build a range, failing with [`AnalysisError::InvalidRange`] if `start > end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> AnalysisResult<Self> {
        if start > end {
            return Err(AnalysisError::InvalidRange {
                message: format!("start {start} is after end {end}"),
            });
        }
        Ok(Self { start, end })
    }

    /// First instant in the range.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Last instant in the range.
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Inclusive on both ends.
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t <= self.end
    }
}

/// How to choose the window passed to [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeMode {
    /// Every valid timestamp: `[min, max]`.
    All,
    /// `[max - n days, max]`.
    LastNDays(u32),
    /// From the `1 - f` quantile of the valid timestamps up to `max`; `f` in `(0, 1]`.
    LatestFraction(f64),
    /// Caller-supplied bounds, clamped to the data's `[min, max]`.
    Custom {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl RangeMode {
    /// Day counts offered as presets by the presentation layer.
    pub const PRESET_DAYS: [u32; 3] = [14, 30, 90];

    /// Fraction used by [`RangeMode::default`].
    pub const DEFAULT_FRACTION: f64 = 0.3;

    /// `LastNDays(14)`.
    pub fn last_14_days() -> Self {
        Self::LastNDays(14)
    }

    /// `LastNDays(30)`.
    pub fn last_30_days() -> Self {
        Self::LastNDays(30)
    }

    /// `LastNDays(90)`.
    pub fn last_90_days() -> Self {
        Self::LastNDays(90)
    }

    /// Custom window covering whole calendar days `first..=last`.
    pub fn custom_dates(first: NaiveDate, last: NaiveDate) -> Self {
        let end = last
            .succ_opt()
            .map(|d| d.and_time(NaiveTime::MIN) - TimeDelta::nanoseconds(1))
            .unwrap_or_else(|| last.and_time(NaiveTime::MIN));
        Self::Custom {
            start: first.and_time(NaiveTime::MIN),
            end,
        }
    }
}

impl Default for RangeMode {
    fn default() -> Self {
        Self::LatestFraction(Self::DEFAULT_FRACTION)
    }
}

/// Parse a timestamp from text.
///
/// Accepts RFC 3339 (converted to UTC), `YYYY-MM-DD HH:MM:SS[.f]`, `YYYY-MM-DDTHH:MM:SS[.f]`,
/// `YYYY-MM-DD HH:MM`, and the date-only forms `YYYY-MM-DD`, `YYYY/MM/DD`, `MM/DD/YYYY`,
/// `DD.MM.YYYY` (at midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Temporal view of a single cell; `None` when the cell cannot be coerced.
pub fn coerce_value(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Timestamp(t) => Some(*t),
        Value::Utf8(s) => parse_timestamp(s),
        _ => None,
    }
}

/// Return a new dataset whose `column` is `Timestamp`-typed; cells that fail coercion
/// become [`Value::Null`].
pub fn coerce_temporal(dataset: &DataSet, column: &str) -> AnalysisResult<DataSet> {
    let idx = dataset.column_index(column)?;
    let values: Vec<Value> = dataset
        .column_values(idx)
        .map(|v| coerce_value(v).map_or(Value::Null, Value::Timestamp))
        .collect();
    dataset.replace_column(column, DataType::Timestamp, values)
}

/// Resolve `mode` into a concrete [`DateRange`] over the valid timestamps of `column`.
pub fn resolve(dataset: &DataSet, column: &str, mode: &RangeMode) -> AnalysisResult<DateRange> {
    let idx = dataset.column_index(column)?;
    let mut valid: Vec<NaiveDateTime> = Vec::with_capacity(dataset.row_count());
    let mut dropped = 0usize;
    for v in dataset.column_values(idx) {
        match coerce_value(v) {
            Some(t) => valid.push(t),
            None => dropped += usize::from(!v.is_null()),
        }
    }
    if dropped > 0 {
        tracing::warn!(column, dropped, "values could not be coerced to timestamps");
    }
    if valid.is_empty() {
        return Err(AnalysisError::EmptyTemporalDomain {
            column: column.to_string(),
        });
    }
    valid.sort_unstable();
    let min = valid[0];
    let max = valid[valid.len() - 1];

    let range = match *mode {
        RangeMode::All => DateRange::new(min, max)?,
        RangeMode::LastNDays(days) => {
            let start = max
                .checked_sub_signed(TimeDelta::days(i64::from(days)))
                .ok_or_else(|| AnalysisError::InvalidRange {
                    message: format!("{days} days before {max} is out of range"),
                })?;
            DateRange::new(start, max)?
        }
        RangeMode::LatestFraction(fraction) => {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(AnalysisError::InvalidRange {
                    message: format!("fraction {fraction} must be in (0, 1]"),
                });
            }
            DateRange::new(quantile_instant(&valid, 1.0 - fraction), max)?
        }
        RangeMode::Custom { start, end } => {
            if start > end {
                return Err(AnalysisError::InvalidRange {
                    message: format!("start {start} is after end {end}"),
                });
            }
            DateRange::new(start.max(min), end.min(max)).map_err(|_| {
                AnalysisError::InvalidRange {
                    message: format!(
                        "window {start}..={end} does not overlap the data ({min}..={max})"
                    ),
                }
            })?
        }
    };

    tracing::debug!(
        column,
        start = %range.start,
        end = %range.end,
        valid = valid.len(),
        "resolved date range"
    );
    Ok(range)
}

/// Rows of `dataset` whose `column` value coerces to a timestamp inside `range`.
pub fn apply(dataset: &DataSet, column: &str, range: &DateRange) -> AnalysisResult<DataSet> {
    let idx = dataset.column_index(column)?;
    Ok(dataset.filter_rows(|row| coerce_value(&row[idx]).is_some_and(|t| range.contains(t))))
}

/// Resolve and apply in one call.
pub fn filter_by_mode(
    dataset: &DataSet,
    column: &str,
    mode: &RangeMode,
) -> AnalysisResult<(DateRange, DataSet)> {
    let range = resolve(dataset, column, mode)?;
    let subset = apply(dataset, column, &range)?;
    Ok((range, subset))
}

/// Linear-interpolation quantile of ascending timestamps, computed on offsets from the
/// first element.
fn quantile_instant(sorted: &[NaiveDateTime], q: f64) -> NaiveDateTime {
    let origin = sorted[0];
    let offsets: Vec<f64> = sorted
        .iter()
        .map(|t| micros_between(origin, *t) as f64)
        .collect();
    let offset = quantile_sorted(&offsets, q).unwrap_or(0.0);
    origin + TimeDelta::microseconds(offset.round() as i64)
}

fn micros_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    let delta = to - from;
    delta
        .num_microseconds()
        .unwrap_or_else(|| delta.num_milliseconds().saturating_mul(1_000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, Schema};

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    /// 2024-01-01..=2024-01-10 as text, plus one unparsable cell and one null.
    fn january_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("date", DataType::Utf8),
            Field::new("value", DataType::Int64),
        ]);
        let mut rows: Vec<Vec<Value>> = (1..=10)
            .map(|d| vec![Value::Utf8(format!("2024-01-{d:02}")), Value::Int64(i64::from(d))])
            .collect();
        rows.push(vec![Value::Utf8("not a date".into()), Value::Int64(99)]);
        rows.push(vec![Value::Null, Value::Int64(100)]);
        DataSet::new(schema, rows)
    }

    #[test]
    fn parse_timestamp_accepts_common_formats() {
        assert_eq!(parse_timestamp("2024-01-05"), Some(day(5)));
        assert_eq!(parse_timestamp("2024/01/05"), Some(day(5)));
        assert_eq!(parse_timestamp("01/05/2024"), Some(day(5)));
        assert_eq!(parse_timestamp("05.01.2024"), Some(day(5)));
        assert_eq!(
            parse_timestamp("2024-01-05 12:30:00"),
            Some(day(5) + TimeDelta::minutes(750))
        );
        assert_eq!(
            parse_timestamp("2024-01-05T12:30:00+02:00"),
            Some(day(5) + TimeDelta::minutes(630))
        );
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("  "), None);
    }

    #[test]
    fn all_mode_spans_min_to_max() {
        let range = resolve(&january_dataset(), "date", &RangeMode::All).unwrap();
        assert_eq!(range.start(), day(1));
        assert_eq!(range.end(), day(10));
    }

    #[test]
    fn last_n_days_counts_back_from_max() {
        let ds = january_dataset();
        let range = resolve(&ds, "date", &RangeMode::LastNDays(2)).unwrap();
        assert_eq!(range.start(), day(8));
        assert_eq!(range.end(), day(10));

        let subset = apply(&ds, "date", &range).unwrap();
        assert_eq!(subset.row_count(), 3);
        assert_eq!(subset.rows[0][1], Value::Int64(8));
    }

    #[test]
    fn presets_reach_before_the_data() {
        let range = resolve(&january_dataset(), "date", &RangeMode::last_14_days()).unwrap();
        assert_eq!(range.start(), day(10) - TimeDelta::days(14));
        assert_eq!(RangeMode::PRESET_DAYS, [14, 30, 90]);
    }

    #[test]
    fn latest_fraction_uses_interpolated_quantile() {
        let ds = january_dataset();
        let range = resolve(&ds, "date", &RangeMode::default()).unwrap();
        // q = 0.7, pos = 0.7 * 9 = 6.3 -> Jan 7 + 0.3 days
        assert_eq!(range.start(), day(7) + TimeDelta::minutes(432));
        assert_eq!(range.end(), day(10));
        assert_eq!(apply(&ds, "date", &range).unwrap().row_count(), 3);
    }

    #[test]
    fn latest_fraction_rejects_out_of_range_fraction() {
        let ds = january_dataset();
        for f in [0.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                resolve(&ds, "date", &RangeMode::LatestFraction(f)),
                Err(AnalysisError::InvalidRange { .. })
            ));
        }
        let full = resolve(&ds, "date", &RangeMode::LatestFraction(1.0)).unwrap();
        assert_eq!(full.start(), day(1));
    }

    #[test]
    fn custom_rejects_reversed_bounds() {
        let err = resolve(
            &january_dataset(),
            "date",
            &RangeMode::Custom {
                start: day(5),
                end: day(4),
            },
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRange { .. }));
    }

    #[test]
    fn custom_single_instant_selects_matching_rows() {
        let ds = january_dataset();
        let range = resolve(
            &ds,
            "date",
            &RangeMode::Custom {
                start: day(4),
                end: day(4),
            },
        )
        .unwrap();
        let subset = apply(&ds, "date", &range).unwrap();
        assert_eq!(subset.row_count(), 1);
        assert_eq!(subset.rows[0][1], Value::Int64(4));
    }

    #[test]
    fn custom_bounds_are_clamped_to_the_data() {
        let ds = january_dataset();
        let mode = RangeMode::custom_dates(
            NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        );
        let range = resolve(&ds, "date", &mode).unwrap();
        assert_eq!(range.start(), day(1));
        assert_eq!(apply(&ds, "date", &range).unwrap().row_count(), 3);

        let outside = resolve(
            &ds,
            "date",
            &RangeMode::Custom {
                start: day(20),
                end: day(25),
            },
        );
        assert!(matches!(outside, Err(AnalysisError::InvalidRange { .. })));
    }

    #[test]
    fn empty_temporal_domain_is_an_error() {
        let schema = Schema::new(vec![Field::new("date", DataType::Utf8)]);
        let ds = DataSet::new(
            schema,
            vec![vec![Value::Utf8("nope".into())], vec![Value::Null]],
        );
        assert_eq!(
            resolve(&ds, "date", &RangeMode::All),
            Err(AnalysisError::EmptyTemporalDomain {
                column: "date".to_string()
            })
        );
    }

    #[test]
    fn unknown_column_is_an_error() {
        let ds = january_dataset();
        assert!(matches!(
            resolve(&ds, "when", &RangeMode::All),
            Err(AnalysisError::UnknownColumn { .. })
        ));
        let range = DateRange::new(day(1), day(2)).unwrap();
        assert!(matches!(
            apply(&ds, "when", &range),
            Err(AnalysisError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn coerce_temporal_returns_new_typed_dataset() {
        let ds = january_dataset();
        let coerced = coerce_temporal(&ds, "date").unwrap();
        assert_eq!(coerced.field("date").unwrap().data_type, DataType::Timestamp);
        assert_eq!(coerced.rows[0][0], Value::Timestamp(day(1)));
        assert_eq!(coerced.rows[10][0], Value::Null);
        assert_eq!(coerced.row_count(), ds.row_count());
        // Source untouched.
        assert_eq!(ds.rows[0][0], Value::Utf8("2024-01-01".into()));
    }

    #[test]
    fn date_range_new_validates_order() {
        assert!(DateRange::new(day(2), day(1)).is_err());
        let r = DateRange::new(day(1), day(1)).unwrap();
        assert!(r.contains(day(1)));
        assert!(!r.contains(day(2)));
    }

    #[test]
    fn filter_by_mode_returns_range_and_subset() {
        let (range, subset) = filter_by_mode(&january_dataset(), "date", &RangeMode::All).unwrap();
        assert_eq!(range.end(), day(10));
        assert_eq!(subset.row_count(), 10);
    }
}
