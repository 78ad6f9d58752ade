use chrono::{NaiveDate, NaiveDateTime};
use rust_data_quality::anomaly::{detect_with, AnomalyLabel, DetectorOptions};
use rust_data_quality::ingestion::csv::ingest_csv_inferred_from_path;
use rust_data_quality::quality::{analyze, ColumnStatistics};
use rust_data_quality::smoothing::{ewma, EwmaMode};
use rust_data_quality::time_range::{apply, coerce_temporal, filter_by_mode, resolve, RangeMode};
use rust_data_quality::types::{DataSet, DataType, Value};
use rust_data_quality::AnalysisError;

fn jan(d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn sales() -> DataSet {
    ingest_csv_inferred_from_path("tests/fixtures/daily_sales.csv").unwrap()
}

#[test]
fn quality_report_over_fixture() {
    let ds = sales();
    let report = analyze(&ds, true);

    assert_eq!(report.row_count, 10);
    assert_eq!(report.column_names, vec!["date", "sales", "region"]);
    assert_eq!(report.duplicate_rows, 0);
    assert_eq!(report.columns_with_nulls, vec!["sales"]);

    let sales_col = report.column("sales").unwrap();
    assert_eq!(sales_col.null_count, 1);
    assert_eq!(sales_col.null_percentage, 10.0);
    assert_eq!(sales_col.distinct_count, 9);
    assert_eq!(report.column("region").unwrap().distinct_count, 2);

    match report.statistics_for("region") {
        Some(ColumnStatistics::Categorical(c)) => {
            assert_eq!(c.count, 10);
            assert_eq!(c.unique, 2);
            assert_eq!(c.top, Some(Value::Utf8("north".to_string())));
            assert_eq!(c.freq, 5);
        }
        other => panic!("unexpected statistics: {other:?}"),
    }
    match report.statistics_for("sales") {
        Some(ColumnStatistics::Numeric(n)) => {
            assert_eq!(n.count, 9);
            assert_eq!(n.min, Some(10.0));
            assert_eq!(n.max, Some(100.0));
            assert_eq!(n.p50, Some(60.0));
        }
        other => panic!("unexpected statistics: {other:?}"),
    }
}

#[test]
fn messy_file_counts_duplicates_and_coerces_text_dates() {
    let ds = ingest_csv_inferred_from_path("tests/fixtures/events_messy.csv").unwrap();
    let report = analyze(&ds, false);
    assert_eq!(report.duplicate_rows, 1);
    assert_eq!(report.columns_with_nulls, vec!["amount"]);
    // numeric columns only
    assert_eq!(report.statistics.len(), 1);

    let coerced = coerce_temporal(&ds, "when").unwrap();
    assert_eq!(coerced.field("when").unwrap().data_type, DataType::Timestamp);
    assert_eq!(coerced.rows[2][0], Value::Null);
    // the source dataset keeps its text column
    assert_eq!(ds.rows[2][0], Value::Utf8("not a date".to_string()));

    let range = resolve(&ds, "when", &RangeMode::All).unwrap();
    let window = apply(&ds, "when", &range).unwrap();
    assert_eq!(window.row_count(), 4);
}

#[test]
fn last_n_days_window_then_smooth() {
    let ds = sales();
    let range = resolve(&ds, "date", &RangeMode::LastNDays(2)).unwrap();
    assert_eq!((range.start(), range.end()), (jan(8), jan(10)));

    let window = apply(&ds, "date", &range).unwrap();
    assert_eq!(window.row_count(), 3);

    let smoothed = ewma(&window, "sales", EwmaMode::Alpha(0.5)).unwrap();
    assert_eq!(smoothed.values, vec![Some(80.0), Some(85.0), Some(92.5)]);
}

#[test]
fn default_view_is_latest_thirty_percent() {
    let ds = sales();
    let (range, window) = filter_by_mode(&ds, "date", &RangeMode::default()).unwrap();
    // 0.7 quantile of days 1..=10 is day 7.3
    assert!(range.start() > jan(7) && range.start() < jan(8));
    assert_eq!(range.end(), jan(10));
    assert_eq!(window.row_count(), 3);
}

#[test]
fn custom_single_day_selects_that_day() {
    let ds = sales();
    let mode = RangeMode::Custom {
        start: jan(4),
        end: jan(4),
    };
    let window = apply(&ds, "date", &resolve(&ds, "date", &mode).unwrap()).unwrap();
    assert_eq!(window.row_count(), 1);
    assert_eq!(window.rows[0][1], Value::Null);

    let reversed = RangeMode::Custom {
        start: jan(5),
        end: jan(4),
    };
    assert!(matches!(
        resolve(&ds, "date", &reversed),
        Err(AnalysisError::InvalidRange { .. })
    ));
}

#[test]
fn smoothing_carries_level_across_gap() {
    let ds = sales();
    let smoothed = ewma(&ds, "sales", EwmaMode::Alpha(1.0)).unwrap();
    assert_eq!(smoothed.len(), 10);
    assert_eq!(smoothed.values[3], Some(30.0));
    assert_eq!(smoothed.values[4], Some(50.0));

    let err = ewma(&ds, "region", EwmaMode::Span(3.0)).unwrap_err();
    assert!(matches!(err, AnalysisError::NotNumeric { .. }));
}

#[test]
fn anomaly_labels_align_with_windowed_rows() {
    let ds = sales();
    let opts = DetectorOptions {
        contamination: 0.1,
        seed: Some(99),
        ..Default::default()
    };
    let result = detect_with(&ds, "sales", &opts).unwrap();
    assert_eq!(result.labels.len(), ds.row_count());
    assert_eq!(result.labels[3], AnomalyLabel::NotEvaluable);
    assert_eq!(result.evaluable_count(), 9);
    assert!(result.anomaly_count() <= 1);
}

#[test]
fn unknown_columns_are_reported() {
    let ds = sales();
    let unknown = AnalysisError::UnknownColumn {
        column: "revenue".to_string(),
    };
    assert_eq!(
        resolve(&ds, "revenue", &RangeMode::All).unwrap_err(),
        unknown
    );
    assert_eq!(
        ewma(&ds, "revenue", EwmaMode::Alpha(0.5)).unwrap_err(),
        unknown
    );
}
