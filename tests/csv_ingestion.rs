use chrono::NaiveDate;
use rust_data_quality::ingestion::csv::{
    ingest_csv_from_path, ingest_csv_from_reader, ingest_csv_inferred_from_path,
    ingest_csv_inferred_from_reader,
};
use rust_data_quality::types::{DataType, Field, Schema, Value};

fn people_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Int64),
        Field::new("name", DataType::Utf8),
        Field::new("score", DataType::Float64),
        Field::new("active", DataType::Bool),
    ])
}

fn reader(input: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes())
}

#[test]
fn ingest_csv_from_path_happy_path() {
    let schema = people_schema();
    let ds = ingest_csv_from_path("tests/fixtures/people.csv", &schema).unwrap();

    assert_eq!(ds.row_count(), 2);
    assert_eq!(
        ds.rows[0],
        vec![
            Value::Int64(1),
            Value::Utf8("Ada".to_string()),
            Value::Float64(98.5),
            Value::Bool(true),
        ]
    );
}

#[test]
fn ingest_csv_allows_reordered_columns() {
    let schema = people_schema();
    let ds = ingest_csv_from_reader(&mut reader("name,id,active,score\nAda,1,true,98.5\n"), &schema)
        .unwrap();
    assert_eq!(ds.row_count(), 1);
    assert_eq!(ds.rows[0][0], Value::Int64(1));
    assert_eq!(ds.rows[0][1], Value::Utf8("Ada".to_string()));
}

#[test]
fn ingest_csv_errors_on_missing_required_column() {
    let schema = people_schema();
    let err = ingest_csv_from_reader(&mut reader("id,name,score\n1,Ada,98.5\n"), &schema)
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("missing required column 'active'"));
}

#[test]
fn ingest_csv_errors_on_type_parse() {
    let schema = people_schema();
    let err = ingest_csv_from_reader(
        &mut reader("id,name,score,active\nnot_an_int,Ada,98.5,true\n"),
        &schema,
    )
    .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("failed to parse value"));
    assert!(msg.contains("row 2"));
    assert!(msg.contains("column 'id'"));
}

#[test]
fn ingest_csv_parses_timestamp_columns() {
    let schema = Schema::new(vec![
        Field::new("date", DataType::Timestamp),
        Field::new("sales", DataType::Int64),
    ]);
    let ds = ingest_csv_from_path("tests/fixtures/daily_sales.csv", &schema).unwrap();
    assert_eq!(ds.row_count(), 10);
    let first = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(ds.rows[0][0], Value::Timestamp(first));
    assert_eq!(ds.rows[3][1], Value::Null);
}

#[test]
fn inferred_ingestion_picks_column_types() {
    let ds = ingest_csv_inferred_from_path("tests/fixtures/daily_sales.csv").unwrap();
    let types: Vec<DataType> = ds.schema.fields.iter().map(|f| f.data_type).collect();
    assert_eq!(
        types,
        vec![DataType::Timestamp, DataType::Int64, DataType::Utf8]
    );
    assert_eq!(ds.rows[9][1], Value::Int64(100));
}

#[test]
fn inferred_ingestion_falls_back_to_text_and_reads_null_markers() {
    let ds = ingest_csv_inferred_from_path("tests/fixtures/events_messy.csv").unwrap();
    assert_eq!(ds.field("when").unwrap().data_type, DataType::Utf8);
    assert_eq!(ds.field("amount").unwrap().data_type, DataType::Float64);
    assert_eq!(ds.rows[1][1], Value::Null);
}

#[test]
fn inferred_ingestion_pads_short_records() {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader("a,b\n1,x\n2\n".as_bytes());
    let ds = ingest_csv_inferred_from_reader(&mut rdr).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.rows[1], vec![Value::Int64(2), Value::Null]);
}

#[test]
fn inferred_file_ingestion_pads_short_rows() {
    let ds = ingest_csv_inferred_from_path("tests/fixtures/short_rows.csv").unwrap();
    assert_eq!(ds.row_count(), 3);
    assert_eq!(ds.field("reading").unwrap().data_type, DataType::Float64);
    assert_eq!(
        ds.rows[1],
        vec![Value::Int64(2), Value::Float64(3.0), Value::Null]
    );
    assert_eq!(ds.rows[2], vec![Value::Int64(3), Value::Null, Value::Null]);
}
