//! Integration tests
//!
//! Tests the full end-to-end flow: Parquet file → schema discovery → row
//! assembly → JSON / NDJSON file, plus the CLI surface.

use arrow::array::{
    ArrayRef, Float32Array, Float64Array, Int32Array, LargeStringArray, StringArray, UInt32Array,
};
use arrow::datatypes::{DataType, Field, Schema as ArrowSchema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tab2json::cli::{Cli, Runner};
use tab2json::{
    convert, discover_schema, ConvertConfig, Error, NumberEncoding, OutputFormat, ParquetStore,
    Strategy, TabularStore, TypeTag,
};
use tempfile::tempdir;
use test_case::test_case;

// ============================================================================
// Fixtures
// ============================================================================

fn write_parquet(path: &Path, batch: &RecordBatch) {
    let props = WriterProperties::builder()
        .set_max_row_group_size(64)
        .build();
    let file = File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props)).unwrap();
    writer.write(batch).unwrap();
    writer.close().unwrap();
}

fn worked_example_batch() -> RecordBatch {
    let schema = Arc::new(ArrowSchema::new(vec![
        Field::new("id", DataType::Int32, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("score", DataType::Float64, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int32Array::from(vec![1, 2, 3])),
        Arc::new(StringArray::from(vec!["a", "b", "c"])),
        Arc::new(Float64Array::from(vec![0.5, 1.5, 2.5])),
    ];
    RecordBatch::try_new(schema, columns).unwrap()
}

/// Every supported type, with a field order that is not alphabetical
fn all_types_batch(rows: usize) -> RecordBatch {
    let schema = Arc::new(ArrowSchema::new(vec![
        Field::new("weight", DataType::Float64, false),
        Field::new("label", DataType::Utf8, false),
        Field::new("count", DataType::UInt32, false),
        Field::new("delta", DataType::Int32, false),
        Field::new("note", DataType::LargeUtf8, false),
    ]));

    let weights: Vec<f64> = (0..rows).map(|i| i as f64 * 0.25 - 3.0).collect();
    let labels: Vec<String> = (0..rows).map(|i| format!("label \"{i}\"\n")).collect();
    let counts: Vec<u32> = (0..rows).map(|i| u32::MAX - i as u32).collect();
    let deltas: Vec<i32> = (0..rows).map(|i| i32::MIN + i as i32).collect();
    let notes: Vec<String> = (0..rows).map(|i| format!("ñote-{i}")).collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(weights)),
        Arc::new(StringArray::from(labels)),
        Arc::new(UInt32Array::from(counts)),
        Arc::new(Int32Array::from(deltas)),
        Arc::new(LargeStringArray::from(notes)),
    ];
    RecordBatch::try_new(schema, columns).unwrap()
}

fn expected_all_types(i: usize) -> serde_json::Value {
    json!({
        "weight": i as f64 * 0.25 - 3.0,
        "label": format!("label \"{i}\"\n"),
        "count": u32::MAX - i as u32,
        "delta": i32::MIN + i as i32,
        "note": format!("ñote-{i}"),
    })
}

fn read_objects(path: &Path, format: OutputFormat) -> Vec<serde_json::Value> {
    let text = std::fs::read_to_string(path).unwrap();
    match format {
        OutputFormat::Array => serde_json::from_str(&text).unwrap(),
        OutputFormat::Ndjson => text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect(),
    }
}

/// Keys of a JSON object in document order
fn key_order(line: &str) -> Vec<String> {
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(line).unwrap();
    let mut keys: Vec<(usize, String)> = map
        .into_iter()
        .map(|(k, _)| (line.find(&format!("\"{k}\":")).unwrap(), k))
        .collect();
    keys.sort();
    keys.into_iter().map(|(_, k)| k).collect()
}

// ============================================================================
// End-to-end Conversion Tests
// ============================================================================

#[test_case(OutputFormat::Array, Strategy::Batch)]
#[test_case(OutputFormat::Array, Strategy::Streaming)]
#[test_case(OutputFormat::Ndjson, Strategy::Batch)]
#[test_case(OutputFormat::Ndjson, Strategy::Streaming)]
fn test_parquet_round_trip(format: OutputFormat, strategy: Strategy) {
    let dir = tempdir().unwrap();
    let input = dir.path().join("data.parquet");
    let output = dir.path().join("out");
    write_parquet(&input, &all_types_batch(200));

    let store = ParquetStore::open_with_batch_size("data", &input, 16).unwrap();
    let config = ConvertConfig::new()
        .with_format(format)
        .with_strategy(strategy)
        .with_output(&output);
    let report = convert(&store, &config).unwrap();

    assert_eq!(report.records, store.record_count());
    let objects = read_objects(&output, format);
    assert_eq!(objects.len(), 200);
    for (i, object) in objects.iter().enumerate() {
        assert_eq!(object, &expected_all_types(i));
    }
}

#[test]
fn test_streaming_array_over_many_batches() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("wide.parquet");
    let output = dir.path().join("wide.json");

    let rows = 3000_u32;
    let schema = Arc::new(ArrowSchema::new(vec![
        Field::new("u", DataType::UInt32, false),
        Field::new("s", DataType::Utf8, false),
        Field::new("i", DataType::Int32, false),
        Field::new("f", DataType::Float64, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(UInt32Array::from((0..rows).map(|r| r * 3).collect::<Vec<_>>())),
        Arc::new(StringArray::from(
            (0..rows).map(|r| format!("s{r}")).collect::<Vec<_>>(),
        )),
        Arc::new(Int32Array::from(
            (0..rows).map(|r| -(r as i32)).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            (0..rows).map(|r| f64::from(r) * 0.25).collect::<Vec<_>>(),
        )),
    ];
    write_parquet(&input, &RecordBatch::try_new(schema, columns).unwrap());

    let store = ParquetStore::open_with_batch_size("wide", &input, 100).unwrap();
    let config = ConvertConfig::new()
        .with_strategy(Strategy::Streaming)
        .with_output(&output);
    let report = convert(&store, &config).unwrap();
    assert_eq!(report.records, 3000);

    let objects = read_objects(&output, OutputFormat::Array);
    assert_eq!(objects.len(), 3000);
    assert_eq!(objects[0], json!({"u": 0, "s": "s0", "i": 0, "f": 0.0}));
    assert_eq!(
        objects[2999],
        json!({"u": 8997, "s": "s2999", "i": -2999, "f": 749.75})
    );
}

#[test]
fn test_worked_example_array_text() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("scores.parquet");
    let output = dir.path().join("scores.json");
    write_parquet(&input, &worked_example_batch());

    let store = ParquetStore::open("scores", &input).unwrap();
    convert(&store, &ConvertConfig::new().with_output(&output)).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    let compact: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        serde_json::to_string(&compact).unwrap(),
        r#"[{"id":1,"name":"a","score":0.5},{"id":2,"name":"b","score":1.5},{"id":3,"name":"c","score":2.5}]"#
    );
    assert!(text.starts_with("[\n  {\n    \"id\": 1,\n    \"name\": \"a\",\n"));
}

#[test]
fn test_worked_example_ndjson_text() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("scores.parquet");
    let output = dir.path().join("scores.ndjson");
    write_parquet(&input, &worked_example_batch());

    let store = ParquetStore::open("scores", &input).unwrap();
    let config = ConvertConfig::new()
        .with_format(OutputFormat::Ndjson)
        .with_output(&output);
    convert(&store, &config).unwrap();

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "{\"id\":1,\"name\":\"a\",\"score\":0.5}\n\
         {\"id\":2,\"name\":\"b\",\"score\":1.5}\n\
         {\"id\":3,\"name\":\"c\",\"score\":2.5}\n"
    );
}

#[test_case(Strategy::Batch)]
#[test_case(Strategy::Streaming)]
fn test_field_order_fidelity(strategy: Strategy) {
    let dir = tempdir().unwrap();
    let input = dir.path().join("data.parquet");
    let output = dir.path().join("out.ndjson");
    write_parquet(&input, &all_types_batch(10));

    let store = ParquetStore::open("data", &input).unwrap();
    let config = ConvertConfig::new()
        .with_format(OutputFormat::Ndjson)
        .with_strategy(strategy)
        .with_output(&output);
    convert(&store, &config).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    for line in text.lines() {
        assert_eq!(
            key_order(line),
            vec!["weight", "label", "count", "delta", "note"]
        );
    }
}

#[test]
fn test_numbers_as_strings_mode() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("scores.parquet");
    let output = dir.path().join("legacy.ndjson");
    write_parquet(&input, &worked_example_batch());

    let store = ParquetStore::open("scores", &input).unwrap();
    let config = ConvertConfig::new()
        .with_format(OutputFormat::Ndjson)
        .with_numbers(NumberEncoding::String)
        .with_output(&output);
    convert(&store, &config).unwrap();

    let objects = read_objects(&output, OutputFormat::Ndjson);
    assert_eq!(objects[2], json!({"id": "3", "name": "c", "score": "2.5"}));
}

#[test]
fn test_array_output_idempotent() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("data.parquet");
    write_parquet(&input, &all_types_batch(150));
    let store = ParquetStore::open("data", &input).unwrap();

    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    convert(&store, &ConvertConfig::new().with_output(&first)).unwrap();
    convert(&store, &ConvertConfig::new().with_output(&second)).unwrap();

    assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
}

#[test_case(OutputFormat::Array)]
#[test_case(OutputFormat::Ndjson)]
fn test_unsupported_type_fails_fast(format: OutputFormat) {
    let dir = tempdir().unwrap();
    let input = dir.path().join("f32.parquet");
    let output = dir.path().join("out");

    let schema = Arc::new(ArrowSchema::new(vec![
        Field::new("id", DataType::Int32, false),
        Field::new("pt", DataType::Float32, false),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(vec![1])) as ArrayRef,
            Arc::new(Float32Array::from(vec![1.5_f32])) as ArrayRef,
        ],
    )
    .unwrap();
    write_parquet(&input, &batch);

    let store = ParquetStore::open("t", &input).unwrap();
    let config = ConvertConfig::new().with_format(format).with_output(&output);
    let err = convert(&store, &config).unwrap_err();

    assert!(matches!(err, Error::UnsupportedType { ref field, ref type_name }
        if field == "pt" && type_name == "Float32"));
    assert!(!output.exists());
}

#[test]
fn test_discover_schema_from_parquet() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("data.parquet");
    write_parquet(&input, &all_types_batch(3));

    let store = ParquetStore::open("data", &input).unwrap();
    let schema = discover_schema(&store).unwrap();

    let tags: Vec<TypeTag> = schema.fields().iter().map(|f| f.tag()).collect();
    assert_eq!(
        tags,
        vec![
            TypeTag::Float64,
            TypeTag::String,
            TypeTag::UInt32,
            TypeTag::Int32,
            TypeTag::String,
        ]
    );
}

// ============================================================================
// CLI Tests
// ============================================================================

#[test]
fn test_cli_requires_both_arguments() {
    assert!(Cli::try_parse_from(["tab2json"]).is_err());
    assert!(Cli::try_parse_from(["tab2json", "data.parquet"]).is_err());
    assert!(Cli::try_parse_from(["tab2json", "data.parquet", "DecayTree"]).is_ok());
}

#[test]
fn test_cli_flags_override_config_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("tab2json.yaml");
    std::fs::write(&config_path, "format: ndjson\nnumbers: string\nbatch_size: 32\n").unwrap();

    let cli = Cli::try_parse_from([
        "tab2json",
        "data.parquet",
        "t",
        "--config",
        config_path.to_str().unwrap(),
        "--numbers",
        "number",
        "--strategy",
        "batch",
    ])
    .unwrap();

    let config = cli.convert_config().unwrap();
    assert_eq!(config.format, OutputFormat::Ndjson);
    assert_eq!(config.numbers, NumberEncoding::Number);
    assert_eq!(config.effective_strategy(), Strategy::Batch);
    assert_eq!(config.batch_size, 32);
}

#[test]
fn test_runner_converts_directory_input() {
    let dir = tempdir().unwrap();
    write_parquet(&dir.path().join("scores.parquet"), &worked_example_batch());
    let output = dir.path().join("scores.json");

    let cli = Cli::try_parse_from([
        "tab2json",
        dir.path().to_str().unwrap(),
        "scores",
        "-o",
        output.to_str().unwrap(),
    ])
    .unwrap();
    let report = Runner::new(cli).convert().unwrap();

    assert_eq!(report.records, 3);
    assert_eq!(report.output, output);
    assert_eq!(read_objects(&output, OutputFormat::Array).len(), 3);
}

#[test]
fn test_runner_describe() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("scores.parquet");
    write_parquet(&input, &worked_example_batch());

    let cli = Cli::try_parse_from(["tab2json", input.to_str().unwrap(), "scores", "--schema"])
        .unwrap();
    let runner = Runner::new(cli);
    let schema = runner.describe().unwrap();

    assert_eq!(
        serde_json::to_value(&schema).unwrap(),
        json!({
            "table": "scores",
            "records": 3,
            "fields": [
                {"name": "id", "type": "int32"},
                {"name": "name", "type": "string"},
                {"name": "score", "type": "float64"}
            ]
        })
    );
    runner.run().unwrap();
}

#[test]
fn test_runner_open_error_creates_no_output() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out.json");

    let cli = Cli::try_parse_from([
        "tab2json",
        dir.path().join("missing.parquet").to_str().unwrap(),
        "t",
        "-o",
        output.to_str().unwrap(),
    ])
    .unwrap();
    let err = Runner::new(cli).run().unwrap_err();

    assert!(matches!(err, Error::Open { .. }));
    assert!(!output.exists());
}

#[test]
fn test_runner_rejects_empty_table_name() {
    let cli = Cli::try_parse_from(["tab2json", "data.parquet", ""]).unwrap();
    let err = Runner::new(cli).run().unwrap_err();
    assert!(matches!(err, Error::Usage { .. }));
}
