// Tests for CSV export

use seoreport_core::CsvExporter;
use seoreport_core::ReportError;
use serde::Serialize;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[derive(Serialize)]
struct Pair {
    a: i32,
    b: i32,
}

#[test]
fn test_write_csv_basic() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let out_dir = temp_dir.path().join("out");
    let exporter = CsvExporter::new(&out_dir);

    let path = exporter.write_csv(&[Pair { a: 1, b: 2 }, Pair { a: 3, b: 4 }], "x")?;

    assert_eq!(path, out_dir.join("x.csv"));
    assert_eq!(fs::read_to_string(&path)?, "a,b\n1,2\n3,4\n");
    Ok(())
}

#[test]
fn test_write_csv_creates_nested_directories() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let out_dir = temp_dir.path().join("reports").join("2024");
    let exporter = CsvExporter::new(&out_dir);

    exporter.write_csv(&[json!({"a": 1})], "nested")?;

    assert!(out_dir.join("nested.csv").exists());
    Ok(())
}

#[test]
fn test_write_csv_existing_directory_and_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let exporter = CsvExporter::new(temp_dir.path());

    exporter.write_csv(&[json!({"a": 1}), json!({"a": 2})], "again")?;
    let path = exporter.write_csv(&[json!({"a": 9})], "again")?;

    assert_eq!(fs::read_to_string(path)?, "a\n9\n");
    Ok(())
}

#[test]
fn test_write_csv_empty_records() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let exporter = CsvExporter::new(temp_dir.path());

    let records: Vec<Pair> = Vec::new();
    let path = exporter.write_csv(&records, "empty")?;

    assert!(path.exists());
    assert_eq!(fs::read_to_string(path)?, "");
    Ok(())
}

#[test]
fn test_write_csv_heterogeneous_records() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let exporter = CsvExporter::new(temp_dir.path());

    let records = vec![
        json!({"keyword": "rust", "position": 3}),
        json!({"keyword": "csv", "url": "https://example.com/csv", "position": ">100"}),
        json!({"keyword": "serde", "position": null}),
    ];
    let path = exporter.write_csv(&records, "mixed")?;

    assert_eq!(
        fs::read_to_string(path)?,
        "keyword,position,url\n\
         rust,3,\n\
         csv,>100,https://example.com/csv\n\
         serde,,\n"
    );
    Ok(())
}

#[test]
fn test_write_csv_quotes_special_characters() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let exporter = CsvExporter::new(temp_dir.path());

    let records = vec![json!({"keyword": "shoes, red", "note": "say \"hi\""})];
    let path = exporter.write_csv(&records, "quoted")?;

    assert_eq!(
        fs::read_to_string(path)?,
        "keyword,note\n\"shoes, red\",\"say \"\"hi\"\"\"\n"
    );
    Ok(())
}

#[test]
fn test_write_csv_rejects_non_objects() {
    let temp_dir = TempDir::new().unwrap();
    let exporter = CsvExporter::new(temp_dir.path());

    let result = exporter.write_csv(&["plain", "strings"], "bad");

    assert!(matches!(result, Err(ReportError::NotAnObject { .. })));
}
