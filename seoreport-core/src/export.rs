// CSV export of flat record lists

use crate::error::{ReportError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

type Row = Map<String, Value>;

/// Writes record lists as `<out_dir>/<name>.csv`
#[derive(Debug, Clone)]
pub struct CsvExporter {
    out_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn csv_path(&self, name: &str) -> PathBuf {
        self.out_dir.join(format!("{}.csv", name))
    }

    /// Serialize `records` to `<out_dir>/<name>.csv`, creating the directory
    /// if needed. Columns are the union of all record keys in first-seen
    /// order; an empty list produces an empty file.
    pub fn write_csv<T: Serialize>(&self, records: &[T], name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;

        let rows = to_rows(records, name)?;
        let path = self.csv_path(name);
        let mut writer = csv::Writer::from_path(&path)?;

        if !rows.is_empty() {
            let header = header_for(&rows);
            writer.write_record(&header)?;
            for row in &rows {
                writer.write_record(header.iter().map(|key| cell(row.get(key))))?;
            }
        }
        writer.flush()?;

        debug!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(path)
    }
}

fn to_rows<T: Serialize>(records: &[T], name: &str) -> Result<Vec<Row>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| match serde_json::to_value(record)? {
            Value::Object(row) => Ok(row),
            _ => Err(ReportError::NotAnObject {
                name: name.to_string(),
                index,
            }),
        })
        .collect()
}

/// Union of keys over all rows: the first row's keys in order, then any key
/// first seen in a later row, in the order it appears.
pub fn header_for(rows: &[Row]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut header = Vec::new();
    for key in rows.iter().flat_map(|row| row.keys()) {
        if seen.insert(key.as_str()) {
            header.push(key.clone());
        }
    }
    header
}

/// Text of one CSV cell. Missing values and nulls are empty; nested values
/// are written as compact JSON.
pub fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(nested) => nested.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_header_single_shape() {
        let rows = vec![row(json!({"a": 1, "b": 2})), row(json!({"a": 3, "b": 4}))];
        assert_eq!(header_for(&rows), vec!["a", "b"]);
    }

    #[test]
    fn test_header_keeps_first_record_order() {
        let rows = vec![row(json!({"zeta": 1, "alpha": 2}))];
        assert_eq!(header_for(&rows), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_header_appends_late_keys() {
        let rows = vec![
            row(json!({"a": 1})),
            row(json!({"c": 1, "a": 2})),
            row(json!({"b": 1, "c": 2})),
        ];
        assert_eq!(header_for(&rows), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_cell_rendering() {
        assert_eq!(cell(None), "");
        assert_eq!(cell(Some(&Value::Null)), "");
        assert_eq!(cell(Some(&json!("text"))), "text");
        assert_eq!(cell(Some(&json!(true))), "true");
        assert_eq!(cell(Some(&json!(42))), "42");
        assert_eq!(cell(Some(&json!(1.5))), "1.5");
        assert_eq!(cell(Some(&json!([1, 2]))), "[1,2]");
        assert_eq!(cell(Some(&json!({"k": "v"}))), r#"{"k":"v"}"#);
    }

    #[test]
    fn test_scalar_records_are_rejected() {
        let result = to_rows(&[1, 2], "numbers");
        assert!(matches!(
            result,
            Err(ReportError::NotAnObject { index: 0, .. })
        ));
    }
}
