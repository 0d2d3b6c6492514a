//! Payload parsing: CSV / JSON text -> `SeriesTable`.
//!
//! CSV is read with a header row. JSON accepts the three table layouts that
//! tabular readers commonly emit:
//!
//! - records: `[{"col": v, ...}, ...]`
//! - split:   `{"columns": [...], "data": [[...], ...]}` (`rows` also accepted)
//! - columns: `{"col": {"0": v, ...}, ...}`

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{Cell, ResponseFormat, SeriesTable};
use crate::error::EasyDataError;

/// Parse a payload body according to its declared format.
pub fn parse_payload(body: &str, format: ResponseFormat) -> Result<SeriesTable, EasyDataError> {
    let table = match format {
        ResponseFormat::Csv => parse_csv(body)?,
        ResponseFormat::Json => parse_json(body)?,
    };
    debug!(
        format = %format,
        columns = table.columns().len(),
        rows = table.len(),
        "parsed payload"
    );
    Ok(table)
}

/// Re-load a previously saved payload from disk.
pub fn load_saved(path: &Path, format: ResponseFormat) -> Result<SeriesTable, EasyDataError> {
    let body = fs::read_to_string(path).map_err(|e| EasyDataError::io(path, e))?;
    parse_payload(&body, format)
}

pub fn parse_csv(body: &str) -> Result<SeriesTable, EasyDataError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| EasyDataError::Parse(format!("Failed to read CSV headers: {e}")))?;
    let columns: Vec<String> = headers.iter().map(normalize_header_name).collect();
    if columns.is_empty() || columns.iter().all(String::is_empty) {
        return Err(EasyDataError::Parse("CSV payload has no header row.".to_string()));
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header, lines are 1-based.
        let record = result.map_err(|e| EasyDataError::Parse(format!("CSV line {}: {e}", idx + 2)))?;
        rows.push(record.iter().map(Cell::from_field).collect());
    }

    Ok(SeriesTable::new(columns, rows))
}

fn normalize_header_name(name: &str) -> String {
    // UTF-8 exports sometimes carry a BOM on the first header, which would
    // otherwise make "Observation Date" look missing.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

pub fn parse_json(body: &str) -> Result<SeriesTable, EasyDataError> {
    let value: Value = serde_json::from_str(body.trim_start_matches('\u{feff}'))
        .map_err(|e| EasyDataError::Parse(format!("Invalid JSON: {e}")))?;

    match value {
        Value::Array(items) => from_records(items),
        Value::Object(obj) if obj.contains_key("columns") => from_split(obj),
        Value::Object(obj) => from_columns(obj),
        other => Err(EasyDataError::Parse(format!(
            "Unsupported JSON payload: expected an array or object, got {}",
            json_kind(&other)
        ))),
    }
}

fn from_records(items: Vec<Value>) -> Result<SeriesTable, EasyDataError> {
    let mut columns: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(items.len());

    for (idx, item) in items.into_iter().enumerate() {
        let Value::Object(record) = item else {
            return Err(EasyDataError::Parse(format!("JSON record {idx} is not an object")));
        };
        for key in record.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        records.push(record);
    }

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| record.get(c).map(json_cell).unwrap_or(Cell::Empty))
                .collect()
        })
        .collect();

    Ok(SeriesTable::new(columns, rows))
}

fn from_split(mut obj: Map<String, Value>) -> Result<SeriesTable, EasyDataError> {
    let columns = match obj.remove("columns") {
        Some(Value::Array(cols)) => cols
            .into_iter()
            .map(|c| match c {
                Value::String(s) => Ok(s),
                other => Err(EasyDataError::Parse(format!(
                    "JSON column name must be a string, got {}",
                    json_kind(&other)
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(EasyDataError::Parse("JSON `columns` must be an array".to_string())),
    };

    let data = obj.remove("data").or_else(|| obj.remove("rows"));
    let Some(Value::Array(data)) = data else {
        return Err(EasyDataError::Parse(
            "JSON payload with `columns` needs a `data` (or `rows`) array".to_string(),
        ));
    };

    let mut rows = Vec::with_capacity(data.len());
    for (idx, row) in data.into_iter().enumerate() {
        let Value::Array(cells) = row else {
            return Err(EasyDataError::Parse(format!("JSON row {idx} is not an array")));
        };
        rows.push(cells.iter().map(json_cell).collect());
    }

    Ok(SeriesTable::new(columns, rows))
}

fn from_columns(obj: Map<String, Value>) -> Result<SeriesTable, EasyDataError> {
    // Row labels in first-seen order across all columns.
    let mut labels: Vec<String> = Vec::new();
    let mut columns = Vec::with_capacity(obj.len());
    let mut cols = Vec::with_capacity(obj.len());

    for (name, column) in obj {
        let cells = match column {
            Value::Object(cells) => cells,
            other => {
                return Err(EasyDataError::Parse(format!(
                    "JSON column `{name}` must map row labels to values, got {}",
                    json_kind(&other)
                )));
            }
        };
        for label in cells.keys() {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
        columns.push(name);
        cols.push(cells);
    }

    let rows = labels
        .iter()
        .map(|label| {
            cols.iter()
                .map(|cells| cells.get(label).map(json_cell).unwrap_or(Cell::Empty))
                .collect()
        })
        .collect();

    Ok(SeriesTable::new(columns, rows))
}

fn json_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Empty,
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).map_or(Cell::Empty, Cell::Number),
        Value::String(s) => Cell::from_field(s),
        Value::Bool(b) => Cell::Text(b.to_string()),
        nested => Cell::Text(nested.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
