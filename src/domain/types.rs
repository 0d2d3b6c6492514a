//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - built from a raw payload (`SeriesTable`)
//! - narrowed to a date-indexed series (`TimeSeries`)
//! - exported back to CSV or drawn as a chart

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::EasyDataError;

/// Column holding the observation date in every EasyData payload.
pub const DATE_COLUMN: &str = "Observation Date";
/// Column holding the observation value in every EasyData payload.
pub const VALUE_COLUMN: &str = "Observation Value";

/// Response format requested from the API (and used as the file extension).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Csv,
    Json,
}

impl ResponseFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Infer the format of a saved payload from its extension.
    pub fn from_path(path: &Path) -> Result<Self, EasyDataError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        ext.parse()
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseFormat {
    type Err = EasyDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(EasyDataError::InvalidFormat(s.to_string())),
        }
    }
}

/// One series download: which series, which window, which format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub series_id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub format: ResponseFormat,
}

impl SeriesRequest {
    pub fn new(series_id: impl Into<String>, start: NaiveDate, end: NaiveDate, format: ResponseFormat) -> Self {
        Self {
            series_id: series_id.into(),
            start,
            end,
            format,
        }
    }

    /// The id becomes part of a file name, so it must stay a single path
    /// component: non-empty, no separators, no `..`.
    pub fn validate(&self) -> Result<(), EasyDataError> {
        let id = self.series_id.as_str();
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return Err(EasyDataError::InvalidSeriesId(id.to_string()));
        }
        Ok(())
    }

    /// File name the raw payload is saved under: `{id}_{start}_{end}.{format}`.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}.{}",
            self.series_id,
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d"),
            self.format
        )
    }
}

/// A single table cell as loaded from a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Classify a raw CSV field: blank, finite number, or text.
    pub fn from_field(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::Number(v),
            _ => Self::Text(trimmed.to_string()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Tabular payload: named columns in source order plus row-major cells.
///
/// Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl SeriesTable {
    /// Build a table, padding short rows with `Cell::Empty` and truncating long ones.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of data rows (the header is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterate over one column's cells, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Schema check: every named column must be present. Returns their
    /// indices in the order asked for.
    pub fn require_columns(&self, names: &[&str]) -> Result<Vec<usize>, EasyDataError> {
        names
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| EasyDataError::MissingColumn((*name).to_string()))
            })
            .collect()
    }
}

/// One dated observation. `value` is `None` for blank / missing markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename = "Observation Date")]
    pub date: NaiveDate,
    #[serde(rename = "Observation Value")]
    pub value: Option<f64>,
}

/// A series narrowed to `(Observation Date, Observation Value)`, keyed by date.
///
/// Observations keep the row order of the table they came from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    observations: Vec<Observation>,
}

impl TimeSeries {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    /// Look up an observation by date (first match wins on duplicates).
    pub fn get(&self, date: NaiveDate) -> Option<&Observation> {
        self.observations.iter().find(|o| o.date == date)
    }

    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.observations.iter().map(|o| o.date)
    }

    /// Observations that carry a value, as `(date, value)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.observations
            .iter()
            .filter_map(|o| o.value.map(|v| (o.date, v)))
    }

    /// Earliest and latest date, regardless of row order.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.dates().min()?;
        let max = self.dates().max()?;
        Some((min, max))
    }

    /// Smallest and largest present value.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (_, v) in self.points() {
            min = min.min(v);
            max = max.max(v);
        }
        if min.is_finite() && max.is_finite() {
            Some((min, max))
        } else {
            None
        }
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}
