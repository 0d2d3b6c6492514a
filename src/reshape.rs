//! Table -> time series.
//!
//! `to_time_series` keeps only the date and value columns, parses dates, and
//! returns a fresh [`TimeSeries`] in the table's row order. The input table is
//! left untouched.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::{Cell, DATE_COLUMN, Observation, SeriesTable, TimeSeries, VALUE_COLUMN};
use crate::error::EasyDataError;

pub fn to_time_series(table: &SeriesTable) -> Result<TimeSeries, EasyDataError> {
    let idx = table.require_columns(&[DATE_COLUMN, VALUE_COLUMN])?;
    let (date_idx, value_idx) = (idx[0], idx[1]);

    let mut observations = Vec::with_capacity(table.len());
    for (idx, row) in table.rows().iter().enumerate() {
        // Data rows are reported 1-based.
        let row_no = idx + 1;
        let date = parse_date(&row[date_idx]).ok_or_else(|| EasyDataError::DateParse {
            row: row_no,
            value: row[date_idx].to_string(),
        })?;
        let value = parse_value(&row[value_idx]).map_err(|()| EasyDataError::ValueParse {
            row: row_no,
            value: row[value_idx].to_string(),
        })?;
        observations.push(Observation { date, value });
    }

    Ok(TimeSeries::new(observations))
}

fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    let s = cell.as_text()?;
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    // Some JSON exports carry full timestamps; the date part is what matters.
    const DATETIME_FMTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    DATETIME_FMTS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// `Ok(None)` for missing values, `Err(())` for text that is not a number.
fn parse_value(cell: &Cell) -> Result<Option<f64>, ()> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Number(v) => Ok(Some(*v)),
        Cell::Text(s) if s == "." || s == "-" => Ok(None),
        Cell::Text(s) => {
            // Thousands separators, e.g. "1,234.5".
            let v = s.replace(',', "").parse::<f64>().map_err(|_| ())?;
            if v.is_finite() { Ok(Some(v)) } else { Err(()) }
        }
    }
}
