//! Formatted terminal output.
//!
//! We keep formatting code in one place so output changes are localized.

use std::path::Path;

use crate::domain::{SeriesRequest, SeriesTable, TimeSeries};

/// Header describing a completed download.
pub fn format_fetch_summary(request: &SeriesRequest, table: &SeriesTable, saved_to: &Path) -> String {
    let mut out = String::new();
    out.push_str("=== easydata - series download ===\n");
    out.push_str(&format!("Series: {}\n", request.series_id));
    out.push_str(&format!("Window: {} .. {}\n", request.start, request.end));
    out.push_str(&format!("Format: {}\n", request.format));
    out.push_str(&format!("Saved: {}\n", saved_to.display()));
    out.push_str(&format!("Rows: {}\n", table.len()));
    out.push_str(&format!("Columns: {}\n", table.columns().join(", ")));
    out
}

/// Summary line plus the first `limit` observations as a two-column table.
pub fn format_series(series: &TimeSeries, limit: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("Observations: {}", series.len()));
    if let Some((lo, hi)) = series.date_range() {
        out.push_str(&format!(" ({lo} .. {hi})"));
    }
    out.push('\n');

    if series.is_empty() || limit == 0 {
        return out;
    }

    out.push_str(&format!("{:<16} {:>18}\n", "Observation Date", "Observation Value"));
    for obs in series.iter().take(limit) {
        let value = obs.value.map(|v| format!("{v:.4}")).unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("{:<16} {:>18}\n", obs.date.to_string(), value));
    }
    if series.len() > limit {
        out.push_str(&format!("... {} more\n", series.len() - limit));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cell, Observation, ResponseFormat};
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, day).unwrap()
    }

    #[test]
    fn fetch_summary_lists_request_and_shape() {
        let req = SeriesRequest::new("123", d(1), d(2), ResponseFormat::Csv);
        let table = SeriesTable::new(
            vec!["Observation Date".into(), "Observation Value".into()],
            vec![vec![Cell::Text("2023-01-01".into()), Cell::Number(10.0)]],
        );
        let txt = format_fetch_summary(&req, &table, Path::new("./123_2023-01-01_2023-01-02.csv"));
        assert!(txt.contains("Series: 123\n"));
        assert!(txt.contains("Window: 2023-01-01 .. 2023-01-02\n"));
        assert!(txt.contains("Rows: 1\n"));
        assert!(txt.contains("Columns: Observation Date, Observation Value\n"));
    }

    #[test]
    fn series_table_truncates() {
        let series = TimeSeries::new(vec![
            Observation { date: d(1), value: Some(10.0) },
            Observation { date: d(2), value: None },
            Observation { date: d(3), value: Some(12.5) },
        ]);
        let txt = format_series(&series, 2);
        let expected = concat!(
            "Observations: 3 (2023-01-01 .. 2023-01-03)\n",
            "Observation Date  Observation Value\n",
            "2023-01-01                  10.0000\n",
            "2023-01-02                        -\n",
            "... 1 more\n",
        );
        assert_eq!(txt, expected);
    }
}
