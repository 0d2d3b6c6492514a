//! Line-chart rendering for a [`TimeSeries`].
//!
//! - `ascii`: deterministic terminal chart (stdout)
//! - `svg`: Plotters SVG file
//!
//! Both draw observation value against observation date. A series with no
//! values fails fast with [`EasyDataError::EmptySeries`] instead of producing
//! a blank chart.

use chrono::{Datelike, NaiveDate};
use plotters::style::RGBColor;

use crate::domain::TimeSeries;
use crate::error::EasyDataError;

pub mod ascii;
pub mod svg;

pub use ascii::render_ascii;
pub use svg::render_svg;

/// Chart text and colours.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub line_color: RGBColor,
    pub line_width: u32,
    pub grid_color: RGBColor,
    pub background: RGBColor,
    pub size: (u32, u32),
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            title: "Time-Series Graph".to_string(),
            x_label: "Date".to_string(),
            y_label: "Observation Value".to_string(),
            line_color: RGBColor(0, 0, 255),
            line_width: 2,
            grid_color: RGBColor(0xC8, 0xC8, 0xC8),
            background: RGBColor(0xF0, 0xF0, 0xF0),
            size: (1000, 600),
        }
    }
}

/// Plot-ready view of a series: `(day number, value)` points plus bounds.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlotData {
    pub points: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl PlotData {
    /// Points in row order; observations without a value are skipped.
    pub fn from_series(series: &TimeSeries) -> Result<Self, EasyDataError> {
        let points: Vec<(f64, f64)> = series.points().map(|(d, v)| (date_to_x(d), v)).collect();
        if points.is_empty() {
            return Err(EasyDataError::EmptySeries);
        }

        let (x_min, x_max) = min_max(points.iter().map(|p| p.0));
        let (y_min, y_max) = min_max(points.iter().map(|p| p.1));
        let (x0, x1) = widen_if_flat(x_min, x_max, 1.0);
        let (y0, y1) = pad_range(y_min, y_max, 0.05);

        Ok(Self {
            points,
            x_bounds: [x0, x1],
            y_bounds: [y0, y1],
        })
    }
}

pub(crate) fn date_to_x(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

pub(crate) fn x_to_date(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// Tick label for an x position.
pub(crate) fn fmt_date_tick(x: f64) -> String {
    x_to_date(x).map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

pub(crate) fn fmt_value_tick(y: f64) -> String {
    if y.abs() >= 1000.0 {
        format!("{y:.0}")
    } else {
        format!("{y:.2}")
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

fn widen_if_flat(min: f64, max: f64, half_width: f64) -> (f64, f64) {
    if max > min { (min, max) } else { (min - half_width, max + half_width) }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = if span > 0.0 { span * frac } else { min.abs().max(1.0) * frac };
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;

    #[test]
    fn day_numbers_round_trip() {
        let d = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert_eq!(x_to_date(date_to_x(d)), Some(d));
        assert_eq!(fmt_date_tick(date_to_x(d) + 0.4), "2023-01-01");
    }

    #[test]
    fn single_point_gets_non_degenerate_bounds() {
        let series = TimeSeries::new(vec![Observation {
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            value: Some(10.0),
        }]);
        let data = PlotData::from_series(&series).unwrap();
        assert!(data.x_bounds[1] > data.x_bounds[0]);
        assert!(data.y_bounds[1] > data.y_bounds[0]);
    }

    #[test]
    fn no_values_is_empty_series() {
        let series = TimeSeries::new(vec![Observation {
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            value: None,
        }]);
        assert!(matches!(PlotData::from_series(&series), Err(EasyDataError::EmptySeries)));
        assert!(matches!(PlotData::from_series(&TimeSeries::default()), Err(EasyDataError::EmptySeries)));
    }
}
