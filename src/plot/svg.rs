//! SVG export via Plotters.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use crate::domain::TimeSeries;
use crate::error::EasyDataError;
use crate::plot::{ChartStyle, PlotData, fmt_date_tick, fmt_value_tick};

/// Draw `series` as a single titled line chart into an SVG file at `path`.
pub fn render_svg(series: &TimeSeries, path: &Path, style: &ChartStyle) -> Result<(), EasyDataError> {
    let data = PlotData::from_series(series)?;
    draw(&data, path, style).map_err(|e| EasyDataError::Render(format!("{}: {e}", path.display())))?;
    info!("chart saved to {}", path.display());
    Ok(())
}

fn draw(data: &PlotData, path: &Path, style: &ChartStyle) -> Result<(), Box<dyn Error>> {
    let [x0, x1] = data.x_bounds;
    let [y0, y1] = data.y_bounds;

    let root = SVGBackend::new(path, style.size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&style.title, ("sans-serif", 24))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart.plotting_area().fill(&style.background)?;

    chart
        .configure_mesh()
        .x_desc(style.x_label.as_str())
        .y_desc(style.y_label.as_str())
        .x_labels(6)
        .y_labels(8)
        .x_label_formatter(&|v| fmt_date_tick(*v))
        .y_label_formatter(&|v| fmt_value_tick(*v))
        .axis_desc_style(("sans-serif", 18))
        .bold_line_style(&style.grid_color.mix(0.7))
        .light_line_style(&style.grid_color.mix(0.3))
        .draw()?;

    chart.draw_series(LineSeries::new(
        data.points.iter().copied(),
        style.line_color.stroke_width(style.line_width),
    ))?;

    root.present()?;
    Ok(())
}
