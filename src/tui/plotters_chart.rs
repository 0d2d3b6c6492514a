//! Plotters-powered series chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.
//! Line and grid colours come from [`ChartStyle`]; the background is applied
//! after the canvas, which resets cell backgrounds when it paints.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::plot::ChartStyle;

/// Axis text and frame colour, dark enough to read on the light fill.
const INK: RGBColor = RGBColor(40, 40, 40);

/// A render-only chart description; bounds and points are computed by the caller.
pub struct SeriesPlottersChart<'a> {
    /// `(day number, value)` pairs in row order.
    pub points: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub style: &'a ChartStyle,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for SeriesPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters cannot lay out a chart in a tiny area; show a hint instead of panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .x_desc(self.style.x_label.as_str())
                .y_desc(self.style.y_label.as_str())
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&INK))
                .axis_style(&INK)
                .bold_line_style(&self.style.grid_color)
                .light_line_style(&self.style.grid_color)
                .draw()?;

            chart.draw_series(LineSeries::new(self.points.iter().copied(), &self.style.line_color))?;

            Ok(())
        });

        widget.render(area, buf);
        buf.set_style(area, Style::default().bg(tui_color(self.style.background)));
    }
}

fn tui_color(c: RGBColor) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}
