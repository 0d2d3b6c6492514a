//! Ratatui-based terminal viewer.
//!
//! Shows one series as a line chart with a summary header. `q` or `Esc` quits.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::domain::TimeSeries;
use crate::error::EasyDataError;
use crate::plot::{ChartStyle, PlotData, fmt_date_tick, fmt_value_tick};

mod plotters_chart;

use plotters_chart::SeriesPlottersChart;

/// Open the viewer for `series` and block until the user quits.
///
/// An empty series fails with [`EasyDataError::EmptySeries`] before the
/// terminal is touched; terminal failures are [`EasyDataError::Render`].
pub fn run(series: &TimeSeries, title: &str) -> Result<(), EasyDataError> {
    let data = PlotData::from_series(series)?;
    let style = ChartStyle::default();

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).map_err(|e| render_err("Failed to initialize terminal", e))?;

    let viewer = Viewer {
        series,
        data,
        style,
        title: title.to_string(),
    };
    viewer.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, EasyDataError> {
        enable_raw_mode().map_err(|e| render_err("Failed to enable raw mode", e))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(render_err("Failed to enter alternate screen", e));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct Viewer<'a> {
    series: &'a TimeSeries,
    data: PlotData,
    style: ChartStyle,
    title: String,
}

impl Viewer<'_> {
    fn event_loop<B: ratatui::backend::Backend>(&self, terminal: &mut Terminal<B>) -> Result<(), EasyDataError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| render_err("Terminal draw error", e))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100)).map_err(|e| render_err("Event poll error", e))? {
                continue;
            }

            match event::read().map_err(|e| render_err("Event read error", e))? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                        break;
                    }
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
        Ok(())
    }

    fn draw(&self, f: &mut ratatui::Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(8), Constraint::Length(1)])
            .split(f.area());

        let header = Paragraph::new(Line::from(vec![
            Span::styled(self.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::raw(summary_line(self.series)),
        ]))
        .block(Block::default().borders(Borders::ALL).title(self.style.title.as_str()));
        f.render_widget(header, chunks[0]);

        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(chunks[1]);
        f.render_widget(block, chunks[1]);
        f.render_widget(
            SeriesPlottersChart {
                points: &self.data.points,
                x_bounds: self.data.x_bounds,
                y_bounds: self.data.y_bounds,
                style: &self.style,
                fmt_x: fmt_date_tick,
                fmt_y: fmt_value_tick,
            },
            inner,
        );

        let help = Paragraph::new("q/Esc: quit").style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, chunks[2]);
    }
}

fn render_err(context: &str, err: io::Error) -> EasyDataError {
    EasyDataError::Render(format!("{context}: {err}"))
}

fn summary_line(series: &TimeSeries) -> String {
    let dates = series
        .date_range()
        .map(|(a, b)| format!("{a} .. {b}"))
        .unwrap_or_else(|| "-".to_string());
    let values = series
        .value_range()
        .map(|(lo, hi)| format!("min {lo:.2} max {hi:.2}"))
        .unwrap_or_else(|| "-".to_string());
    format!("{} observations | {dates} | {values}", series.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;
    use chrono::NaiveDate;

    #[test]
    fn empty_series_fails_before_touching_the_terminal() {
        let series = TimeSeries::new(vec![Observation {
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            value: None,
        }]);
        assert!(matches!(run(&series, "empty"), Err(EasyDataError::EmptySeries)));
    }

    #[test]
    fn terminal_errors_are_render_errors() {
        let err = render_err("Event read error", io::Error::other("closed"));
        assert_eq!(err.to_string(), "Rendering failed: Event read error: closed");
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn summary_line_lists_count_dates_and_range() {
        let series = TimeSeries::new(vec![
            Observation {
                date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                value: Some(10.0),
            },
            Observation {
                date: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
                value: Some(15.0),
            },
        ]);
        assert_eq!(
            summary_line(&series),
            "2 observations | 2023-01-01 .. 2023-01-02 | min 10.00 max 15.00"
        );
    }
}
