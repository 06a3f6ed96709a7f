//! 2 x N grid of speedup line charts drawn with ratatui.
//!
//! Row 1 holds the 1-D speedups, row 2 the 2-D speedups, one column per grid
//! size. Only the first column carries axis titles and only row 1 carries the
//! grid size titles.

use std::io;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use is_terminal::IsTerminal;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use tracing::info;

use crate::aggregate::AggregatedMeasurement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    OneD,
    TwoD,
}

impl Row {
    fn label(self) -> &'static str {
        match self {
            Row::OneD => "speedup 1d",
            Row::TwoD => "speedup 2d",
        }
    }

    fn color(self) -> Color {
        match self {
            Row::OneD => Color::Cyan,
            Row::TwoD => Color::Magenta,
        }
    }

    fn series(self, m: &AggregatedMeasurement) -> &[f64] {
        match self {
            Row::OneD => &m.speedup_1d,
            Row::TwoD => &m.speedup_2d,
        }
    }
}

/// Shows the chart grid on an alternate screen until `q`, `Esc` or `Ctrl+C`.
pub fn show(measurements: &[AggregatedMeasurement]) -> Result<()> {
    if measurements.is_empty() {
        return Ok(());
    }
    if !io::stdout().is_terminal() {
        info!("stdout is not a terminal, skipping chart");
        return Ok(());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, measurements);

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, measurements: &[AggregatedMeasurement]) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, measurements))?;
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
                _ => {}
            }
        }
    }
}

/// Draws the whole grid into `frame`.
pub fn render(frame: &mut Frame, measurements: &[AggregatedMeasurement]) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50), // 1-D row
            Constraint::Min(3),         // 2-D row
            Constraint::Length(1),      // Footer
        ])
        .split(frame.area());

    let n = measurements.len().max(1) as u32;
    for (row, area) in [(Row::OneD, outer[0]), (Row::TwoD, outer[1])] {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints((0..n).map(|_| Constraint::Ratio(1, n)))
            .split(area);
        for (idx, m) in measurements.iter().enumerate() {
            render_cell(frame, columns[idx], m, row, idx == 0);
        }
    }

    let footer = Paragraph::new("q/Esc to quit").style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(footer, outer[2]);
}

fn render_cell(frame: &mut Frame, area: Rect, m: &AggregatedMeasurement, row: Row, first_column: bool) {
    let points: Vec<(f64, f64)> = m
        .worker_counts
        .iter()
        .zip(row.series(m))
        .map(|(&w, &s)| (f64::from(w), s))
        .collect();

    let (x_min, x_max) = bounds(m.worker_counts.iter().map(|&w| f64::from(w)), false);
    let (_, y_max) = bounds(row.series(m).iter().copied(), true);

    let mut x_axis = Axis::default()
        .bounds([x_min, x_max])
        .labels(vec![Span::raw(format!("{x_min}")), Span::raw(format!("{x_max}"))]);
    let mut y_axis = Axis::default()
        .bounds([0.0, y_max])
        .labels(vec![Span::raw("0"), Span::raw(format!("{y_max:.2}"))]);
    if first_column {
        x_axis = x_axis.title("worker count");
        y_axis = y_axis.title(row.label());
    }

    let mut block = Block::default().borders(Borders::ALL);
    if row == Row::OneD {
        block = block.title(format!("Grid size: {}", m.grid_size));
    }

    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(row.color()))
        .data(&points);

    let chart = Chart::new(vec![dataset]).block(block).x_axis(x_axis).y_axis(y_axis);
    frame.render_widget(chart, area);
}

/// Axis bounds for `values`; degenerate ranges are widened so the axis is
/// never empty. `from_zero` pins the lower bound at zero and pads the top.
fn bounds(values: impl Iterator<Item = f64>, from_zero: bool) -> (f64, f64) {
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if from_zero {
        lo = 0.0;
        hi = if hi > 0.0 { hi * 1.1 } else { 1.0 };
    } else if lo == hi {
        lo -= 1.0;
        hi += 1.0;
    }
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn measurement(grid_size: u32) -> AggregatedMeasurement {
        AggregatedMeasurement {
            grid_size,
            worker_counts: vec![4, 8, 12],
            speedup_1d: vec![1.5, 2.5, 3.0],
            speedup_2d: vec![1.8, 3.1, 4.2],
        }
    }

    fn screen(measurements: &[AggregatedMeasurement]) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
        terminal.draw(|f| render(f, measurements)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn titles_only_on_first_row() {
        let text = screen(&[measurement(10), measurement(15)]);
        assert_eq!(text.matches("Grid size: 10").count(), 1);
        assert_eq!(text.matches("Grid size: 15").count(), 1);
    }

    #[test]
    fn axis_titles_only_on_first_column() {
        let text = screen(&[measurement(10), measurement(15), measurement(1000)]);
        assert_eq!(text.matches("speedup 1d").count(), 1);
        assert_eq!(text.matches("speedup 2d").count(), 1);
        assert!(text.contains("q/Esc to quit"));
    }

    #[test]
    fn bounds_widen_degenerate_ranges() {
        assert_eq!(bounds([4.0].into_iter(), false), (3.0, 5.0));
        assert_eq!(bounds([0.0, 0.0].into_iter(), true), (0.0, 1.0));
        assert_eq!(bounds(std::iter::empty(), false), (0.0, 1.0));
        let (lo, hi) = bounds([2.0, 4.0].into_iter(), true);
        assert_eq!(lo, 0.0);
        assert!((hi - 4.4).abs() < 1e-9);
    }
}
