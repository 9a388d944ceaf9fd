//! Result table widget for the TUI.
//!
//! Renders query results as a bordered table. The header comes from the
//! first row's keys; every row then renders its own values in order, so
//! rows with a different shape than the first are shown as they are.

use crate::api::{QueryResult, Row};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Maximum width for any column.
const MAX_COLUMN_WIDTH: usize = 40;

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 4;

/// Lines around the data rows: top border, header, separator, bottom
/// border and footer.
pub const CHROME_LINES: u16 = 5;

/// Widget for rendering a query result as a table.
pub struct ResultTable<'a> {
    result: &'a QueryResult,
    scroll: usize,
    max_rows: usize,
}

impl<'a> ResultTable<'a> {
    /// Creates a new result table widget.
    pub fn new(result: &'a QueryResult) -> Self {
        Self {
            result,
            scroll: 0,
            max_rows: usize::MAX,
        }
    }

    /// Skips the first `scroll` data rows.
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// Renders at most `max_rows` data rows.
    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Clamps the result's measured column widths to the display bounds.
    fn calculate_column_widths(&self) -> Vec<usize> {
        self.result
            .column_widths()
            .iter()
            .map(|&w| w.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH))
            .collect()
    }

    /// Truncates a string to fit within the given width, adding an ellipsis
    /// if needed.
    fn truncate(s: &str, max_width: usize) -> String {
        if s.chars().count() <= max_width {
            s.to_string()
        } else if max_width <= 3 {
            s.chars().take(max_width).collect()
        } else {
            let kept: String = s.chars().take(max_width - 3).collect();
            format!("{kept}...")
        }
    }

    fn border_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    /// Renders the table to lines, skipping scrolled-off rows.
    pub fn render_to_lines(&self, available_width: usize) -> Vec<Line<'static>> {
        let widths = self.calculate_column_widths();

        let total_width: usize = widths.iter().sum::<usize>() + widths.len() * 3 + 1;
        let scale_factor = if total_width > available_width && available_width > 0 {
            available_width as f64 / total_width as f64
        } else {
            1.0
        };
        let widths: Vec<usize> = widths
            .iter()
            .map(|&w| ((w as f64 * scale_factor) as usize).max(MIN_COLUMN_WIDTH))
            .collect();

        let shown = self
            .result
            .len()
            .saturating_sub(self.scroll)
            .min(self.max_rows);
        let mut lines = Vec::with_capacity(shown + CHROME_LINES as usize);
        lines.push(Self::render_border(&widths, '┌', '┬', '┐'));
        lines.push(self.render_header_row(&widths));
        lines.push(Self::render_border(&widths, '├', '┼', '┤'));
        for row in self.result.rows().iter().skip(self.scroll).take(shown) {
            lines.push(Self::render_data_row(row, &widths));
        }
        lines.push(Self::render_border(&widths, '└', '┴', '┘'));

        let count = self.result.len();
        let mut footer = format!("{} row{}", count, if count == 1 { "" } else { "s" });
        if self.scroll > 0 {
            footer.push_str(&format!(" (from row {})", self.scroll + 1));
        }
        lines.push(Line::from(Span::styled(footer, Self::border_style())));

        lines
    }

    /// Renders a horizontal border line.
    fn render_border(widths: &[usize], left: char, mid: char, right: char) -> Line<'static> {
        let segments: Vec<String> = widths.iter().map(|&w| "─".repeat(w + 2)).collect();
        let border = format!("{left}{}{right}", segments.join(&mid.to_string()));
        Line::from(Span::styled(border, Self::border_style()))
    }

    /// Renders the header row with column names.
    fn render_header_row(&self, widths: &[usize]) -> Line<'static> {
        let columns = self.result.columns();
        let mut spans = vec![Span::styled("│", Self::border_style())];

        for (i, &width) in widths.iter().enumerate() {
            let name = columns.get(i).copied().unwrap_or("");
            let padded = format!(" {:width$} ", Self::truncate(name, width));
            spans.push(Span::styled(
                padded,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("│", Self::border_style()));
        }

        Line::from(spans)
    }

    /// Renders a data row.
    fn render_data_row(row: &Row, widths: &[usize]) -> Line<'static> {
        let mut spans = vec![Span::styled("│", Self::border_style())];

        let cells = row.values().zip(QueryResult::row_cells(row));
        for (i, (value, cell)) in cells.enumerate() {
            let width = widths.get(i).copied().unwrap_or(MIN_COLUMN_WIDTH);
            let padded = format!(" {:width$} ", Self::truncate(&cell, width));

            let style = if value.is_null() {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
            };

            spans.push(Span::styled(padded, style));
            spans.push(Span::styled("│", Self::border_style()));
        }

        Line::from(spans)
    }
}

impl Widget for ResultTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Query Results ");
        let inner = block.inner(area);
        block.render(area, buf);

        let visible_rows = (inner.height as usize).saturating_sub(CHROME_LINES as usize);
        let lines = self
            .max_rows(visible_rows)
            .render_to_lines(inner.width as usize);
        for (i, line) in lines.iter().enumerate().take(inner.height as usize) {
            buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
        }
    }
}
