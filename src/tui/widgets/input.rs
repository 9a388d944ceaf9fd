//! Question input card.
//!
//! A multi-line text field with a submit button underneath. The button is
//! dimmed and relabelled while a question is in flight.

use crate::tui::app::{PROCESSING_LABEL, SUBMIT_LABEL};
use crate::tui::editor::InputState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

/// Placeholder shown while the field is empty.
pub const PLACEHOLDER: &str = "Ask a question about the Bitcoin blockchain (e.g., 'What is the average block size in the last 100 blocks?')";

/// Visible text rows.
pub const TEXT_ROWS: u16 = 4;

/// Height of the card including borders and the button row.
pub const HEIGHT: u16 = TEXT_ROWS + 3;

/// Calculates the scroll offset needed to keep `cursor` visible in a
/// window of `visible` cells.
pub fn calculate_scroll_offset(cursor: usize, visible: usize) -> usize {
    if visible == 0 {
        return cursor;
    }
    cursor.saturating_sub(visible - 1)
}

/// Terminal cells taken by the first `chars` characters of `line`.
fn display_width(line: &str, chars: usize) -> usize {
    line.chars()
        .take(chars)
        .map(|c| c.width().unwrap_or(0))
        .sum()
}

/// Drops the first `cols` terminal cells of `line`. A wide character cut
/// by the boundary is replaced by spaces so the rest stays aligned.
fn skip_columns(line: &str, cols: usize) -> String {
    let mut skipped = 0;
    let mut out = String::new();
    for c in line.chars() {
        if skipped >= cols {
            out.push(c);
            continue;
        }
        skipped += c.width().unwrap_or(0);
        if skipped > cols {
            out.extend(std::iter::repeat(' ').take(skipped - cols));
        }
    }
    out
}

/// Question input widget.
pub struct QuestionInput<'a> {
    input: &'a InputState,
    loading: bool,
}

impl<'a> QuestionInput<'a> {
    pub fn new(input: &'a InputState, loading: bool) -> Self {
        Self { input, loading }
    }

    fn block() -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Ask Questions ")
    }

    fn text_area(inner: Rect) -> Rect {
        Rect {
            height: inner.height.saturating_sub(1),
            ..inner
        }
    }

    /// Returns the cursor's line and its display column.
    fn cursor_cell(input: &InputState) -> (usize, usize) {
        let (line, col) = input.cursor_line_col();
        let text = input.text.split('\n').nth(line).unwrap_or("");
        (line, display_width(text, col))
    }

    /// Returns (row offset, column offset) of the visible text window.
    /// The column offset counts terminal cells.
    fn scroll(input: &InputState, text_area: Rect) -> (usize, usize) {
        let (line, col) = Self::cursor_cell(input);
        (
            calculate_scroll_offset(line, text_area.height as usize),
            calculate_scroll_offset(col, text_area.width as usize),
        )
    }

    /// Screen position of the cursor for a card drawn in `area`.
    pub fn cursor_position(input: &InputState, area: Rect) -> Option<(u16, u16)> {
        let text_area = Self::text_area(Self::block().inner(area));
        if text_area.width == 0 || text_area.height == 0 {
            return None;
        }
        let (line, col) = Self::cursor_cell(input);
        let (row_off, col_off) = Self::scroll(input, text_area);
        let x = (col - col_off).min(text_area.width as usize - 1);
        Some((text_area.x + x as u16, text_area.y + (line - row_off) as u16))
    }

    fn button(&self) -> Line<'static> {
        let (label, style) = if self.loading {
            (
                PROCESSING_LABEL,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            (
                SUBMIT_LABEL,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
        };
        Line::from(vec![
            Span::styled(format!("[ {label} ]"), style),
            Span::styled(
                "  Enter to submit, Alt+Enter for a new line",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    }
}

impl Widget for QuestionInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Self::block();
        let inner = block.inner(area);
        block.render(area, buf);

        let text_area = Self::text_area(inner);

        if self.input.is_empty() {
            Paragraph::new(PLACEHOLDER)
                .style(Style::default().fg(Color::DarkGray))
                .render(text_area, buf);
        } else {
            let (row_off, col_off) = Self::scroll(self.input, text_area);
            let lines: Vec<Line> = self
                .input
                .text
                .split('\n')
                .skip(row_off)
                .take(text_area.height as usize)
                .map(|line| Line::from(skip_columns(line, col_off)))
                .collect();
            Paragraph::new(lines).render(text_area, buf);
        }

        if inner.height > 0 {
            let button_area = Rect {
                y: inner.y + inner.height - 1,
                height: 1,
                ..inner
            };
            Paragraph::new(self.button()).render(button_area, buf);
        }
    }
}
