//! Generated SQL card.
//!
//! Shows the SQL the backend produced, verbatim and unwrapped.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Upper bound on the card height including borders.
pub const MAX_HEIGHT: u16 = 8;

/// SQL card widget.
pub struct SqlCard<'a> {
    sql: &'a str,
}

impl<'a> SqlCard<'a> {
    pub fn new(sql: &'a str) -> Self {
        Self { sql }
    }

    /// Height needed to show every line, capped at [`MAX_HEIGHT`].
    pub fn height(sql: &str) -> u16 {
        let lines = sql.lines().count().clamp(1, usize::from(MAX_HEIGHT - 2));
        lines as u16 + 2
    }
}

impl Widget for SqlCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Generated SQL Query ");

        // Preformatted: one terminal line per source line, no wrapping
        let lines: Vec<Line> = self.sql.lines().map(Line::raw).collect();
        Paragraph::new(lines)
            .style(Style::default().fg(Color::Yellow))
            .block(block)
            .render(area, buf);
    }
}
