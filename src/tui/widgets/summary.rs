//! Database information card.
//!
//! Three statistics side by side once the summary has loaded, a placeholder
//! before that (and for good, if the fetch failed).

use crate::api::DbInfo;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Placeholder shown until the summary arrives.
pub const LOADING_PLACEHOLDER: &str = "Loading database information...";

/// Height of the card including borders.
pub const HEIGHT: u16 = 4;

/// Summary card widget.
pub struct SummaryCard<'a> {
    info: Option<&'a DbInfo>,
}

impl<'a> SummaryCard<'a> {
    pub fn new(info: Option<&'a DbInfo>) -> Self {
        Self { info }
    }

    fn stat(label: &str, value: String, color: Color) -> Paragraph<'static> {
        Paragraph::new(vec![
            Line::from(Span::styled(
                label.to_string(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
    }
}

impl Widget for SummaryCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Database Information ");
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(info) = self.info else {
            Paragraph::new(LOADING_PLACEHOLDER)
                .style(Style::default().fg(Color::DarkGray))
                .render(inner, buf);
            return;
        };

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(inner);

        Self::stat("Total Blocks", info.total_blocks.to_string(), Color::Blue)
            .render(columns[0], buf);
        Self::stat("Height Range", info.height_range(), Color::Green).render(columns[1], buf);
        Self::stat("Total Tables", info.total_tables.to_string(), Color::Magenta)
            .render(columns[2], buf);
    }
}
