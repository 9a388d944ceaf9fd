//! Header widget for the TUI.
//!
//! Displays the title, the activity spinner and the API endpoint.

use super::spinner::Spinner;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

/// Header bar widget.
pub struct Header<'a> {
    title: &'a str,
    endpoint: Option<&'a str>,
    spinner: Option<&'a Spinner>,
}

impl<'a> Header<'a> {
    pub fn new(title: &'a str, endpoint: Option<&'a str>, spinner: Option<&'a Spinner>) -> Self {
        Self {
            title,
            endpoint,
            spinner,
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(style);
        }

        let left_span = Span::styled(format!(" {}", self.title), style);
        buf.set_span(area.x, area.y, &left_span, area.width);

        if let Some(spinner) = self.spinner {
            let text = spinner.display();
            let spinner_style = style.fg(Color::Yellow);
            let width = text.chars().count() as u16;
            let x = area.x + area.width.saturating_sub(width) / 2;
            buf.set_string(x, area.y, &text, spinner_style);
        }

        if let Some(endpoint) = self.endpoint {
            let right_text = format!(" [api: {}] ", endpoint);
            let right_width = right_text.chars().count() as u16;
            if right_width < area.width {
                let right_x = area.right().saturating_sub(right_width);
                buf.set_string(right_x, area.y, &right_text, style);
            }
        }
    }
}
