//! UI rendering for the TUI.
//!
//! Stacks the cards top to bottom: summary, question input, generated SQL,
//! results and the error banner. The SQL, results and banner cards only
//! take space when they have something to show.

use super::app::App;
use super::widgets::{error, header, input, sql, summary, table};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Key hints shown on the last line.
const KEY_HELP: &str =
    " Enter submit | Alt+Enter newline | Up/Down history | PgUp/PgDn scroll | Ctrl+R refresh | Ctrl+C quit";

/// A card that takes part in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Summary,
    Input,
    Sql,
    Results,
    Error,
    Filler,
    Footer,
}

fn sections(app: &App) -> Vec<(Section, Constraint)> {
    let mut sections = vec![
        (Section::Header, Constraint::Length(1)),
        (Section::Summary, Constraint::Length(summary::HEIGHT)),
        (Section::Input, Constraint::Length(input::HEIGHT)),
    ];

    if let Some(sql) = app.view.visible_sql() {
        sections.push((Section::Sql, Constraint::Length(sql::SqlCard::height(sql))));
    }
    if app.view.results.is_some() {
        sections.push((Section::Results, Constraint::Min(table::CHROME_LINES + 2)));
    }
    if app.view.error.is_some() {
        sections.push((Section::Error, Constraint::Length(error::HEIGHT)));
    }
    if app.view.results.is_none() {
        sections.push((Section::Filler, Constraint::Min(0)));
    }
    sections.push((Section::Footer, Constraint::Length(1)));
    sections
}

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let sections = sections(app);
    let areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(sections.iter().map(|(_, c)| *c))
        .split(frame.area());

    for ((section, _), area) in sections.iter().zip(areas.iter()) {
        let area = *area;
        match section {
            Section::Header => render_header(frame, area, app),
            Section::Summary => {
                frame.render_widget(summary::SummaryCard::new(app.view.db_info.as_ref()), area)
            }
            Section::Input => render_input(frame, area, app),
            Section::Sql => {
                if let Some(sql) = app.view.visible_sql() {
                    frame.render_widget(sql::SqlCard::new(sql), area);
                }
            }
            Section::Results => {
                if let Some(results) = &app.view.results {
                    let widget = table::ResultTable::new(results).scroll(app.results_scroll);
                    frame.render_widget(widget, area);
                }
            }
            Section::Error => {
                if let Some(message) = &app.view.error {
                    frame.render_widget(error::ErrorBanner::new(message), area);
                }
            }
            Section::Filler => {}
            Section::Footer => render_footer(frame, area),
        }
    }
}

/// Renders the header bar.
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let widget = header::Header::new(&app.title, app.endpoint.as_deref(), app.spinner());
    frame.render_widget(widget, area);
}

/// Renders the question input and places the cursor in it.
fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let widget = input::QuestionInput::new(&app.input, app.view.loading);
    frame.render_widget(widget, area);

    if let Some(position) = input::QuestionInput::cursor_position(&app.input, area) {
        frame.set_cursor_position(position);
    }
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(KEY_HELP, Style::default().fg(Color::DarkGray)));
    frame.render_widget(Paragraph::new(line), area);
}
