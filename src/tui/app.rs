//! Application state for the TUI.
//!
//! `App` wraps the view state with everything that only matters to a
//! terminal: text editing, question history, scrolling and the spinner.
//! Key handling returns an [`Action`] instead of performing I/O, so the
//! same `App` runs under the interactive loop and in headless mode.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::editor::InputState;
use super::events::Event;
use super::history::QuestionHistory;
use super::tasks::ApiMessage;
use super::view::{RequestSeq, Submission, ViewState};
use super::widgets::spinner::Spinner;

/// Rows scrolled by PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Label of the submit button when idle.
pub const SUBMIT_LABEL: &str = "Submit Question";

/// Label of the submit button while a question is in flight.
pub const PROCESSING_LABEL: &str = "Processing...";

/// Work the runner must start after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing to do.
    None,
    /// Fetch the database summary.
    FetchInfo(RequestSeq),
    /// Send a question.
    Submit(Submission),
    /// Leave the application.
    Quit,
}

/// Main application state.
pub struct App {
    /// Whether the application is still running.
    pub running: bool,
    /// Title shown in the header.
    pub title: String,
    /// API location shown in the header.
    pub endpoint: Option<String>,
    /// State the cards are rendered from.
    pub view: ViewState,
    /// Question being edited.
    pub input: InputState,
    /// Previously submitted questions.
    pub history: QuestionHistory,
    /// First result row shown.
    pub results_scroll: usize,
    spinner: Option<Spinner>,
}

impl App {
    /// Creates a new App instance.
    pub fn new(title: impl Into<String>, endpoint: Option<String>) -> Self {
        Self {
            running: true,
            title: title.into(),
            endpoint,
            view: ViewState::new(),
            input: InputState::new(),
            history: QuestionHistory::new(),
            results_scroll: 0,
            spinner: None,
        }
    }

    /// Starts the view: requests the database summary once.
    pub fn start(&mut self) -> Action {
        self.refresh_info()
    }

    fn refresh_info(&mut self) -> Action {
        let seq = self.view.begin_info_fetch();
        self.sync_spinner();
        Action::FetchInfo(seq)
    }

    /// Returns true if the submit button is enabled.
    pub fn can_submit(&self) -> bool {
        !self.view.loading
    }

    /// Returns the submit button label.
    pub fn submit_label(&self) -> &'static str {
        if self.view.loading {
            PROCESSING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    /// Submits the current question as-is, empty or not.
    ///
    /// Returns `None` while the button is disabled.
    pub fn submit(&mut self) -> Option<Submission> {
        if !self.can_submit() {
            return None;
        }
        self.history.record(&self.input.text);
        let submission = self.view.begin_submit(self.input.text.clone());
        self.sync_spinner();
        Some(submission)
    }

    /// Applies a finished request to the view.
    pub fn apply(&mut self, message: ApiMessage) {
        match message {
            ApiMessage::DbInfo { seq, result } => {
                self.view.apply_info(seq, result);
            }
            ApiMessage::Query { seq, result } => {
                if self.view.apply_query(seq, result) {
                    self.results_scroll = 0;
                }
            }
        }
        self.sync_spinner();
    }

    fn sync_spinner(&mut self) {
        let wanted = if self.view.loading {
            Some("Processing")
        } else if self.view.is_fetching_info() {
            Some("Loading")
        } else {
            None
        };

        match (wanted, &self.spinner) {
            (None, _) => self.spinner = None,
            (Some(label), Some(current)) if current.label() == label => {}
            (Some("Processing"), _) => self.spinner = Some(Spinner::processing()),
            (Some(_), _) => self.spinner = Some(Spinner::loading_info()),
        }
    }

    /// Returns the spinner to draw, if a request is in flight.
    pub fn spinner(&self) -> Option<&Spinner> {
        self.spinner.as_ref()
    }

    /// Handles an event and returns the work it requires.
    pub fn handle_event(&mut self, event: Event) -> Action {
        match event {
            Event::Key(key) => self.handle_key(key),
            // ratatui resizes on the next draw
            Event::Resize(_, _) | Event::Tick => Action::None,
        }
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.running = false;
                Action::Quit
            }
            KeyCode::Char('r') if ctrl => self.refresh_info(),
            KeyCode::Enter if alt || key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.input.newline();
                Action::None
            }
            KeyCode::Enter => match self.submit() {
                Some(submission) => Action::Submit(submission),
                None => Action::None,
            },
            KeyCode::Up => {
                if let Some(entry) = self.history.older(&self.input.text) {
                    let entry = entry.to_string();
                    self.input.set_text(entry);
                }
                Action::None
            }
            KeyCode::Down => {
                if let Some(entry) = self.history.newer() {
                    let entry = entry.to_string();
                    self.input.set_text(entry);
                }
                Action::None
            }
            KeyCode::PageUp => {
                self.results_scroll = self.results_scroll.saturating_sub(PAGE_SIZE);
                Action::None
            }
            KeyCode::PageDown => {
                let max = self
                    .view
                    .results
                    .as_ref()
                    .map(|r| r.len().saturating_sub(1))
                    .unwrap_or(0);
                self.results_scroll = (self.results_scroll + PAGE_SIZE).min(max);
                Action::None
            }
            _ => {
                self.handle_edit_key(key);
                Action::None
            }
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }
        self.history.reset();

        match key.code {
            KeyCode::Char(c) => self.input.insert(c),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            _ => {}
        }
    }
}
