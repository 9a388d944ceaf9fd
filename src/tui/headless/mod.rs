//! Headless mode for scripted testing and automation.
//!
//! Runs the explorer view against an in-memory terminal, executing scripted
//! events and capturing the screen for verification. Responses from the API
//! are only applied during `wait:` and `settle` events, so what a script sees
//! between those events does not depend on timing.

mod events;
mod output;

pub use events::{Assertion, Event, EventParser};
pub use output::{HeadlessOutput, OutputFormat, ScreenRenderer};

use crate::api::{ExplorerApi, HttpExplorerApi, MockExplorerApi};
use crate::cli::{Cli, MockFailure};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::tui::app::App;
use crate::tui::tasks::{ApiMessage, TaskSpawner};
use crate::tui::ui;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Longest a `settle` event waits for in-flight requests.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for headless mode execution.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Screen width in columns.
    pub width: u16,
    /// Screen height in rows.
    pub height: u16,
    /// Output format.
    pub output_format: OutputFormat,
    /// Whether to stop on first assertion failure.
    pub fail_fast: bool,
    /// Path to write output (None = stdout).
    pub output_file: Option<PathBuf>,
    /// Title shown in the header.
    pub title: String,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 30,
            output_format: OutputFormat::Text,
            fail_fast: false,
            output_file: None,
            title: crate::config::UiConfig::default().title,
        }
    }
}

impl HeadlessConfig {
    /// Creates a HeadlessConfig from CLI arguments and the resolved config.
    pub fn from_cli(cli: &Cli, config: &Config) -> Result<Self> {
        let (width, height) = cli.parse_screen_size().map_err(AppError::config)?;
        let output_format = cli.parse_output_format().map_err(AppError::config)?;

        Ok(Self {
            width,
            height,
            output_format,
            fail_fast: cli.fail_fast,
            output_file: cli.output_file.clone(),
            title: config.ui.title.clone(),
        })
    }
}

/// Result of headless execution.
#[derive(Debug)]
pub struct HeadlessResult {
    /// Final screen content as text.
    pub screen: String,
    /// Screen lines for JSON output.
    pub screen_lines: Vec<String>,
    /// Number of events executed.
    pub events_executed: usize,
    /// Total execution duration.
    pub duration: Duration,
    /// Number of assertions passed.
    pub assertions_passed: usize,
    /// Number of assertions failed.
    pub assertions_failed: usize,
    /// Descriptions of the failed assertions.
    pub failures: Vec<String>,
    /// Application state snapshot.
    pub state: HeadlessState,
    /// Frame captures.
    pub frames: Vec<Frame>,
}

/// Snapshot of the view state, used by `assert:state:` and JSON output.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct HeadlessState {
    /// Current question text.
    pub input_text: String,
    /// Whether a question is in flight.
    pub loading: bool,
    /// Whether the database summary is being fetched.
    pub fetching_info: bool,
    /// Whether the database summary has loaded.
    pub has_db_info: bool,
    /// Whether the SQL card is shown.
    pub has_sql: bool,
    /// Whether the results card is shown.
    pub has_results: bool,
    /// Number of result rows.
    pub result_rows: usize,
    /// Banner text, if any.
    pub error: Option<String>,
    /// Number of remembered questions.
    pub history_len: usize,
    /// Whether the app is still running.
    pub running: bool,
}

impl HeadlessState {
    /// Field names accepted by [`HeadlessState::field`].
    pub const FIELDS: &'static [&'static str] = &[
        "input_text",
        "loading",
        "fetching_info",
        "has_db_info",
        "has_sql",
        "has_results",
        "result_rows",
        "has_error",
        "error",
        "history_len",
        "running",
    ];

    pub fn from_app(app: &App) -> Self {
        Self {
            input_text: app.input.text.clone(),
            loading: app.view.loading,
            fetching_info: app.view.is_fetching_info(),
            has_db_info: app.view.db_info.is_some(),
            has_sql: app.view.visible_sql().is_some(),
            has_results: app.view.results.is_some(),
            result_rows: app.view.results.as_ref().map_or(0, |r| r.len()),
            error: app.view.error.clone(),
            history_len: app.history.len(),
            running: app.running,
        }
    }

    /// Returns a field as text. `error` is empty when no banner is shown.
    pub fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "input_text" => self.input_text.clone(),
            "loading" => self.loading.to_string(),
            "fetching_info" => self.fetching_info.to_string(),
            "has_db_info" => self.has_db_info.to_string(),
            "has_sql" => self.has_sql.to_string(),
            "has_results" => self.has_results.to_string(),
            "result_rows" => self.result_rows.to_string(),
            "has_error" => self.error.is_some().to_string(),
            "error" => self.error.clone().unwrap_or_default(),
            "history_len" => self.history_len.to_string(),
            "running" => self.running.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

/// A captured frame (screen state after an event).
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame number (0 = initial state).
    pub number: usize,
    /// Event that produced this frame (None for initial).
    pub event: Option<String>,
    /// Screen content.
    pub screen: String,
}

/// Runs the explorer view in headless mode.
pub struct HeadlessRunner {
    config: HeadlessConfig,
    terminal: Terminal<TestBackend>,
    app: App,
    api: Arc<dyn ExplorerApi>,
    events: Vec<Event>,
    frames: Vec<Frame>,
    assertions_passed: usize,
    failures: Vec<String>,
}

impl HeadlessRunner {
    /// Creates a runner backed by the default mock API.
    pub fn new(config: HeadlessConfig) -> Result<Self> {
        let backend = TestBackend::new(config.width, config.height);
        let terminal = Terminal::new(backend)
            .map_err(|e| AppError::internal(format!("Failed to create test terminal: {e}")))?;

        let app = App::new(config.title.clone(), None);

        Ok(Self {
            config,
            terminal,
            app,
            api: Arc::new(MockExplorerApi::new()),
            events: Vec::new(),
            frames: Vec::new(),
            assertions_passed: 0,
            failures: Vec::new(),
        })
    }

    /// Uses the given API instead of the default mock.
    pub fn with_api(mut self, api: Arc<dyn ExplorerApi>) -> Self {
        self.api = api;
        self
    }

    /// Sets the endpoint shown in the header.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.app.endpoint = Some(endpoint.into());
        self
    }

    /// Loads events from a string (comma-separated or newline-separated).
    pub fn load_events(&mut self, input: &str) -> Result<()> {
        self.events = EventParser::new().parse_all(input)?;
        Ok(())
    }

    /// Loads events from a script file, or stdin for `-`.
    pub fn load_script(&mut self, path: &str) -> Result<()> {
        let content = if path == "-" {
            use std::io::Read;
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| AppError::internal(format!("Failed to read stdin: {e}")))?;
            buffer
        } else {
            std::fs::read_to_string(path)
                .map_err(|e| AppError::internal(format!("Failed to read script file: {e}")))?
        };

        self.load_events(&content)
    }

    /// Runs the script and returns the result.
    pub async fn run(mut self) -> Result<HeadlessResult> {
        let start_time = Instant::now();

        let (spawner, mut rx) = TaskSpawner::new(Arc::clone(&self.api));
        spawner.dispatch(self.app.start());

        self.capture_frame(None)?;

        let events = std::mem::take(&mut self.events);
        let mut events_executed = 0;

        for event in events {
            let event_str = event.to_string();
            debug!("Headless event: {}", event_str);

            match &event {
                Event::Key(key) => {
                    let action = self.app.handle_event(crate::tui::Event::Key(*key));
                    spawner.dispatch(action);
                }
                Event::Type(text) => {
                    for c in text.chars() {
                        let key = crossterm::event::KeyEvent::new(
                            crossterm::event::KeyCode::Char(c),
                            crossterm::event::KeyModifiers::NONE,
                        );
                        let action = self.app.handle_key(key);
                        spawner.dispatch(action);
                    }
                }
                Event::Wait(duration) => self.wait(*duration, &mut rx).await,
                Event::Settle => self.settle(&mut rx).await,
                Event::Resize(w, h) => {
                    self.terminal
                        .resize(Rect::new(0, 0, *w, *h))
                        .map_err(|e| AppError::internal(format!("Resize failed: {e}")))?;
                }
                Event::Snapshot(_) => {}
                Event::Assert(assertion) => {
                    self.draw()?;
                    let screen = self.render_screen();
                    if assertion.check(&screen, &HeadlessState::from_app(&self.app)) {
                        self.assertions_passed += 1;
                    } else {
                        warn!("Assertion failed: {}", assertion);
                        self.failures.push(assertion.to_string());
                    }
                }
            }

            events_executed += 1;

            let capture = self.config.output_format == OutputFormat::Frames
                || matches!(event, Event::Snapshot(_));
            if capture {
                self.capture_frame(Some(event_str))?;
            } else {
                self.draw()?;
            }

            if !self.app.running || (self.config.fail_fast && !self.failures.is_empty()) {
                break;
            }
        }

        spawner.shutdown();
        self.draw()?;

        let screen = self.render_screen();
        let screen_lines = screen.lines().map(String::from).collect();

        Ok(HeadlessResult {
            screen,
            screen_lines,
            events_executed,
            duration: start_time.elapsed(),
            assertions_passed: self.assertions_passed,
            assertions_failed: self.failures.len(),
            failures: self.failures,
            state: HeadlessState::from_app(&self.app),
            frames: self.frames,
        })
    }

    /// Sleeps for `duration`, applying responses as they arrive.
    async fn wait(&mut self, duration: Duration, rx: &mut mpsc::Receiver<ApiMessage>) {
        let deadline = tokio::time::Instant::now() + duration;
        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => break,
                Some(message) = rx.recv() => self.app.apply(message),
            }
        }
    }

    /// Applies responses until nothing is in flight or [`SETTLE_TIMEOUT`]
    /// passes.
    async fn settle(&mut self, rx: &mut mpsc::Receiver<ApiMessage>) {
        let deadline = tokio::time::Instant::now() + SETTLE_TIMEOUT;
        while self.app.view.is_busy() {
            match tokio::time::timeout_at(deadline, rx.recv()).await {
                Ok(Some(message)) => self.app.apply(message),
                Ok(None) => break,
                Err(_) => {
                    warn!("Requests still in flight after {:?}", SETTLE_TIMEOUT);
                    break;
                }
            }
        }
    }

    fn draw(&mut self) -> Result<()> {
        self.terminal
            .draw(|frame| ui::render(frame, &self.app))
            .map_err(|e| AppError::internal(format!("Failed to render: {e}")))?;
        Ok(())
    }

    /// Renders the current screen to a string.
    fn render_screen(&self) -> String {
        ScreenRenderer::render(self.terminal.backend().buffer())
    }

    /// Captures the current frame.
    fn capture_frame(&mut self, event: Option<String>) -> Result<()> {
        self.draw()?;
        let screen = self.render_screen();
        let number = self.frames.len();

        self.frames.push(Frame {
            number,
            event,
            screen,
        });

        Ok(())
    }
}

/// Builds the API a headless run talks to, returning it with the endpoint
/// label for the header.
fn headless_api(cli: &Cli, config: &Config) -> Result<(Arc<dyn ExplorerApi>, String)> {
    if !cli.mock_api {
        let api = HttpExplorerApi::from_config(&config.api)?;
        let endpoint = api.base_url().to_string();
        return Ok((Arc::new(api), endpoint));
    }

    let mut mock = MockExplorerApi::new();
    if let Some(failure) = cli.mock_fail {
        if matches!(failure, MockFailure::Info | MockFailure::All) {
            mock = mock.with_failing_db_info();
        }
        if matches!(failure, MockFailure::Query | MockFailure::All) {
            mock = mock.with_failing_queries();
        }
    }
    if let Some(ms) = cli.mock_delay {
        mock = mock.with_query_delay(Duration::from_millis(ms));
    }

    Ok((Arc::new(mock), "mock".to_string()))
}

/// Runs headless mode from CLI arguments.
///
/// Returns the process exit code: 1 if any assertion failed, 0 otherwise.
pub async fn run_headless(cli: &Cli, config: &Config) -> Result<i32> {
    cli.validate_headless().map_err(AppError::config)?;

    let headless_config = HeadlessConfig::from_cli(cli, config)?;
    let (api, endpoint) = headless_api(cli, config)?;
    let mut runner = HeadlessRunner::new(headless_config.clone())?
        .with_api(api)
        .with_endpoint(endpoint);

    if let Some(ref events) = cli.events {
        runner.load_events(events)?;
    } else if let Some(ref script) = cli.script {
        runner.load_script(script)?;
    }

    let result = runner.run().await?;

    let output = HeadlessOutput::new(headless_config.output_format).format(&result);
    if let Some(ref path) = headless_config.output_file {
        std::fs::write(path, &output)
            .map_err(|e| AppError::internal(format!("Failed to write output file: {e}")))?;
    } else {
        print!("{}", output);
    }

    Ok(if result.assertions_failed > 0 { 1 } else { 0 })
}
