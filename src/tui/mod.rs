//! Terminal User Interface for the explorer.
//!
//! Provides the main TUI application loop using ratatui and crossterm.

pub mod app;
pub mod editor;
mod events;
pub mod headless;
pub mod history;
pub mod tasks;
pub mod ui;
pub mod view;
pub mod widgets;

pub use app::{Action, App};
pub use events::{Event, EventHandler};
pub use tasks::{ApiMessage, TaskSpawner};
pub use view::{RequestSeq, Submission, ViewState};

use crate::api::ExplorerApi;
use crate::config::Config;
use crate::error::{AppError, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        Ok(Self {
            terminal,
            event_handler: EventHandler::new(),
        })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| AppError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| AppError::internal(format!("Failed to enter alternate screen: {e}")))?;

        Terminal::new(CrosstermBackend::new(stdout))
            .map_err(|e| AppError::internal(format!("Failed to create terminal: {e}")))
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| AppError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| AppError::internal(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| AppError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the view until the user quits.
    ///
    /// Every in-flight request is cancelled on the way out, whether the
    /// loop ended normally or with an error.
    pub async fn run(&mut self, mut app: App, api: Arc<dyn ExplorerApi>) -> Result<()> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        let input_cancel = CancellationToken::new();
        let mut events = self.event_handler.spawn(input_cancel.clone())?;

        let (spawner, mut rx) = TaskSpawner::new(api);
        spawner.dispatch(app.start());

        let result = self
            .run_event_loop(&mut app, &spawner, &mut events, &mut rx)
            .await;

        spawner.shutdown();
        input_cancel.cancel();
        let _ = panic::take_hook();

        result
    }

    /// The main event loop, separated for cleaner error handling.
    async fn run_event_loop(
        &mut self,
        app: &mut App,
        spawner: &TaskSpawner,
        events: &mut mpsc::Receiver<Result<Event>>,
        rx: &mut mpsc::Receiver<ApiMessage>,
    ) -> Result<()> {
        loop {
            self.terminal
                .draw(|frame| ui::render(frame, app))
                .map_err(|e| AppError::internal(format!("Failed to draw: {e}")))?;

            if !app.running {
                break;
            }

            tokio::select! {
                Some(event) = events.recv() => {
                    let event = event?;
                    let action = app.handle_event(event);
                    if action != Action::None {
                        debug!("Dispatching {:?}", action);
                    }
                    spawner.dispatch(action);
                }

                Some(message) = rx.recv() => {
                    app.apply(message);
                }

                else => {
                    return Err(AppError::internal("Input reader stopped unexpectedly"));
                }
            }
        }

        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.restore_terminal() {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}

/// Runs the interactive TUI against the given API.
pub async fn run_async(config: &Config, api: Arc<dyn ExplorerApi>, endpoint: String) -> Result<()> {
    info!("Starting explorer view against {}", endpoint);
    let app = App::new(config.ui.title.clone(), Some(endpoint));
    let mut tui = Tui::new()?;
    tui.run(app, api).await
}
