//! Event handling for the TUI.
//!
//! Polls keyboard and terminal events using crossterm.

use crate::error::{AppError, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Capacity of the channel between the reader thread and the UI loop.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Application events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// A periodic tick (drives the spinner).
    Tick,
}

/// Polls terminal events with a fixed tick rate.
///
/// `next` blocks for up to one tick, so the runner reads through
/// [`EventHandler::spawn`], which owns the terminal input on a dedicated
/// thread.
#[derive(Debug, Clone, Copy)]
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Creates a new event handler with the default tick rate.
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
        }
    }

    /// Creates a new event handler with a custom tick rate.
    pub fn with_tick_rate(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Polls for the next event, returning `Tick` if none arrives within
    /// the tick rate.
    pub fn next(&self) -> Result<Event> {
        if !event::poll(self.tick_rate)
            .map_err(|e| AppError::internal(format!("Failed to poll events: {e}")))?
        {
            return Ok(Event::Tick);
        }

        let event = event::read()
            .map_err(|e| AppError::internal(format!("Failed to read event: {e}")))?;

        Ok(match event {
            // Windows reports releases too
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
            CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
            _ => Event::Tick,
        })
    }
}

impl EventHandler {
    /// Starts the reader thread and returns the channel it feeds.
    ///
    /// The thread is the only reader of terminal input, so every event it
    /// reads reaches the channel. It exits when `cancel` fires, when the
    /// receiver is dropped, or after forwarding a read error.
    pub fn spawn(self, cancel: CancellationToken) -> Result<mpsc::Receiver<Result<Event>>> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        std::thread::Builder::new()
            .name("block-glance-input".to_string())
            .spawn(move || forward_events(|| self.next(), &tx, &cancel))
            .map_err(|e| AppError::internal(format!("Failed to start input thread: {e}")))?;
        Ok(rx)
    }
}

/// Pumps events from `next` into `tx` until cancelled, disconnected or
/// failed.
fn forward_events<F>(mut next: F, tx: &mpsc::Sender<Result<Event>>, cancel: &CancellationToken)
where
    F: FnMut() -> Result<Event>,
{
    while !cancel.is_cancelled() {
        let event = next();
        let failed = event.is_err();
        if tx.blocking_send(event).is_err() || failed {
            break;
        }
    }
    debug!("Input reader stopped");
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
