//! Animated activity indicator for in-flight requests.

use std::time::Instant;

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const FRAME_DURATION_MS: u128 = 100;

/// Spinner state. The frame is derived from the elapsed time, so the
/// spinner only needs redrawing, not ticking.
#[derive(Debug, Clone)]
pub struct Spinner {
    start_time: Instant,
    label: String,
}

impl Spinner {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            start_time: Instant::now(),
            label: label.into(),
        }
    }

    /// Spinner shown while a question is being answered.
    pub fn processing() -> Self {
        Self::new("Processing")
    }

    /// Spinner shown while the database summary is loading.
    pub fn loading_info() -> Self {
        Self::new("Loading")
    }

    /// Returns the current animation frame.
    pub fn frame(&self) -> &'static str {
        let index = (self.start_time.elapsed().as_millis() / FRAME_DURATION_MS) as usize;
        FRAMES[index % FRAMES.len()]
    }

    /// Returns the frame followed by the label.
    pub fn display(&self) -> String {
        format!("{} {}", self.frame(), self.label)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
