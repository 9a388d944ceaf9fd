//! Session history of submitted questions.
//!
//! `Up` walks back through earlier questions, `Down` walks forward and
//! finally restores whatever was being typed before browsing started.

use std::collections::VecDeque;

const MAX_HISTORY_SIZE: usize = 100;

/// Submitted questions, oldest first.
#[derive(Debug, Default)]
pub struct QuestionHistory {
    entries: VecDeque<String>,
    /// Index of the entry being shown, `None` while editing a fresh question.
    cursor: Option<usize>,
    /// Text that was in the field when browsing started.
    draft: String,
}

impl QuestionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a submitted question.
    ///
    /// Blank questions and repeats of the latest entry are not recorded.
    pub fn record(&mut self, question: &str) {
        self.cursor = None;
        self.draft.clear();

        let question = question.trim();
        if question.is_empty() || self.entries.back().map(String::as_str) == Some(question) {
            return;
        }

        if self.entries.len() == MAX_HISTORY_SIZE {
            self.entries.pop_front();
        }
        self.entries.push_back(question.to_string());
    }

    /// Steps to an older entry. Returns the text to show, or `None` when
    /// there is nothing older.
    pub fn older(&mut self, current: &str) -> Option<&str> {
        let next = match self.cursor {
            None if self.entries.is_empty() => return None,
            None => {
                self.draft = current.to_string();
                self.entries.len() - 1
            }
            Some(0) => return None,
            Some(i) => i - 1,
        };
        self.cursor = Some(next);
        self.entries.get(next).map(String::as_str)
    }

    /// Steps to a newer entry. Past the newest entry the draft comes back.
    /// Returns `None` when not browsing.
    pub fn newer(&mut self) -> Option<&str> {
        let i = self.cursor?;
        if i + 1 < self.entries.len() {
            self.cursor = Some(i + 1);
            self.entries.get(i + 1).map(String::as_str)
        } else {
            self.cursor = None;
            Some(self.draft.as_str())
        }
    }

    /// Stops browsing without changing the entries.
    pub fn reset(&mut self) {
        self.cursor = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
