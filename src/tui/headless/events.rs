//! Event DSL parser for headless mode.
//!
//! Parses event strings like "key:enter", "type:hello", "wait:100ms" or
//! "settle" into executable events.

use super::HeadlessState;
use crate::error::{AppError, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;
use std::time::Duration;

/// An assertion to check against the screen or state.
#[derive(Debug, Clone, PartialEq)]
pub enum Assertion {
    /// Screen contains text (case-insensitive).
    Contains(String),
    /// Screen contains text (case-sensitive).
    ContainsExact(String),
    /// Screen does not contain text (case-insensitive).
    NotContains(String),
    /// Screen matches regex pattern.
    Matches(String),
    /// State field equals value.
    StateEquals { field: String, value: String },
    /// State field comparison (>=, <=, >, <).
    StateCompare {
        field: String,
        op: String,
        value: String,
    },
}

impl Assertion {
    /// Checks the assertion against the screen and a state snapshot.
    pub fn check(&self, screen: &str, state: &HeadlessState) -> bool {
        match self {
            Self::Contains(text) => screen.to_lowercase().contains(&text.to_lowercase()),
            Self::ContainsExact(text) => screen.contains(text),
            Self::NotContains(text) => !screen.to_lowercase().contains(&text.to_lowercase()),
            Self::Matches(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(screen))
                .unwrap_or(false),
            Self::StateEquals { field, value } => {
                state.field(field).as_deref() == Some(value.as_str())
            }
            Self::StateCompare { field, op, value } => {
                compare_values(state.field(field).as_deref(), op, value)
            }
        }
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains(t) => write!(f, "contains:{}", t),
            Self::ContainsExact(t) => write!(f, "contains-exact:{}", t),
            Self::NotContains(t) => write!(f, "not-contains:{}", t),
            Self::Matches(p) => write!(f, "matches:{}", p),
            Self::StateEquals { field, value } => write!(f, "state:{}={}", field, value),
            Self::StateCompare { field, op, value } => {
                write!(f, "state:{}{}{}", field, op, value)
            }
        }
    }
}

/// Compares values using the given operator.
fn compare_values(actual: Option<&str>, op: &str, expected: &str) -> bool {
    let Some(actual) = actual else {
        return false;
    };

    if let (Ok(a), Ok(e)) = (actual.parse::<i64>(), expected.parse::<i64>()) {
        return match op {
            ">=" => a >= e,
            "<=" => a <= e,
            ">" => a > e,
            "<" => a < e,
            _ => false,
        };
    }

    false
}

/// A parsed event that can be executed.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// Type text (expands to one key press per character).
    Type(String),
    /// Sleep for a duration, applying responses that arrive meanwhile.
    Wait(Duration),
    /// Apply responses until no request is in flight.
    Settle,
    /// Resize the terminal.
    Resize(u16, u16),
    /// Capture a named frame.
    Snapshot(String),
    /// Assert something about the screen or state.
    Assert(Assertion),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => {
                let mut parts = Vec::new();
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    parts.push("ctrl".to_string());
                }
                if key.modifiers.contains(KeyModifiers::ALT) {
                    parts.push("alt".to_string());
                }
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    parts.push("shift".to_string());
                }
                parts.push(key_code_to_string(&key.code));
                write!(f, "key:{}", parts.join("+"))
            }
            Self::Type(text) => write!(f, "type:{}", text),
            Self::Wait(d) => write!(f, "wait:{}ms", d.as_millis()),
            Self::Settle => write!(f, "settle"),
            Self::Resize(w, h) => write!(f, "resize:{}x{}", w, h),
            Self::Snapshot(name) => write!(f, "snapshot:{}", name),
            Self::Assert(a) => write!(f, "assert:{}", a),
        }
    }
}

fn key_code_to_string(code: &KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        _ => "unknown".to_string(),
    }
}

/// Parser for the event DSL.
#[derive(Debug, Default)]
pub struct EventParser;

impl EventParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses all events from an input string.
    ///
    /// Events are separated by commas or newlines; lines starting with `#`
    /// are comments.
    pub fn parse_all(&self, input: &str) -> Result<Vec<Event>> {
        let mut events = Vec::new();

        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            for part in line.split(',') {
                let part = part.trim();
                if !part.is_empty() {
                    events.push(self.parse_one(part)?);
                }
            }
        }

        Ok(events)
    }

    /// Parses a single event string.
    pub fn parse_one(&self, input: &str) -> Result<Event> {
        let input = input.trim();

        if input.eq_ignore_ascii_case("settle") {
            return Ok(Event::Settle);
        }

        let Some((event_type, value)) = input.split_once(':') else {
            return Err(AppError::config(format!(
                "Invalid event syntax: '{}'. Expected type:value or settle",
                input
            )));
        };

        match event_type.trim().to_lowercase().as_str() {
            "key" => self.parse_key(value.trim()),
            // Leading spaces are part of the typed text
            "type" => Ok(Event::Type(value.to_string())),
            "wait" => self.parse_wait(value),
            "resize" => self.parse_resize(value.trim()),
            "snapshot" => Ok(Event::Snapshot(value.trim().to_string())),
            "assert" => self.parse_assert(value.trim()),
            other => Err(AppError::config(format!(
                "Unknown event type: '{}'. Valid types: key, type, wait, settle, resize, snapshot, assert",
                other
            ))),
        }
    }

    /// Parses a key event like "enter", "ctrl+r", "alt+enter".
    fn parse_key(&self, value: &str) -> Result<Event> {
        let (modifier_parts, key_str) = match value.rsplit_once('+') {
            // "+" on its own, or "ctrl++", names the plus key
            Some((mods, "")) => (mods.trim_end_matches('+'), "+"),
            Some((mods, key)) => (mods, key),
            None => ("", value),
        };

        let mut modifiers = KeyModifiers::empty();
        for part in modifier_parts.split('+').filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => {
                    return Err(AppError::config(format!(
                        "Unknown modifier: '{}'. Valid modifiers: ctrl, alt, shift",
                        part
                    )));
                }
            }
        }

        let code = self.parse_key_code(key_str)?;
        Ok(Event::Key(KeyEvent::new(code, modifiers)))
    }

    /// Parses a key code string into a KeyCode.
    fn parse_key_code(&self, s: &str) -> Result<KeyCode> {
        let code = match s.to_lowercase().as_str() {
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bs" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => {
                        return Err(AppError::config(format!(
                            "Unknown key: '{}'. Use single characters or named keys like enter, up, pageup",
                            s
                        )));
                    }
                }
            }
        };

        Ok(code)
    }

    /// Parses a wait duration like "100ms", "2s", or just "100" (milliseconds).
    fn parse_wait(&self, value: &str) -> Result<Event> {
        let value = value.trim().to_lowercase();
        let invalid = || AppError::config(format!("Invalid duration: '{}'", value));

        let duration = if let Some(ms) = value.strip_suffix("ms") {
            Duration::from_millis(ms.parse().map_err(|_| invalid())?)
        } else if let Some(secs) = value.strip_suffix('s') {
            Duration::from_secs(secs.parse().map_err(|_| invalid())?)
        } else {
            Duration::from_millis(value.parse().map_err(|_| invalid())?)
        };

        Ok(Event::Wait(duration))
    }

    /// Parses a resize event like "120x40".
    fn parse_resize(&self, value: &str) -> Result<Event> {
        let Some((width, height)) = value.split_once('x') else {
            return Err(AppError::config(format!(
                "Invalid resize format: '{}'. Expected WIDTHxHEIGHT",
                value
            )));
        };

        let width: u16 = width
            .parse()
            .map_err(|_| AppError::config(format!("Invalid width: '{}'", width)))?;
        let height: u16 = height
            .parse()
            .map_err(|_| AppError::config(format!("Invalid height: '{}'", height)))?;

        Ok(Event::Resize(width, height))
    }

    /// Parses an assertion like "contains:hello" or "state:loading=true".
    fn parse_assert(&self, value: &str) -> Result<Event> {
        let Some((assert_type, rest)) = value.split_once(':') else {
            return Err(AppError::config(format!(
                "Invalid assertion syntax: '{}'. Expected assert:type:value",
                value
            )));
        };
        let rest = rest.trim();

        let assertion = match assert_type.trim().to_lowercase().as_str() {
            "contains" => Assertion::Contains(rest.to_string()),
            "contains-exact" => Assertion::ContainsExact(rest.to_string()),
            "not-contains" => Assertion::NotContains(rest.to_string()),
            "matches" => {
                regex::Regex::new(rest).map_err(|e| {
                    AppError::config(format!("Invalid regex '{}': {}", rest, e))
                })?;
                Assertion::Matches(rest.to_string())
            }
            "state" => self.parse_state_assertion(rest)?,
            other => {
                return Err(AppError::config(format!(
                    "Unknown assertion type: '{}'. Valid types: contains, contains-exact, not-contains, matches, state",
                    other
                )));
            }
        };

        Ok(Event::Assert(assertion))
    }

    /// Parses a state assertion like "loading=false" or "result_rows>=2".
    fn parse_state_assertion(&self, value: &str) -> Result<Assertion> {
        for op in [">=", "<=", ">", "<", "="] {
            if let Some((field, val)) = value.split_once(op) {
                let field = field.trim().to_string();
                let val = val.trim().to_string();

                if !HeadlessState::FIELDS.contains(&field.as_str()) {
                    return Err(AppError::config(format!(
                        "Unknown state field: '{}'. Valid fields: {}",
                        field,
                        HeadlessState::FIELDS.join(", ")
                    )));
                }

                return Ok(if op == "=" {
                    Assertion::StateEquals { field, value: val }
                } else {
                    Assertion::StateCompare {
                        field,
                        op: op.to_string(),
                        value: val,
                    }
                });
            }
        }

        Err(AppError::config(format!(
            "Invalid state assertion: '{}'. Expected field=value or field>=value",
            value
        )))
    }
}
