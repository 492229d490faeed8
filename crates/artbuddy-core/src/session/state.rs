//! Per-session state.

use serde::{Deserialize, Serialize};

use super::entry::ChatEntry;
use super::history::ChatHistory;
use super::input_mode::InputMode;

/// Where a session is in its submit cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Waiting for the user.
    #[default]
    Idle,
    /// A model call is in flight; no other submission is accepted.
    Submitting,
}

impl SessionPhase {
    pub fn is_submitting(self) -> bool {
        matches!(self, SessionPhase::Submitting)
    }
}

/// History plus input mode for exactly one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    history: ChatHistory,
    input_mode: InputMode,
}

impl SessionState {
    /// Fresh state: file mode and a history holding only `greeting`.
    pub fn init(greeting: impl Into<String>) -> Self {
        Self {
            history: ChatHistory::seeded(greeting),
            input_mode: InputMode::default(),
        }
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn append(&mut self, entry: ChatEntry) {
        self.history.append(entry);
    }

    /// Flips the input mode and returns the new one.
    pub fn toggle_mode(&mut self) -> InputMode {
        self.input_mode = self.input_mode.next();
        self.input_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_starts_in_file_mode_with_greeting() {
        let state = SessionState::init("hello");
        assert_eq!(state.input_mode(), InputMode::File);
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.history().entries()[0].as_text(), Some("hello"));
    }

    #[test]
    fn toggle_twice_returns_to_file() {
        let mut state = SessionState::init("hello");
        assert_eq!(state.toggle_mode(), InputMode::Camera);
        assert_eq!(state.toggle_mode(), InputMode::File);
        assert_eq!(state.history().len(), 1);
    }
}
