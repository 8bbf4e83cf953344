//! Session lifecycle: one command in flight at a time.
//!
//! The historical client gated submissions behind a boolean "busy" flag in
//! the UI layer. Here the gate is an explicit state machine: `Idle` accepts a
//! submission, `Awaiting` rejects further ones until the outstanding request
//! resolves, and `Exiting` is terminal. The interactive loop awaits each
//! dispatch before reading the next line, so `Busy` is unreachable there; the
//! machine still enforces it for any other driver.

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::history::History;

/// Submission gate states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready to accept a command.
    Idle,
    /// A request is outstanding; new submissions are rejected.
    Awaiting,
    /// The user quit; no further submissions.
    Exiting,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a request is already in flight")]
    Busy,
    #[error("the session is exiting")]
    Exiting,
}

/// One interactive session: id, submission gate, and history.
#[derive(Debug)]
pub struct Session {
    id: String,
    state: SessionState,
    history: History,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            state: SessionState::Idle,
            history: History::new(),
        }
    }

    /// Backend session id, sent with agent calls so server-side context can
    /// accumulate across turns.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Begin a submission: `Idle -> Awaiting`.
    pub fn begin(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle => {
                self.state = SessionState::Awaiting;
                Ok(())
            }
            SessionState::Awaiting => Err(SessionError::Busy),
            SessionState::Exiting => Err(SessionError::Exiting),
        }
    }

    /// Resolve the outstanding submission, recording it in history:
    /// `Awaiting -> Idle`. A session already marked `Exiting` stays terminal
    /// but the entry is still recorded so history stays complete.
    pub fn finish(&mut self, command: impl Into<String>, response: Value, success: bool) {
        self.history.record(command, response, success);
        if self.state == SessionState::Awaiting {
            self.state = SessionState::Idle;
        }
    }

    /// Transition to the terminal `Exiting` state.
    pub fn request_exit(&mut self) {
        self.state = SessionState::Exiting;
    }

    pub fn is_exiting(&self) -> bool {
        self.state == SessionState::Exiting
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_begin_finish_cycle() {
        let mut session = Session::new();
        assert_eq!(session.state(), SessionState::Idle);

        session.begin().unwrap();
        assert_eq!(session.state(), SessionState::Awaiting);

        session.finish("jira projects", json!({ "success": true }), true);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_begin_while_awaiting_is_rejected() {
        let mut session = Session::new();
        session.begin().unwrap();
        assert_eq!(session.begin(), Err(SessionError::Busy));
    }

    #[test]
    fn test_exiting_is_terminal() {
        let mut session = Session::new();
        session.request_exit();
        assert!(session.is_exiting());
        assert_eq!(session.begin(), Err(SessionError::Exiting));
    }

    #[test]
    fn test_history_counts_failures() {
        let mut session = Session::new();
        for i in 0..3 {
            session.begin().unwrap();
            session.finish(format!("cmd {i}"), json!({ "success": i != 1 }), i != 1);
        }
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(Session::new().id(), Session::new().id());
    }
}
