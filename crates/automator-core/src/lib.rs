//! Parsing and formatting core for the automator terminal client.
//!
//! This crate is pure logic: no I/O, no HTTP. It covers the pipeline a
//! submitted line travels before and after the backend call:
//!
//! - [`tokenize`]: lenient `--flag value` argument tokenizer
//! - [`command`]: classifier from a raw line to a [`command::ParsedCommand`]
//! - [`format`]: shape-probe rendering of loosely-typed backend JSON
//! - [`history`]: append-only per-session command log
//! - [`session`]: the `Idle / Awaiting / Exiting` submission state machine

pub mod command;
pub mod format;
pub mod history;
pub mod session;
pub mod tokenize;

pub use command::{classify, BuiltIn, Entity, ParsedCommand};
pub use format::format;
pub use history::{History, HistoryEntry};
pub use session::{Session, SessionError, SessionState};
pub use tokenize::{tokenize, tokenize_line, ArgMap, ArgValue};
