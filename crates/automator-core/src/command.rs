//! Command classification: raw input line → [`ParsedCommand`].

use std::fmt;

use crate::tokenize::{tokenize, ArgMap};

/// A REPL built-in, handled locally (except `/clearcontext`, which is
/// forwarded to the backend).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuiltIn {
    Help,
    Quit,
    ClearContext,
    /// Unrecognized `/xxx` input. Renders an "unknown command" line rather
    /// than failing the session.
    Unknown(String),
}

/// Entity prefix of a structured command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Jira,
    Github,
    Ai,
}

impl Entity {
    /// Parse a candidate entity token, case-insensitively.
    pub fn parse(token: &str) -> Option<Entity> {
        match token.to_ascii_lowercase().as_str() {
            "jira" => Some(Entity::Jira),
            "github" => Some(Entity::Github),
            "ai" => Some(Entity::Ai),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Jira => "jira",
            Entity::Github => "github",
            Entity::Ai => "ai",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one submitted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// Slash command.
    BuiltIn(BuiltIn),
    /// `entity action --flags` grammar. `action` is empty when the user
    /// typed the bare entity; dispatch reports that as unrecognized.
    Structured {
        entity: Entity,
        action: String,
        args: ArgMap,
    },
    /// Everything else: the full trimmed line, forwarded verbatim to the
    /// agent endpoint.
    NaturalLanguage(String),
}

/// Classify a raw input line.
///
/// Priority order: built-in (`/...`), then structured entity prefix, then
/// natural language. State-free and infallible: malformed input degrades to
/// a variant the dispatcher can report inline.
pub fn classify(input: &str) -> ParsedCommand {
    let trimmed = input.trim();

    if let Some(rest) = trimmed.strip_prefix('/') {
        let name = rest
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        let builtin = match name.as_str() {
            "help" => BuiltIn::Help,
            "quit" | "exit" => BuiltIn::Quit,
            "clearcontext" => BuiltIn::ClearContext,
            _ => BuiltIn::Unknown(name),
        };
        return ParsedCommand::BuiltIn(builtin);
    }

    let mut tokens = trimmed.split_whitespace();
    if let Some(first) = tokens.next() {
        if let Some(entity) = Entity::parse(first) {
            let action = tokens
                .next()
                .map(|t| t.to_ascii_lowercase())
                .unwrap_or_default();
            let args = tokenize(tokens);
            return ParsedCommand::Structured {
                entity,
                action,
                args,
            };
        }
    }

    ParsedCommand::NaturalLanguage(trimmed.to_string())
}
