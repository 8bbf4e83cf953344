//! Lenient flag/value tokenizer for structured command arguments.
//!
//! Users type free-form text that may not perfectly match flag syntax, so
//! nothing here ever errors: tokens that are not part of a `--flag [value]`
//! pair are silently discarded.

use std::collections::BTreeMap;

/// Value carried by a parsed flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// The flag consumed the following token as its value.
    Text(String),
    /// The flag stood alone (followed by another flag or end of input) and
    /// reads as boolean `true`.
    Switch,
}

impl ArgValue {
    /// The textual value, if this flag carried one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            ArgValue::Switch => None,
        }
    }

    /// Whether this flag was a bare switch.
    pub fn is_switch(&self) -> bool {
        matches!(self, ArgValue::Switch)
    }
}

/// Ordered flag-name → value mapping produced by the tokenizer.
pub type ArgMap = BTreeMap<String, ArgValue>;

/// Tokenize a sequence of whitespace-split tokens into an [`ArgMap`].
///
/// Scan rules:
/// - `--name value` → `name` maps to `value`, scan advances two tokens;
/// - `--name --other ...` → `name` maps to [`ArgValue::Switch`], scan
///   advances one token;
/// - anything else (positionals, a bare `--`) is dropped.
pub fn tokenize<'a, I>(tokens: I) -> ArgMap
where
    I: IntoIterator<Item = &'a str>,
{
    let tokens: Vec<&str> = tokens.into_iter().collect();
    let mut args = ArgMap::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        let name = match token.strip_prefix("--") {
            Some(name) if !name.is_empty() => name,
            // Positional or bare `--`: implicit discard.
            _ => {
                i += 1;
                continue;
            }
        };

        match tokens.get(i + 1) {
            Some(next) if !next.starts_with("--") => {
                args.insert(name.to_string(), ArgValue::Text((*next).to_string()));
                i += 2;
            }
            _ => {
                args.insert(name.to_string(), ArgValue::Switch);
                i += 1;
            }
        }
    }

    args
}

/// Tokenize the flag portion of a raw command line.
pub fn tokenize_line(rest: &str) -> ArgMap {
    tokenize(rest.split_whitespace())
}
