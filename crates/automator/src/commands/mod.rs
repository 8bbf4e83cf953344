//! CLI command handlers.

pub mod dispatch;
pub mod repl;
pub mod run;

use automator_client::ServerRegistry;

/// Shared context for all commands.
#[derive(Debug)]
pub struct Context {
    /// Logical server registry (owns the cached clients).
    pub registry: ServerRegistry,
    /// Output raw JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}
