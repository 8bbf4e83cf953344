//! Automator - terminal client for the MCP automation backend.
//!
//! Main entry point for the automator CLI.

use anyhow::Result;
use clap::Parser;

mod commands;

use automator_client::ServerRegistry;
use commands::{repl, run, Context};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Terminal client for Jira, GitHub and AI-agent automation.
#[derive(Parser)]
#[command(name = "automator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output raw backend JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Backend base URL (default: http://localhost:8000)
    #[arg(long, global = true, env = "AUTOMATOR_SERVER_URL")]
    pub server: Option<String>,

    /// One-shot command; omit for the interactive session
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "automator=debug,automator_client=debug,automator_core=debug,info"
    } else {
        "automator=info,automator_client=info,warn"
    };

    let log_dir = dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|d| d.join("automator").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "automator.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "automator=trace,automator_client=trace,automator_core=trace,info",
                )),
        )
        .init();

    let mut ctx = Context {
        registry: ServerRegistry::from_env(cli.server.as_deref()),
        json_output: cli.json,
        verbose: cli.verbose,
    };

    if cli.command.is_empty() {
        repl::run(&mut ctx).await
    } else {
        let code = run::run(&cli.command, &mut ctx).await?;
        std::process::exit(code);
    }
}
