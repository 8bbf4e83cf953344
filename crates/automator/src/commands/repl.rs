//! Interactive session loop (read, classify, dispatch, format, repeat).

use std::time::Duration;

use anyhow::Result;
use console::{style, Style};
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

use automator_core::{classify, format, BuiltIn, ParsedCommand, Session};

use super::dispatch;
use super::Context;

/// Delay before exiting on `/quit`, long enough for the farewell to render.
const QUIT_GRACE: Duration = Duration::from_millis(200);

/// REPL state and configuration.
pub struct Repl<'a> {
    ctx: &'a mut Context,
    session: Session,
    editor: Editor<(), DefaultHistory>,
}

/// Control flow for the REPL.
enum ControlFlow {
    Continue,
    Exit,
}

/// Run the interactive loop until the user quits.
pub async fn run(ctx: &mut Context) -> Result<()> {
    Repl::new(ctx)?.run().await
}

impl<'a> Repl<'a> {
    fn new(ctx: &'a mut Context) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(true)
            .build();
        let editor = Editor::with_config(config)?;

        Ok(Self {
            ctx,
            session: Session::new(),
            editor,
        })
    }

    async fn run(&mut self) -> Result<()> {
        self.print_welcome();
        self.print_server_status().await;

        while !self.session.is_exiting() {
            let prompt = self.prompt();
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    match self.handle_line(&line).await {
                        ControlFlow::Continue => continue,
                        ControlFlow::Exit => break,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - drop the current line but keep the session.
                    println!();
                    self.print_dim("(Interrupted - type /quit to exit)");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D - exit.
                    println!();
                    break;
                }
                Err(e) => {
                    self.print_error(&format!("Input error: {e}"));
                    break;
                }
            }
        }

        self.print_dim("Goodbye!");
        tokio::time::sleep(QUIT_GRACE).await;
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> ControlFlow {
        let cmd = classify(line);

        // Local built-ins short-circuit before any dispatch.
        match cmd {
            ParsedCommand::BuiltIn(BuiltIn::Help) => {
                self.print_help();
                return ControlFlow::Continue;
            }
            ParsedCommand::BuiltIn(BuiltIn::Quit) => {
                self.session.request_exit();
                return ControlFlow::Exit;
            }
            _ => {}
        }

        if let Err(e) = self.session.begin() {
            self.print_error(&format!("Cannot submit: {e}"));
            return ControlFlow::Continue;
        }

        let spinner = self.spinner();
        let session_id = self.session.id().to_string();
        let outcome = dispatch::execute(&cmd, &mut self.ctx.registry, Some(&session_id)).await;
        spinner.finish_and_clear();

        if self.ctx.json_output {
            println!(
                "{}",
                serde_json::to_string_pretty(&outcome.payload)
                    .unwrap_or_else(|_| outcome.payload.to_string())
            );
        } else {
            let text = format(&outcome.envelope);
            if outcome.success {
                println!("{text}");
            } else {
                let red = Style::new().red();
                println!("{}", red.apply_to(text));
            }
        }

        self.session.finish(line, outcome.envelope, outcome.success);
        if self.ctx.verbose {
            self.print_dim(&format!("({} in history)", self.session.history().len()));
        }

        ControlFlow::Continue
    }

    /// Probe the default server once at startup. A dead server is only a
    /// warning; every later request reports its own transport errors.
    async fn print_server_status(&mut self) {
        let client = match self.ctx.registry.resolve(None) {
            Ok(client) => client.clone(),
            Err(e) => {
                self.print_error(&e.to_string());
                return;
            }
        };
        match client.health().await {
            Ok(_) => self.print_dim(&format!("Connected to {}", client.base_url())),
            Err(e) => {
                self.print_dim(&format!("Server not reachable at {}", client.base_url()));
                if self.ctx.verbose {
                    self.print_dim(&format!("  {e}"));
                }
            }
        }
        println!();
    }

    fn spinner(&self) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("waiting for backend...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    fn prompt(&self) -> String {
        format!("{} ", style("automator>").cyan().bold())
    }

    fn print_welcome(&self) {
        let dim = Style::new().dim();
        println!();
        println!("{}", style("Automator").bold().cyan());
        println!("{}", dim.apply_to("─".repeat(40)));
        println!(
            "{}",
            dim.apply_to("Structured commands (jira, github, ai) or plain English.")
        );
        println!(
            "{}",
            dim.apply_to("Use /help for commands, Ctrl+D to exit.")
        );
        println!();
    }

    fn print_help(&self) {
        let dim = Style::new().dim();
        println!();
        println!("{}", style("Available Commands").bold());
        println!("{}", dim.apply_to("─".repeat(40)));
        println!(
            "  {}  - Fetch a Jira issue",
            style("jira get --id <ticket>").cyan()
        );
        println!("  {}  - List Jira projects", style("jira projects").cyan());
        println!(
            "  {}  - List issues in a project",
            style("jira list-issues --project <key> [--status <s>]").cyan()
        );
        println!(
            "  {}  - AI summary of an issue",
            style("jira summarize --id <ticket>").cyan()
        );
        println!(
            "  {}  - Commit history",
            style("github commits --repo <owner>/<repo> [--limit N] [--branch B]").cyan()
        );
        println!(
            "  {}  - Free-form generation",
            style("ai generate --prompt <text>").cyan()
        );
        println!(
            "  {}  - Translate English to a command and run it",
            style("ai nl --text <text>").cyan()
        );
        println!(
            "  {}  - Translate and execute server-side",
            style("ai process --text <text>").cyan()
        );
        println!();
        println!(
            "{}",
            dim.apply_to("Anything else is sent to the agent as natural language.")
        );
        println!();
        println!("  {}  - Show this help", style("/help").cyan());
        println!(
            "  {}  - Clear backend conversation context",
            style("/clearcontext").cyan()
        );
        println!("  {}  - Exit", style("/quit, /exit").cyan());
        println!();
    }

    fn print_dim(&self, msg: &str) {
        let dim = Style::new().dim();
        println!("{}", dim.apply_to(msg));
    }

    fn print_error(&self, msg: &str) {
        let red = Style::new().red();
        println!("{} {}", red.apply_to("Error:"), msg);
    }
}
