//! One-shot execution: classify the argv words, run once, exit 0 or 1.

use anyhow::Result;

use automator_core::{classify, format, ArgValue, BuiltIn, ParsedCommand};

use super::dispatch;
use super::Context;

/// Execute a single command line and return the process exit code.
pub async fn run(words: &[String], ctx: &mut Context) -> Result<i32> {
    let line = words.join(" ");
    let cmd = classify(&line);

    match &cmd {
        ParsedCommand::BuiltIn(BuiltIn::Help) => {
            print_usage();
            return Ok(0);
        }
        ParsedCommand::BuiltIn(BuiltIn::Quit) => {
            // Nothing to quit outside the interactive loop.
            return Ok(0);
        }
        ParsedCommand::BuiltIn(BuiltIn::Unknown(name)) => {
            eprintln!("Unknown command: /{name}");
            return Ok(1);
        }
        _ => {}
    }

    // `--json` may arrive as a global flag or inside the command itself.
    let json = ctx.json_output
        || matches!(&cmd, ParsedCommand::Structured { args, .. }
            if args.get("json").is_some_and(ArgValue::is_switch));

    let outcome = dispatch::execute(&cmd, &mut ctx.registry, None).await;

    if json {
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
            eprintln!("{text}");
        }
    }

    Ok(if outcome.success { 0 } else { 1 })
}

fn print_usage() {
    println!("Usage: automator [OPTIONS] [COMMAND...]");
    println!();
    println!("Run without a command for the interactive session.");
    println!();
    println!("Commands:");
    println!("  jira get --id <ticket>");
    println!("  jira projects");
    println!("  jira list-issues --project <key> [--status <status>]");
    println!("  jira summarize --id <ticket>");
    println!("  github commits --repo <owner>/<repo> [--limit N] [--branch B] [--since D] [--until D]");
    println!("  ai generate --prompt <text>");
    println!("  ai nl --text <text>");
    println!("  ai process --text <text>");
    println!("  <anything else>   forwarded to the agent as natural language");
    println!();
    println!("Options:");
    println!("  --json     print the raw backend payload");
    println!("  --server   override the backend base URL");
    println!("  --verbose  debug logging");
}
