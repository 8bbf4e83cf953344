//! Dispatch: a classified command → backend call → response envelope.
//!
//! Every outcome is wrapped in the loose `{success, result | error}`
//! envelope the formatter and history expect. Agent responses already carry
//! envelope fields (`result`, `toolCalls`, `model_summary`, `error`), so
//! those pass through with only a `success` flag stamped on; plain Jira and
//! GitHub payloads are wrapped as the `result`.

use serde_json::{json, Value};

use automator_client::{CommitQuery, McpClient, ServerRegistry};
use automator_core::{ArgMap, ArgValue, BuiltIn, Entity, ParsedCommand};

/// Result of dispatching one command.
#[derive(Debug)]
pub struct Outcome {
    /// Raw backend payload (or a synthesized error object) for `--json`.
    pub payload: Value,
    /// Envelope fed to the formatter and recorded in history.
    pub envelope: Value,
    /// Whether the command resolved successfully.
    pub success: bool,
}

impl Outcome {
    fn from_body(body: Value) -> Self {
        let failed = body
            .get("error")
            .map(|e| !e.is_null())
            .unwrap_or(false);

        // Agent-style bodies are already envelopes; everything else wraps.
        let is_envelope = body.as_object().is_some_and(|o| {
            ["result", "toolCalls", "model_summary", "error"]
                .iter()
                .any(|k| o.contains_key(*k))
        });

        let envelope = if is_envelope {
            let mut envelope = body.clone();
            if let Some(obj) = envelope.as_object_mut() {
                obj.insert("success".to_string(), Value::Bool(!failed));
            }
            envelope
        } else {
            json!({ "success": true, "result": body })
        };

        Outcome {
            payload: body,
            envelope,
            success: !failed,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        let envelope = json!({ "success": false, "error": message.into() });
        Outcome {
            payload: envelope.clone(),
            envelope,
            success: false,
        }
    }
}

/// Execute one classified command against the registry's servers.
///
/// Infallible by design: every error path collapses into a failure
/// [`Outcome`] so the session always has something to render and record.
pub async fn execute(
    cmd: &ParsedCommand,
    registry: &mut ServerRegistry,
    session_id: Option<&str>,
) -> Outcome {
    match cmd {
        ParsedCommand::NaturalLanguage(text) => {
            let client = match registry.resolve(None) {
                Ok(client) => client.clone(),
                Err(e) => return Outcome::failure(e.to_string()),
            };
            run_client(client.agent().call(text, session_id, None).await)
        }
        ParsedCommand::Structured {
            entity,
            action,
            args,
        } => {
            // Explicit server qualifier beats the default; an unknown name is
            // reported, never silently rewritten.
            let server = args.get("server").and_then(ArgValue::as_text);
            let client = match registry.resolve(server) {
                Ok(client) => client.clone(),
                Err(e) => return Outcome::failure(e.to_string()),
            };
            execute_structured(*entity, action, args, &client).await
        }
        ParsedCommand::BuiltIn(BuiltIn::ClearContext) => {
            let client = match registry.resolve(None) {
                Ok(client) => client.clone(),
                Err(e) => return Outcome::failure(e.to_string()),
            };
            run_client(client.agent().clear_context(session_id).await)
        }
        ParsedCommand::BuiltIn(BuiltIn::Unknown(name)) => {
            Outcome::failure(format!("unknown command: /{name}"))
        }
        // Help and quit are intercepted by the session loop / one-shot
        // runner; kept total so a stray call still degrades gracefully.
        ParsedCommand::BuiltIn(_) => Outcome::failure("command is handled by the session loop"),
    }
}

async fn execute_structured(
    entity: Entity,
    action: &str,
    args: &ArgMap,
    client: &McpClient,
) -> Outcome {
    // `ai nl` is handled up front: its translated command is run through
    // `run_action`, which does not know `nl`, so translation cannot recurse.
    if let (Entity::Ai, "nl") = (entity, action) {
        return match require(args, "text", "ai nl --text <text>") {
            Ok(text) => translate_and_run(client, &text).await,
            Err(e) => e,
        };
    }
    run_action(entity, action, args, client).await
}

async fn run_action(entity: Entity, action: &str, args: &ArgMap, client: &McpClient) -> Outcome {
    match (entity, action) {
        (Entity::Jira, "get") => match require(args, "id", "jira get --id <ticket>") {
            Ok(id) => run_client(client.jira().issue(&id).await),
            Err(e) => e,
        },
        (Entity::Jira, "projects") => run_client(client.jira().projects().await),
        (Entity::Jira, "list-issues") => {
            match require(args, "project", "jira list-issues --project <key> [--status <status>]")
            {
                Ok(project) => {
                    let status = args.get("status").and_then(ArgValue::as_text);
                    run_client(client.jira().issues(&project, status).await)
                }
                Err(e) => e,
            }
        }
        (Entity::Jira, "summarize") => match require(args, "id", "jira summarize --id <ticket>") {
            Ok(id) => summarize_issue(client, &id).await,
            Err(e) => e,
        },
        (Entity::Github, "commits") => match commit_target(args) {
            Ok((owner, repo)) => {
                let query = match commit_query(args) {
                    Ok(query) => query,
                    Err(e) => return e,
                };
                run_client(client.github().commits(&owner, &repo, &query).await)
            }
            Err(e) => e,
        },
        (Entity::Ai, "generate") => match require(args, "prompt", "ai generate --prompt <text>") {
            Ok(prompt) => run_client(client.ai().generate(&prompt).await),
            Err(e) => e,
        },
        (Entity::Ai, "process") => match require(args, "text", "ai process --text <text>") {
            Ok(text) => run_client(client.ai().process_command(&text).await),
            Err(e) => e,
        },
        _ => Outcome::failure(format!(
            "unrecognized command for '{entity}'; type /help for usage"
        )),
    }
}

fn run_client(result: automator_client::Result<Value>) -> Outcome {
    match result {
        Ok(body) => Outcome::from_body(body),
        Err(e) => Outcome::failure(e.to_string()),
    }
}

fn require(args: &ArgMap, name: &str, usage: &str) -> Result<String, Outcome> {
    args.get(name)
        .and_then(ArgValue::as_text)
        .map(str::to_string)
        .ok_or_else(|| Outcome::failure(format!("missing --{name}; usage: {usage}")))
}

/// Owner/repo from `--repo owner/name`, or split `--owner` / `--repo` flags.
fn commit_target(args: &ArgMap) -> Result<(String, String), Outcome> {
    let repo = args.get("repo").and_then(ArgValue::as_text);
    let owner = args.get("owner").and_then(ArgValue::as_text);

    match (owner, repo) {
        (_, Some(spec)) if spec.contains('/') => {
            let (owner, repo) = spec.split_once('/').unwrap_or((spec, ""));
            if owner.is_empty() || repo.is_empty() {
                Err(Outcome::failure(format!("invalid repository spec '{spec}'")))
            } else {
                Ok((owner.to_string(), repo.to_string()))
            }
        }
        (Some(owner), Some(repo)) => Ok((owner.to_string(), repo.to_string())),
        _ => Err(Outcome::failure(
            "missing repository; usage: github commits --repo <owner>/<repo> \
             [--limit N] [--branch B] [--since DATE] [--until DATE]",
        )),
    }
}

fn commit_query(args: &ArgMap) -> Result<CommitQuery, Outcome> {
    let limit = match args.get("limit").and_then(ArgValue::as_text) {
        Some(raw) => match raw.parse::<u32>() {
            Ok(limit) => Some(limit),
            Err(_) => return Err(Outcome::failure(format!("invalid --limit '{raw}'"))),
        },
        None => None,
    };

    let text = |name: &str| args.get(name).and_then(ArgValue::as_text).map(str::to_string);

    Ok(CommitQuery {
        limit,
        branch: text("branch"),
        since: text("since"),
        until: text("until"),
    })
}

/// `jira summarize --id X`: fetch the issue, then ask the generation
/// endpoint for a short summary of its fields.
async fn summarize_issue(client: &McpClient, ticket_id: &str) -> Outcome {
    let issue = match client.jira().issue(ticket_id).await {
        Ok(issue) => issue,
        Err(e) => return Outcome::failure(e.to_string()),
    };

    let field = |key: &str| issue.get(key).and_then(Value::as_str).unwrap_or("");
    let prompt = format!(
        "Summarize this Jira issue in two or three sentences.\n\
         Ticket: {}\nTitle: {}\nStatus: {}\nAssignee: {}\nDescription: {}",
        field("ticket"),
        field("title"),
        field("status"),
        field("assignee"),
        field("description"),
    );

    run_client(client.ai().generate(&prompt).await)
}

/// `ai nl --text ...`: the backend translates the request into a CLI command
/// string; if it classifies as a structured command, execute it once. The
/// translation itself is shown when nothing executable comes back.
async fn translate_and_run(client: &McpClient, text: &str) -> Outcome {
    let body = match client.ai().process_natural_language(text).await {
        Ok(body) => body,
        Err(e) => return Outcome::failure(e.to_string()),
    };

    if let Some(command) = body.get("command").and_then(Value::as_str) {
        tracing::info!(command, "executing translated command");
        if let ParsedCommand::Structured {
            entity,
            action,
            args,
        } = automator_core::classify(command)
        {
            return run_action(entity, &action, &args, client).await;
        }
    }

    Outcome::from_body(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_outcome_shape() {
        let outcome = Outcome::failure("boom");
        assert!(!outcome.success);
        assert_eq!(outcome.envelope["success"], json!(false));
        assert_eq!(outcome.envelope["error"], json!("boom"));
    }

    #[test]
    fn test_plain_body_is_wrapped_as_result() {
        let outcome = Outcome::from_body(json!([{ "key": "TP", "name": "Test" }]));
        assert!(outcome.success);
        assert!(outcome.envelope["result"].is_array());
        assert!(outcome.payload.is_array());
    }

    #[test]
    fn test_agent_envelope_passes_through() {
        let outcome = Outcome::from_body(json!({
            "result": { "ticket": "ABC-1", "title": "t" },
            "toolCalls": [{ "name": "jira_fetch_issue" }],
            "model_summary": "Fetched."
        }));
        assert!(outcome.success);
        assert_eq!(outcome.envelope["success"], json!(true));
        assert_eq!(outcome.envelope["model_summary"], json!("Fetched."));
    }

    #[test]
    fn test_agent_error_envelope_marks_failure() {
        let outcome = Outcome::from_body(json!({
            "error": "email_required",
            "toolCalls": [],
            "details": "Recipient email address is required."
        }));
        assert!(!outcome.success);
        assert_eq!(outcome.envelope["success"], json!(false));
    }

    #[test]
    fn test_commit_target_forms() {
        let args = automator_core::tokenize_line("--repo octo/demo");
        assert_eq!(
            commit_target(&args).unwrap(),
            ("octo".to_string(), "demo".to_string())
        );

        let args = automator_core::tokenize_line("--owner octo --repo demo");
        assert_eq!(
            commit_target(&args).unwrap(),
            ("octo".to_string(), "demo".to_string())
        );

        let args = automator_core::tokenize_line("--branch main");
        assert!(commit_target(&args).is_err());
    }

    #[test]
    fn test_commit_query_rejects_bad_limit() {
        let args = automator_core::tokenize_line("--limit lots");
        assert!(commit_query(&args).is_err());

        let args = automator_core::tokenize_line("--limit 25 --branch dev");
        let query = commit_query(&args).unwrap();
        assert_eq!(query.limit, Some(25));
        assert_eq!(query.branch.as_deref(), Some("dev"));
    }

    #[tokio::test]
    async fn test_missing_required_flag_is_input_error() {
        let mut registry = ServerRegistry::new();
        registry.insert(
            automator_client::DEFAULT_SERVER,
            automator_client::ServerConfig::new("http://localhost:8000"),
        );

        let cmd = automator_core::classify("jira get");
        let outcome = execute(&cmd, &mut registry, None).await;
        assert!(!outcome.success);
        assert!(outcome.envelope["error"]
            .as_str()
            .unwrap()
            .contains("--id"));
    }

    #[tokio::test]
    async fn test_unrecognized_action_names_the_entity() {
        let mut registry = ServerRegistry::new();
        registry.insert(
            automator_client::DEFAULT_SERVER,
            automator_client::ServerConfig::new("http://localhost:8000"),
        );

        let cmd = automator_core::classify("jira destroy --id X");
        let outcome = execute(&cmd, &mut registry, None).await;
        assert!(!outcome.success);
        assert!(outcome.envelope["error"]
            .as_str()
            .unwrap()
            .contains("jira"));
    }

    #[tokio::test]
    async fn test_unknown_server_qualifier_is_reported() {
        let mut registry = ServerRegistry::new();
        registry.insert(
            automator_client::DEFAULT_SERVER,
            automator_client::ServerConfig::new("http://localhost:8000"),
        );

        let cmd = automator_core::classify("jira projects --server nope");
        let outcome = execute(&cmd, &mut registry, None).await;
        assert!(!outcome.success);
        assert!(outcome.envelope["error"]
            .as_str()
            .unwrap()
            .contains("nope"));
    }
}
