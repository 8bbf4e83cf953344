//! Best-effort rendering of loosely-typed backend JSON into display text.
//!
//! The backend never promises a schema: Jira and GitHub operations return
//! their raw service payloads, the agent endpoint wraps tool output in a
//! `result` / `toolCalls` / `model_summary` envelope, and failures may carry
//! `error` plus a nested `detail`. Rather than ad hoc field probing, the
//! payload is first mapped to a tagged [`Payload`] view and then matched
//! against ordered `(predicate, renderer)` tables, so adding a new response
//! shape is one new table entry. Anything unrecognized degrades to indented
//! JSON; this function never panics and always produces some text.

use serde_json::Value;

/// Sentinel rendered for an empty `result` array.
pub const NO_ITEMS: &str = "No items found.";

/// Render a backend response envelope as display text.
pub fn format(response: &Value) -> String {
    match payload_of(response) {
        Payload::Failure { message, detail } => match detail {
            Some(detail) => format!("Error: {message}\n{detail}"),
            None => format!("Error: {message}"),
        },
        Payload::Items(items) => render_items(items),
        Payload::Item(item) => render_item(item),
        Payload::Text(text) => format!("Result: {text}"),
        Payload::Summary(text) => text.to_string(),
        Payload::ToolCalls(calls) => render_tool_calls(calls),
        Payload::Opaque(value) => pretty(value),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tagged payload view
// ─────────────────────────────────────────────────────────────────────────────

/// Shape classification of one backend response, in probe priority order.
enum Payload<'a> {
    /// `success == false` or an `error` field.
    Failure {
        message: String,
        detail: Option<String>,
    },
    /// `result` is an array.
    Items(&'a [Value]),
    /// `result` is a single object.
    Item(&'a Value),
    /// `result` is a plain string.
    Text(&'a str),
    /// No usable `result`, but a `model_summary` was carried.
    Summary(&'a str),
    /// No usable `result`, but tool invocations were recorded.
    ToolCalls(&'a [Value]),
    /// Nothing matched; the payload is shown as indented JSON.
    Opaque(&'a Value),
}

fn payload_of(response: &Value) -> Payload<'_> {
    let Some(obj) = response.as_object() else {
        return Payload::Opaque(response);
    };

    let failed = matches!(obj.get("success"), Some(Value::Bool(false)));
    let error = obj.get("error").filter(|e| !e.is_null());
    if failed || error.is_some() {
        let message = error
            .map(|e| match e {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .or_else(|| str_of(response, "message").map(str::to_string))
            .unwrap_or_else(|| "request failed".to_string());
        let detail = str_of(response, "detail")
            .or_else(|| str_of(response, "details"))
            .map(str::to_string);
        return Payload::Failure { message, detail };
    }

    match obj.get("result") {
        Some(Value::Array(items)) => return Payload::Items(items),
        Some(Value::String(text)) => return Payload::Text(text),
        Some(Value::Object(_)) => return Payload::Item(&obj["result"]),
        Some(Value::Null) | None => {}
        // Numeric or boolean results are rare enough to fall through raw.
        Some(other) => return Payload::Opaque(other),
    }

    if let Some(summary) = str_of(response, "model_summary").filter(|s| !s.trim().is_empty()) {
        return Payload::Summary(summary);
    }
    if let Some(Value::Array(calls)) = obj.get("toolCalls") {
        if !calls.is_empty() {
            return Payload::ToolCalls(calls);
        }
    }

    Payload::Opaque(response)
}

// ─────────────────────────────────────────────────────────────────────────────
// List rendering
// ─────────────────────────────────────────────────────────────────────────────

type Probe = fn(&Value) -> bool;
type Render = fn(&Value) -> String;

/// Entity probes for array elements, most specific first. The first element
/// picks the renderer for the whole list.
const LIST_PROBES: &[(Probe, Render)] = &[
    (is_repository, render_repository),
    (is_pull_request, render_pull_request),
    (is_github_issue, render_github_issue),
    (is_branch, render_branch),
    (is_commit, render_commit),
    (is_file_diff, render_file_diff),
    (is_jira_project, render_jira_project),
    (is_transition, render_transition),
    (is_jira_issue, render_jira_issue),
];

fn render_items(items: &[Value]) -> String {
    let Some(first) = items.first() else {
        return NO_ITEMS.to_string();
    };

    let render = LIST_PROBES
        .iter()
        .find(|(probe, _)| probe(first))
        .map(|(_, render)| *render)
        .unwrap_or(compact);

    items
        .iter()
        .map(|item| format!("• {}", render(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_repository(v: &Value) -> bool {
    has(v, "full_name")
}

fn render_repository(v: &Value) -> String {
    let name = str_of(v, "name").unwrap_or("?");
    let full_name = str_of(v, "full_name").unwrap_or("?");
    let visibility = if v.get("private").and_then(Value::as_bool).unwrap_or(false) {
        "private"
    } else {
        "public"
    };
    format!("{name} ({full_name}) [{visibility}]")
}

fn is_pull_request(v: &Value) -> bool {
    has(v, "number") && (has(v, "head") || has(v, "base") || has(v, "merged_at"))
}

fn render_pull_request(v: &Value) -> String {
    let number = num_of(v, "number");
    let title = str_of(v, "title").unwrap_or("");
    let state = str_of(v, "state").unwrap_or("open");
    match (git_ref(v, "head"), git_ref(v, "base")) {
        (Some(head), Some(base)) => format!("#{number} {title} ({head} -> {base}, {state})"),
        _ => format!("#{number} {title} ({state})"),
    }
}

fn is_github_issue(v: &Value) -> bool {
    has(v, "number") && has(v, "title")
}

fn render_github_issue(v: &Value) -> String {
    format!(
        "#{} {} ({})",
        num_of(v, "number"),
        str_of(v, "title").unwrap_or(""),
        str_of(v, "state").unwrap_or("open")
    )
}

fn is_branch(v: &Value) -> bool {
    has(v, "name") && (has(v, "protected") || has(v, "commit"))
}

fn render_branch(v: &Value) -> String {
    let name = str_of(v, "name").unwrap_or("?");
    if v.get("protected").and_then(Value::as_bool).unwrap_or(false) {
        format!("{name} [protected]")
    } else {
        name.to_string()
    }
}

fn is_commit(v: &Value) -> bool {
    has(v, "sha")
}

fn render_commit(v: &Value) -> String {
    let sha = str_of(v, "sha").unwrap_or("");
    let short = short_sha(sha);
    let message = str_of(v, "message")
        .and_then(|m| m.lines().next())
        .unwrap_or("");
    let author = v
        .get("author")
        .and_then(|a| a.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let date = v
        .get("author")
        .and_then(|a| a.get("date"))
        .and_then(Value::as_str)
        .unwrap_or("");
    if date.is_empty() {
        format!("{short} {message} ({author})")
    } else {
        format!("{short} {message} ({author}, {date})")
    }
}

fn is_file_diff(v: &Value) -> bool {
    has(v, "filename") && (has(v, "additions") || has(v, "deletions") || has(v, "status"))
}

fn render_file_diff(v: &Value) -> String {
    format!(
        "{} +{} -{} ({})",
        str_of(v, "filename").unwrap_or("?"),
        num_of(v, "additions"),
        num_of(v, "deletions"),
        str_of(v, "status").unwrap_or("changed")
    )
}

fn is_jira_project(v: &Value) -> bool {
    has(v, "key") && has(v, "name") && !has(v, "summary")
}

fn render_jira_project(v: &Value) -> String {
    format!(
        "{}: {}",
        str_of(v, "key").unwrap_or("?"),
        str_of(v, "name").unwrap_or("")
    )
}

fn is_transition(v: &Value) -> bool {
    has(v, "id") && has(v, "name") && has(v, "to")
}

fn render_transition(v: &Value) -> String {
    let target = v
        .get("to")
        .and_then(|t| t.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("?");
    format!(
        "{}: {} -> {}",
        str_of(v, "id").unwrap_or("?"),
        str_of(v, "name").unwrap_or(""),
        target
    )
}

fn is_jira_issue(v: &Value) -> bool {
    has(v, "key") && has(v, "summary")
}

fn render_jira_issue(v: &Value) -> String {
    let key = str_of(v, "key").unwrap_or("?");
    let summary = str_of(v, "summary").unwrap_or("");
    let status = str_of(v, "status").unwrap_or("?");
    let assignee = str_of(v, "assignee").unwrap_or("Unassigned");
    format!("{key}: {summary} [{status}] ({assignee})")
}

// ─────────────────────────────────────────────────────────────────────────────
// Single-object rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Probes for a single `result` object, in cascade order: created branch,
/// created issue, merged/closed PR, created PR, email status, transitioned
/// issue, issue detail, then the loose AI shapes.
const ITEM_PROBES: &[(Probe, Render)] = &[
    (is_created_branch, render_created_branch),
    (is_created_issue, render_created_issue),
    (is_merged_or_closed_pr, render_merged_or_closed_pr),
    (is_created_pr, render_created_pr),
    (is_email_status, render_email_status),
    (is_transitioned_issue, render_transitioned_issue),
    (is_issue_detail, render_issue_detail),
    (is_processed_command, render_processed_command),
    (is_ai_response, render_ai_response),
];

fn render_item(v: &Value) -> String {
    let mut text = ITEM_PROBES
        .iter()
        .find(|(probe, _)| probe(v))
        .map(|(_, render)| render(v))
        .unwrap_or_else(|| pretty(v));

    // Email-notification sub-status, carried on e.g. closed-PR results.
    if let Some(workflow) = v.get("email_workflow") {
        let line = str_of(workflow, "message")
            .or_else(|| str_of(workflow, "status"))
            .unwrap_or("pending");
        text.push_str(&format!("\nEmail: {line}"));
    }
    if let Some(err) = str_of(v, "email_error") {
        text.push_str(&format!("\nEmail error: {err}"));
    }

    text
}

fn is_created_branch(v: &Value) -> bool {
    str_of(v, "ref").is_some_and(|r| r.starts_with("refs/"))
        || (has(v, "name") && has(v, "commit") && !has(v, "number"))
}

fn render_created_branch(v: &Value) -> String {
    let name = str_of(v, "ref")
        .map(|r| r.trim_start_matches("refs/heads/"))
        .or_else(|| str_of(v, "name"))
        .unwrap_or("?");
    let sha = v
        .get("commit")
        .and_then(|c| c.get("sha"))
        .or_else(|| v.get("object").and_then(|o| o.get("sha")))
        .and_then(Value::as_str);
    match sha {
        Some(sha) => format!("Created branch '{}' (at {})", name, short_sha(sha)),
        None => format!("Created branch '{name}'"),
    }
}

fn is_created_issue(v: &Value) -> bool {
    has(v, "number")
        && has(v, "title")
        && !has(v, "head")
        && !has(v, "base")
        && !has(v, "merged")
        && !has(v, "merged_at")
}

fn render_created_issue(v: &Value) -> String {
    let mut text = format!(
        "Created issue #{}: {}",
        num_of(v, "number"),
        str_of(v, "title").unwrap_or("")
    );
    if let Some(url) = str_of(v, "html_url") {
        text.push_str(&format!("\n{url}"));
    }
    text
}

fn is_merged_or_closed_pr(v: &Value) -> bool {
    v.get("merged").and_then(Value::as_bool).unwrap_or(false)
        || v.get("merged_at").is_some_and(|m| !m.is_null())
        || (has(v, "number") && matches!(str_of(v, "state"), Some("closed") | Some("merged")))
}

fn render_merged_or_closed_pr(v: &Value) -> String {
    let merged = v.get("merged").and_then(Value::as_bool).unwrap_or(false)
        || v.get("merged_at").is_some_and(|m| !m.is_null());
    let verb = if merged { "merged" } else { "closed" };
    match str_of(v, "title") {
        Some(title) => format!("Pull request #{} {}: {}", num_of(v, "number"), verb, title),
        None => format!("Pull request #{} {}", num_of(v, "number"), verb),
    }
}

fn is_created_pr(v: &Value) -> bool {
    has(v, "number") && (has(v, "head") || has(v, "base"))
}

fn render_created_pr(v: &Value) -> String {
    let mut text = format!(
        "Created pull request #{}: {}",
        num_of(v, "number"),
        str_of(v, "title").unwrap_or("")
    );
    if let (Some(head), Some(base)) = (git_ref(v, "head"), git_ref(v, "base")) {
        text.push_str(&format!(" ({head} -> {base})"));
    }
    if let Some(url) = str_of(v, "html_url") {
        text.push_str(&format!("\n{url}"));
    }
    text
}

/// Email workflow statuses produced by the backend's tool runners.
const EMAIL_STATUSES: &[&str] = &[
    "initial_summary_generated",
    "summary_regenerated",
    "email_sent_successfully",
    "email_failed",
    "sent",
];

fn is_email_status(v: &Value) -> bool {
    str_of(v, "status").is_some_and(|s| EMAIL_STATUSES.contains(&s))
        || has(v, "enhanced_summary")
        || has(v, "initial_summary")
        || has(v, "email_result")
}

fn render_email_status(v: &Value) -> String {
    let status = str_of(v, "status").unwrap_or("");
    match status {
        "email_sent_successfully" | "sent" => {
            let mut text = "Email sent".to_string();
            if let Some(message) = str_of(v, "message") {
                text.push_str(&format!(": {message}"));
            }
            text
        }
        "email_failed" => format!(
            "Email failed: {}",
            str_of(v, "error").unwrap_or("unknown error")
        ),
        _ => {
            // Draft preview: initial or regenerated summary awaiting feedback.
            let summary = str_of(v, "enhanced_summary")
                .or_else(|| str_of(v, "initial_summary"))
                .unwrap_or("");
            let mut text = format!("Email draft:\n{summary}");
            if let Some(message) = str_of(v, "message") {
                text.push_str(&format!("\n{message}"));
            }
            text
        }
    }
}

fn is_transitioned_issue(v: &Value) -> bool {
    has(v, "transitioned_to")
        || str_of(v, "status") == Some("transitioned")
        || (has(v, "ticket") && has(v, "transition"))
}

fn render_transitioned_issue(v: &Value) -> String {
    let ticket = str_of(v, "ticket").unwrap_or("issue");
    let target = str_of(v, "transitioned_to")
        .or_else(|| str_of(v, "transition"))
        .or_else(|| str_of(v, "message"));
    match target {
        Some(target) => format!("Issue {ticket} transitioned to {target}"),
        None => format!("Issue {ticket} transitioned"),
    }
}

fn is_issue_detail(v: &Value) -> bool {
    has(v, "ticket") && has(v, "title")
}

fn render_issue_detail(v: &Value) -> String {
    let mut lines = vec![
        format!(
            "{}: {}",
            str_of(v, "ticket").unwrap_or("?"),
            str_of(v, "title").unwrap_or("")
        ),
        format!("Status:   {}", str_of(v, "status").unwrap_or("?")),
        format!("Assignee: {}", str_of(v, "assignee").unwrap_or("Unassigned")),
    ];
    if let Some(description) = str_of(v, "description").filter(|d| !d.trim().is_empty()) {
        lines.push(description.to_string());
    }
    if let Some(url) = str_of(v, "url") {
        lines.push(url.to_string());
    }
    lines.join("\n")
}

fn is_processed_command(v: &Value) -> bool {
    has(v, "command") && has(v, "explanation")
}

fn render_processed_command(v: &Value) -> String {
    format!(
        "Command: {}\n{}",
        str_of(v, "command").unwrap_or(""),
        str_of(v, "explanation").unwrap_or("")
    )
}

fn is_ai_response(v: &Value) -> bool {
    str_of(v, "response").is_some()
}

fn render_ai_response(v: &Value) -> String {
    str_of(v, "response").unwrap_or("").to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool calls and helpers
// ─────────────────────────────────────────────────────────────────────────────

fn render_tool_calls(calls: &[Value]) -> String {
    let names: Vec<&str> = calls
        .iter()
        .map(|c| str_of(c, "name").unwrap_or("?"))
        .collect();
    format!("Invoked tools: {}", names.join(", "))
}

fn has(v: &Value, key: &str) -> bool {
    v.get(key).is_some_and(|f| !f.is_null())
}

fn str_of<'a>(v: &'a Value, key: &str) -> Option<&'a str> {
    v.get(key).and_then(Value::as_str)
}

fn num_of(v: &Value, key: &str) -> i64 {
    v.get(key).and_then(Value::as_i64).unwrap_or(0)
}

/// `head`/`base` on a pull request may be a plain ref string or a GitHub
/// object carrying `ref`.
fn git_ref<'a>(v: &'a Value, key: &str) -> Option<&'a str> {
    match v.get(key)? {
        Value::String(s) => Some(s),
        obj => obj.get("ref").and_then(Value::as_str),
    }
}

fn short_sha(sha: &str) -> String {
    sha.chars().take(7).collect()
}

fn pretty(v: &Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

fn compact(v: &Value) -> String {
    v.to_string()
}
