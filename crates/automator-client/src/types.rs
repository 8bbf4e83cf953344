//! Request types mirroring the server's API contract.
//!
//! Only request bodies are typed. Response bodies stay `serde_json::Value`:
//! the backend enforces no response schema, and the formatting layer probes
//! shapes instead of deserializing.

use serde::Serialize;
use serde_json::Value;

/// Body for `POST /ai/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// Body for `POST /ai/process-nl` and `POST /ai/process-command`.
#[derive(Debug, Clone, Serialize)]
pub struct NaturalLanguageRequest {
    pub natural_language: String,
}

/// Body for `POST /adk/agent`.
#[derive(Debug, Clone, Serialize)]
pub struct AgentRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

/// Query parameters for `GET /github/commits/{owner}/{repo}`.
#[derive(Debug, Clone, Default)]
pub struct CommitQuery {
    /// Maximum number of commits (server default applies when unset).
    pub limit: Option<u32>,
    /// Branch to walk; the server falls back to the repository default.
    pub branch: Option<String>,
    /// ISO 8601 lower bound.
    pub since: Option<String>,
    /// ISO 8601 upper bound.
    pub until: Option<String>,
}

impl CommitQuery {
    pub(crate) fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(ref branch) = self.branch {
            pairs.push(("branch", branch.clone()));
        }
        if let Some(ref since) = self.since {
            pairs.push(("since", since.clone()));
        }
        if let Some(ref until) = self.until {
            pairs.push(("until", until.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_request_omits_empty_fields() {
        let body = serde_json::to_value(AgentRequest {
            prompt: "list my repos".into(),
            session_id: None,
            context: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "prompt": "list my repos" }));
    }

    #[test]
    fn test_agent_request_with_session() {
        let json = serde_json::to_string(&AgentRequest {
            prompt: "hi".into(),
            session_id: Some("abc".into()),
            context: None,
        })
        .unwrap();
        assert!(json.contains("session_id"));
        assert!(!json.contains("context"));
    }

    #[test]
    fn test_commit_query_pairs() {
        let query = CommitQuery {
            limit: Some(5),
            branch: Some("main".into()),
            since: None,
            until: Some("2024-06-01".into()),
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("limit", "5".to_string()),
                ("branch", "main".to_string()),
                ("until", "2024-06-01".to_string()),
            ]
        );
    }
}
