//! Jira API.

use std::time::Duration;

use serde_json::Value;

use crate::client::McpClient;
use crate::error::Result;

/// Jira lookups are interactive; keep the deadline tight.
const JIRA_TIMEOUT: Duration = Duration::from_secs(10);

/// Jira API client.
pub struct JiraApi {
    client: McpClient,
}

impl JiraApi {
    pub(crate) fn new(client: McpClient) -> Self {
        Self { client }
    }

    /// Fetch a single issue by ticket id.
    ///
    /// Primary path is `GET /jira/issue/{id}`; older backend generations
    /// served `GET /jira/{id}`, so a 404 retries the legacy path once.
    pub async fn issue(&self, ticket_id: &str) -> Result<Value> {
        match self
            .client
            .get(&format!("jira/issue/{ticket_id}"), &[], JIRA_TIMEOUT)
            .await
        {
            Err(e) if e.is_not_found() => {
                tracing::debug!(ticket_id, "primary issue path missing, trying legacy path");
                self.client
                    .get(&format!("jira/{ticket_id}"), &[], JIRA_TIMEOUT)
                    .await
            }
            other => other,
        }
    }

    /// List all projects the configured account can see.
    pub async fn projects(&self) -> Result<Value> {
        self.client.get("jira/projects", &[], JIRA_TIMEOUT).await
    }

    /// List issues in a project, optionally filtered by status.
    pub async fn issues(&self, project_key: &str, status: Option<&str>) -> Result<Value> {
        let query: Vec<(&str, String)> = status
            .map(|s| vec![("status", s.to_string())])
            .unwrap_or_default();
        self.client
            .get(&format!("jira/issues/{project_key}"), &query, JIRA_TIMEOUT)
            .await
    }
}
