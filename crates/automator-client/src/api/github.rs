//! GitHub API.

use std::time::Duration;

use serde_json::Value;

use crate::client::McpClient;
use crate::error::Result;
use crate::types::CommitQuery;

const GITHUB_TIMEOUT: Duration = Duration::from_secs(10);

/// GitHub API client.
pub struct GithubApi {
    client: McpClient,
}

impl GithubApi {
    pub(crate) fn new(client: McpClient) -> Self {
        Self { client }
    }

    /// Fetch commit history for a repository.
    pub async fn commits(&self, owner: &str, repo: &str, query: &CommitQuery) -> Result<Value> {
        self.client
            .get(
                &format!("github/commits/{owner}/{repo}"),
                &query.to_pairs(),
                GITHUB_TIMEOUT,
            )
            .await
    }
}
