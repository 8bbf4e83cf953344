//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use url::Url;

use crate::api::{AgentApi, AiApi, GithubApi, JiraApi};
use crate::error::{Error, Result};

/// Fallback timeout for requests that do not set their own.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for the health probe.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for one MCP backend server.
///
/// Cheap to clone; all clones share the underlying connection pool.
///
/// # Example
///
/// ```no_run
/// use automator_client::McpClient;
///
/// # async fn example() -> automator_client::Result<()> {
/// let client = McpClient::builder()
///     .base_url("http://localhost:8000")
///     .api_key("secret")
///     .build()?;
///
/// let projects = client.jira().projects().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct McpClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
#[derive(Debug)]
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Base URL for API requests.
    pub(crate) base_url: Url,
    /// Optional API key, sent as `X-API-Key` on agent calls.
    pub(crate) api_key: Option<String>,
}

impl McpClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client with default settings pointing to localhost.
    pub fn localhost() -> Result<Self> {
        Self::builder().base_url("http://localhost:8000").build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub(crate) fn api_key(&self) -> Option<&str> {
        self.inner.api_key.as_deref()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the Jira API.
    pub fn jira(&self) -> JiraApi {
        JiraApi::new(self.clone())
    }

    /// Access the GitHub API.
    pub fn github(&self) -> GithubApi {
        GithubApi::new(self.clone())
    }

    /// Access the AI API.
    pub fn ai(&self) -> AiApi {
        AiApi::new(self.clone())
    }

    /// Access the agent API.
    pub fn agent(&self) -> AgentApi {
        AgentApi::new(self.clone())
    }

    /// Check server health (`GET /health`).
    pub async fn health(&self) -> Result<Value> {
        self.get("health", &[], HEALTH_TIMEOUT).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner.base_url.join(path).map_err(Error::from)
    }

    /// Make a GET request with optional query parameters.
    pub(crate) async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<Value> {
        let url = self.url(path)?;
        tracing::debug!(%url, "GET");
        let response = self
            .inner
            .http
            .get(url)
            .query(query)
            .timeout(timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make a POST request with a JSON body and optional extra headers.
    pub(crate) async fn post(
        &self,
        path: &str,
        body: &impl serde::Serialize,
        headers: HeaderMap,
        timeout: Duration,
    ) -> Result<Value> {
        let url = self.url(path)?;
        tracing::debug!(%url, "POST");
        let response = self
            .inner
            .http
            .post(url)
            .headers(headers)
            .json(body)
            .timeout(timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Handle a response, extracting the JSON body or an error.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Value> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract an error from a failed response: probe the body for a nested
    /// `error`/`detail` message before falling back to the raw text or the
    /// bare status.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| {
                ["error", "detail", "details", "message"]
                    .iter()
                    .find_map(|key| v.get(key).and_then(Value::as_str).map(str::to_string))
            })
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.trim().to_string()
                }
            });

        if status == reqwest::StatusCode::NOT_FOUND {
            Error::NotFound(message)
        } else {
            Error::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Builder for creating an [`McpClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
        }
    }

    /// Set the base URL for the server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key sent to the agent endpoint.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<McpClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        // Parse and normalize so that join() keeps the full path.
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("automator-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .timeout(DEFAULT_TIMEOUT)
            .build()?;

        Ok(McpClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                api_key: self.api_key,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientBuilder::new().build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8000")
            .build()
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_url_building() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8000")
            .build()
            .unwrap();

        let url = client.url("jira/projects").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/jira/projects");

        let url = client.url("/adk/agent").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/adk/agent");
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let client = ClientBuilder::new()
            .base_url("http://gateway.internal/mcp")
            .build()
            .unwrap();

        let url = client.url("jira/projects").unwrap();
        assert_eq!(url.as_str(), "http://gateway.internal/mcp/jira/projects");
    }
}
