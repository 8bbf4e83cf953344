//! Natural-language agent API (`/adk/agent`).

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

use crate::client::McpClient;
use crate::error::{Error, Result};
use crate::types::AgentRequest;

/// The agent may fan out to several tools per prompt; this is the most
/// generous deadline in the client.
const AGENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Agent API client.
pub struct AgentApi {
    client: McpClient,
}

impl AgentApi {
    pub(crate) fn new(client: McpClient) -> Self {
        Self { client }
    }

    /// Send a prompt to the agent. The response envelope carries `result`,
    /// `toolCalls` and `model_summary` fields in various combinations.
    pub async fn call(
        &self,
        prompt: &str,
        session_id: Option<&str>,
        context: Option<Value>,
    ) -> Result<Value> {
        let body = AgentRequest {
            prompt: prompt.to_string(),
            session_id: session_id.map(str::to_string),
            context,
        };
        self.client
            .post("adk/agent", &body, self.headers()?, AGENT_TIMEOUT)
            .await
    }

    /// Forward the `/clearcontext` built-in. Context lives entirely in the
    /// backend, so this is just an agent call with the literal prompt.
    pub async fn clear_context(&self, session_id: Option<&str>) -> Result<Value> {
        self.call("/clearcontext", session_id, None).await
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(key) = self.client.api_key() {
            let value = HeaderValue::from_str(key)
                .map_err(|_| Error::Config("Invalid API key".to_string()))?;
            headers.insert("x-api-key", value);
        }
        Ok(headers)
    }
}
