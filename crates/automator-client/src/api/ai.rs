//! AI text-generation API.

use std::time::Duration;

use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::client::McpClient;
use crate::error::Result;
use crate::types::{GenerateRequest, NaturalLanguageRequest};

/// Generation calls block on a model; allow more headroom than the lookups.
const AI_TIMEOUT: Duration = Duration::from_secs(20);

/// AI API client.
pub struct AiApi {
    client: McpClient,
}

impl AiApi {
    pub(crate) fn new(client: McpClient) -> Self {
        Self { client }
    }

    /// Free-form text generation (`POST /ai/generate`).
    pub async fn generate(&self, prompt: &str) -> Result<Value> {
        let body = GenerateRequest {
            prompt: prompt.to_string(),
        };
        self.client
            .post("ai/generate", &body, HeaderMap::new(), AI_TIMEOUT)
            .await
    }

    /// Translate natural language into a CLI command string
    /// (`POST /ai/process-nl`). The response carries `command` and
    /// `explanation` fields.
    pub async fn process_natural_language(&self, text: &str) -> Result<Value> {
        let body = NaturalLanguageRequest {
            natural_language: text.to_string(),
        };
        self.client
            .post("ai/process-nl", &body, HeaderMap::new(), AI_TIMEOUT)
            .await
    }

    /// Translate and execute a natural-language request server-side
    /// (`POST /ai/process-command`).
    pub async fn process_command(&self, text: &str) -> Result<Value> {
        let body = NaturalLanguageRequest {
            natural_language: text.to_string(),
        };
        self.client
            .post("ai/process-command", &body, HeaderMap::new(), AI_TIMEOUT)
            .await
    }
}
