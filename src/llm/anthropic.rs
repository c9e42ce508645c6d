//! Anthropic-style messages adapter
//!
//! The system prompt goes in the dedicated `system` field, never as a turn.
//! A non-empty code-context block is a leading user turn before the user
//! message. Usage comes back as `input_tokens` / `output_tokens` only, so
//! the total is computed as their sum.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::types::ProviderResult;
use crate::config::ProviderCredentials;

const DEFAULT_API_BASE: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

// ============================================================================
// AnthropicAdapter
// ============================================================================

/// Adapter for Anthropic-style backends (`claude*` models).
pub struct AnthropicAdapter {
    client: Client,
    credentials: ProviderCredentials,
}

impl AnthropicAdapter {
    pub fn new(client: Client, credentials: ProviderCredentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Assemble the request: system via the dedicated field, context as a
    /// leading user turn, message as the trailing user turn.
    fn build_request(
        &self,
        message: &str,
        system_prompt: &str,
        code_context: &str,
        model: &str,
    ) -> AnthropicRequest {
        let mut messages = Vec::new();

        if !code_context.is_empty() {
            messages.push(AnthropicMessage {
                role: "user".to_string(),
                content: code_context.to_string(),
            });
        }

        messages.push(AnthropicMessage {
            role: "user".to_string(),
            content: message.to_string(),
        });

        let system = if system_prompt.is_empty() {
            None
        } else {
            Some(system_prompt.to_string())
        };

        AnthropicRequest {
            model: model.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            system,
            messages,
        }
    }

    fn convert_response(response: AnthropicResponse) -> ProviderResult {
        // First text block wins; a tool-use-only reply falls back to "".
        let text = response
            .content
            .iter()
            .find_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text.clone()),
                AnthropicContentBlock::Other => None,
            })
            .unwrap_or_default();

        ProviderResult::from_split_counts(
            text,
            response.usage.input_tokens,
            response.usage.output_tokens,
        )
    }

    /// Perform the remote call and normalize the reply.
    pub async fn invoke(
        &self,
        message: &str,
        system_prompt: &str,
        code_context: &str,
        model: &str,
    ) -> Result<ProviderResult> {
        tracing::info!("[Anthropic] Sending request for model {}", model);

        let api_key = self
            .credentials
            .api_key
            .as_deref()
            .context("ANTHROPIC_API_KEY is not configured")?;
        let api_base = self
            .credentials
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE);
        let url = format!("{}/messages", api_base);

        let request = self.build_request(message, system_prompt, code_context, model);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read Anthropic response body")?;

        tracing::debug!("[Anthropic] Response status: {}", status);
        tracing::debug!("[Anthropic] Response body: {}", body);

        if !status.is_success() {
            tracing::error!("[Anthropic] API error: {} - {}", status, body);
            anyhow::bail!("Anthropic API error ({}): {}", status, body);
        }

        let parsed: AnthropicResponse =
            serde_json::from_str(&body).context("Failed to parse Anthropic API response")?;

        Ok(Self::convert_response(parsed))
    }
}
