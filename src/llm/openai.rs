//! OpenAI-style chat completions adapter
//!
//! Direct HTTP client for the Chat Completions API. The system prompt rides
//! as a leading `system`-role message; a non-empty code-context block is
//! injected as its own `user` turn ahead of the actual user message. Usage
//! comes back under `usage.prompt_tokens` / `completion_tokens` /
//! `total_tokens`; the reported total is trusted as-is.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::types::ProviderResult;
use crate::config::ProviderCredentials;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

// ============================================================================
// OpenAiAdapter
// ============================================================================

/// Adapter for OpenAI-style backends (`gpt*`, `chatgpt*` models).
pub struct OpenAiAdapter {
    client: Client,
    credentials: ProviderCredentials,
}

impl OpenAiAdapter {
    pub fn new(client: Client, credentials: ProviderCredentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Assemble the message array: system prompt first, then the optional
    /// code-context turn, then the user message.
    fn build_request(
        &self,
        message: &str,
        system_prompt: &str,
        code_context: &str,
        model: &str,
    ) -> OpenAiRequest {
        let mut messages = vec![OpenAiMessage {
            role: "system".to_string(),
            content: system_prompt.to_string(),
        }];

        if !code_context.is_empty() {
            messages.push(OpenAiMessage {
                role: "user".to_string(),
                content: code_context.to_string(),
            });
        }

        messages.push(OpenAiMessage {
            role: "user".to_string(),
            content: message.to_string(),
        });

        OpenAiRequest {
            model: model.to_string(),
            messages,
        }
    }

    fn convert_response(response: OpenAiResponse) -> ProviderResult {
        // Missing content falls back to an empty string, never an error.
        let text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        match response.usage {
            Some(usage) => ProviderResult::with_reported_total(
                text,
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens,
            ),
            None => ProviderResult::from_split_counts(text, 0, 0),
        }
    }

    /// Perform the remote call and normalize the reply.
    pub async fn invoke(
        &self,
        message: &str,
        system_prompt: &str,
        code_context: &str,
        model: &str,
    ) -> Result<ProviderResult> {
        tracing::info!("[OpenAI] Sending request for model {}", model);

        let api_key = self
            .credentials
            .api_key
            .as_deref()
            .context("OPENAI_API_KEY is not configured")?;
        let api_base = self
            .credentials
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE);
        let url = format!("{}/chat/completions", api_base);

        let request = self.build_request(message, system_prompt, code_context, model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read OpenAI response body")?;

        tracing::debug!("[OpenAI] Response status: {}", status);
        tracing::debug!("[OpenAI] Response body: {}", body);

        if !status.is_success() {
            tracing::error!("[OpenAI] API error: {} - {}", status, body);
            anyhow::bail!("OpenAI API error ({}): {}", status, body);
        }

        let parsed: OpenAiResponse =
            serde_json::from_str(&body).context("Failed to parse OpenAI API response")?;

        Ok(Self::convert_response(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> OpenAiAdapter {
        OpenAiAdapter::new(Client::new(), ProviderCredentials::default())
    }

    #[test]
    fn test_system_prompt_leads_then_user_message() {
        let request = adapter().build_request("hi", "You are terse.", "", "gpt-4-turbo");

        assert_eq!(request.model, "gpt-4-turbo");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[0].content, "You are terse.");
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[1].content, "hi");
    }

    #[test]
    fn test_code_context_becomes_separate_user_turn() {
        let request = adapter().build_request("explain", "sys", "Code Context:\n...", "gpt-4o");

        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[1].content, "Code Context:\n...");
        assert_eq!(request.messages[2].content, "explain");
    }

    #[test]
    fn test_usage_total_trusted_as_reported() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "hello"}}],
            "usage": {"prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21}
        }"#;
        let parsed: OpenAiResponse = serde_json::from_str(body).unwrap();
        let result = OpenAiAdapter::convert_response(parsed);

        assert_eq!(result.text, "hello");
        assert_eq!(result.prompt_tokens, 9);
        assert_eq!(result.completion_tokens, 12);
        assert_eq!(result.total_tokens, 21);
    }

    #[test]
    fn test_missing_content_falls_back_to_empty() {
        let body = r#"{"choices": [{"message": {"role": "assistant"}}]}"#;
        let parsed: OpenAiResponse = serde_json::from_str(body).unwrap();
        let result = OpenAiAdapter::convert_response(parsed);

        assert_eq!(result.text, "");
        assert_eq!(result.total_tokens, 0);
    }
}
