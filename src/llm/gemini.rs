//! Gemini-style generateContent adapter
//!
//! The Generative Language API has no system role in its `contents` array,
//! so a non-empty system prompt is attached as a synthetic priming exchange:
//! a user turn carrying the prompt and a `model` turn acknowledging it. The
//! code-context block is concatenated into the single user turn rather than
//! sent separately. Usage lives under `usageMetadata` with its own field
//! names; the reported `totalTokenCount` is trusted as-is.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::types::ProviderResult;
use crate::config::ProviderCredentials;

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const PRIMING_ACK: &str = "Understood.";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default, rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiUsageMetadata {
    #[serde(default, rename = "promptTokenCount")]
    prompt_token_count: u32,
    #[serde(default, rename = "candidatesTokenCount")]
    candidates_token_count: u32,
    #[serde(default, rename = "totalTokenCount")]
    total_token_count: u32,
}

// ============================================================================
// GeminiAdapter
// ============================================================================

/// Adapter for Gemini-style backends (`gemini*` models).
pub struct GeminiAdapter {
    client: Client,
    credentials: ProviderCredentials,
}

impl GeminiAdapter {
    pub fn new(client: Client, credentials: ProviderCredentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Assemble the contents array: optional priming exchange, then one user
    /// turn holding the context block and message together.
    fn build_request(
        &self,
        message: &str,
        system_prompt: &str,
        code_context: &str,
    ) -> GeminiRequest {
        let mut contents = Vec::new();

        if !system_prompt.is_empty() {
            contents.push(GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: Some(system_prompt.to_string()),
                }],
            });
            contents.push(GeminiContent {
                role: "model".to_string(),
                parts: vec![GeminiPart {
                    text: Some(PRIMING_ACK.to_string()),
                }],
            });
        }

        let prompt = if code_context.is_empty() {
            message.to_string()
        } else {
            format!("{}\n\n{}", code_context, message)
        };

        contents.push(GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart { text: Some(prompt) }],
        });

        GeminiRequest { contents }
    }

    fn convert_response(response: GeminiResponse) -> ProviderResult {
        // Concatenate the text parts of the first candidate; no candidate or
        // no text falls back to "".
        let text = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default();

        match response.usage_metadata {
            Some(usage) => ProviderResult::with_reported_total(
                text,
                usage.prompt_token_count,
                usage.candidates_token_count,
                usage.total_token_count,
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
        tracing::info!("[Gemini] Sending request for model {}", model);

        let api_key = self
            .credentials
            .api_key
            .as_deref()
            .context("GOOGLE_API_KEY is not configured")?;
        let api_base = self
            .credentials
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE);
        let url = format!("{}/models/{}:generateContent", api_base, model);

        let request = self.build_request(message, system_prompt, code_context);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read Gemini response body")?;

        tracing::debug!("[Gemini] Response status: {}", status);
        tracing::debug!("[Gemini] Response body: {}", body);

        if !status.is_success() {
            tracing::error!("[Gemini] API error: {} - {}", status, body);
            anyhow::bail!("Gemini API error ({}): {}", status, body);
        }

        let parsed: GeminiResponse =
            serde_json::from_str(&body).context("Failed to parse Gemini API response")?;

        Ok(Self::convert_response(parsed))
    }
}
