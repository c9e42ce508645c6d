//! Request dispatching
//!
//! Maps the model identifier to a provider through an ordered prefix table,
//! runs the selected adapter, and assembles the unified response. Adding a
//! provider is a table entry plus an adapter, not new control flow.

use reqwest::Client;

use crate::chat::{ChatRequest, ChatResponse, TokenUtils};
use crate::config::RelayConfig;
use crate::context::format_code_context;
use crate::error::ChatError;
use crate::format::format_response;
use crate::llm::{AnthropicAdapter, GeminiAdapter, OpenAiAdapter, ProviderResult};

/// Closed set of backends the relay knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Anthropic,
    Gemini,
    /// Recognized but not implemented; dispatch fails rather than
    /// fabricating a reply.
    Llama,
}

/// Prefix rules in priority order. Matching is case-sensitive and anchored
/// at the start of the model name.
const PREFIX_RULES: &[(&str, Provider)] = &[
    ("gpt", Provider::OpenAi),
    ("chatgpt", Provider::OpenAi),
    ("claude", Provider::Anthropic),
    ("gemini", Provider::Gemini),
    ("llama", Provider::Llama),
];

impl Provider {
    /// Resolve a model name to its provider, if any prefix matches.
    pub fn for_model(model: &str) -> Option<Provider> {
        PREFIX_RULES
            .iter()
            .find(|(prefix, _)| model.starts_with(prefix))
            .map(|(_, provider)| *provider)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
            Provider::Llama => "llama",
        }
    }
}

/// Routes unified chat requests to the matching provider adapter.
///
/// Owns the adapters and their shared HTTP client; constructed once at
/// startup from the immutable [`RelayConfig`] and safe to share across
/// concurrent calls.
pub struct Dispatcher {
    openai: OpenAiAdapter,
    anthropic: AnthropicAdapter,
    gemini: GeminiAdapter,
}

impl Dispatcher {
    pub fn new(config: &RelayConfig) -> Self {
        let client = Client::new();

        Self {
            openai: OpenAiAdapter::new(client.clone(), config.openai.clone()),
            anthropic: AnthropicAdapter::new(client.clone(), config.anthropic.clone()),
            gemini: GeminiAdapter::new(client, config.gemini.clone()),
        }
    }

    /// Handle one chat request end to end: select the provider, serialize
    /// the code context, perform the remote call, clean the reply.
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        let provider = Provider::for_model(&request.model)
            .ok_or_else(|| ChatError::UnsupportedModel(request.model.clone()))?;

        tracing::info!(
            "[Dispatch] model={} provider={}",
            request.model,
            provider.name()
        );

        let code_context = request
            .code_context
            .as_ref()
            .map(format_code_context)
            .unwrap_or_default();

        let result: ProviderResult = match provider {
            Provider::OpenAi => {
                self.openai
                    .invoke(
                        &request.message,
                        &request.system_prompt,
                        &code_context,
                        &request.model,
                    )
                    .await?
            }
            Provider::Anthropic => {
                self.anthropic
                    .invoke(
                        &request.message,
                        &request.system_prompt,
                        &code_context,
                        &request.model,
                    )
                    .await?
            }
            Provider::Gemini => {
                self.gemini
                    .invoke(
                        &request.message,
                        &request.system_prompt,
                        &code_context,
                        &request.model,
                    )
                    .await?
            }
            Provider::Llama => {
                return Err(ChatError::NotImplemented(request.model.clone()));
            }
        };

        tracing::info!(
            "[Dispatch] completed model={} tokens={}",
            request.model,
            result.total_tokens
        );

        Ok(ChatResponse {
            message: format_response(&result.text),
            token_utils: TokenUtils {
                prompt_tokens: result.prompt_tokens,
                completion_tokens: result.completion_tokens,
                total_tokens: result.total_tokens,
            },
        })
    }
}
