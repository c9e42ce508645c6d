//! Unified chat contract
//!
//! The request and response shapes every caller sees, independent of which
//! backend serves the call. JSON field names are camelCase to match the UI
//! contract.

mod dispatcher;

pub use dispatcher::{Dispatcher, Provider};

use serde::{Deserialize, Serialize};

use crate::context::CodeContext;

/// Provider-agnostic chat request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    /// Free-form model identifier; its prefix selects the provider.
    pub model: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub code_context: Option<CodeContext>,
}

/// Token accounting normalized across backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUtils {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Provider-agnostic chat response. `message` is always the output of the
/// response formatter, never raw adapter text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    pub token_utils: TokenUtils,
}
