//! Provider adapters
//!
//! One adapter per backend. Each adapter owns the backend-specific wire
//! types, performs the remote call, and renames the backend's usage fields
//! into the unified [`ProviderResult`] shape. Backend field names never
//! leak past this module.

pub mod anthropic;
pub mod gemini;
pub mod openai;
pub mod types;

pub use anthropic::AnthropicAdapter;
pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;
pub use types::ProviderResult;
