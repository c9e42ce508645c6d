//! llm-relay: a provider-agnostic chat relay
//!
//! One endpoint, many backends. A unified [`chat::ChatRequest`] (user
//! message, model identifier, system prompt, optional multi-file code
//! context) is routed by model-name prefix to one of several text-generation
//! backends; each backend's response and token-usage shape is normalized
//! into a single [`chat::ChatResponse`] and the generated text is cleaned
//! into consistent markdown before it leaves the relay.

pub mod chat;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod llm;
pub mod logging;
pub mod web;

pub use chat::{ChatRequest, ChatResponse, Dispatcher, TokenUtils};
pub use config::{ProviderCredentials, RelayConfig};
pub use context::{format_code_context, CodeContext, CodeFile};
pub use error::ChatError;
pub use format::format_response;
