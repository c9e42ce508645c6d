//! Error taxonomy for the relay core
//!
//! Adapters report transport and backend failures as `anyhow` errors with
//! context attached; those wrap into [`ChatError::Provider`] at the
//! dispatcher boundary. Model-selection failures are typed so the web layer
//! can tell client mistakes from backend trouble.

use thiserror::Error;

/// Errors produced by dispatching a chat request.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The model name matched no known provider prefix.
    #[error("unsupported model: {0}")]
    UnsupportedModel(String),

    /// The model maps to a recognized provider that has no implementation yet.
    #[error("no provider implementation for model: {0}")]
    NotImplemented(String),

    /// Transport, authentication, or backend-reported failure during the
    /// remote call.
    #[error("provider request failed: {0:#}")]
    Provider(#[from] anyhow::Error),
}
