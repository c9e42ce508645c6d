//! Runtime configuration
//!
//! All configuration is read from the environment once at startup and never
//! mutated afterwards. Credentials are not validated here: a missing API key
//! only surfaces when the provider that needs it is actually invoked.

use std::env;

/// Credentials and endpoint settings for one provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderCredentials {
    /// API key, if configured.
    pub api_key: Option<String>,
    /// Optional override of the provider's default API base URL.
    pub base_url: Option<String>,
}

impl ProviderCredentials {
    fn from_env(key_var: &str, base_url_var: &str) -> Self {
        Self {
            api_key: env::var(key_var).ok(),
            base_url: env::var(base_url_var).ok(),
        }
    }
}

/// Process-lifetime relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub openai: ProviderCredentials,
    pub anthropic: ProviderCredentials,
    pub gemini: ProviderCredentials,
    /// Port for the HTTP surface.
    pub port: u16,
}

impl RelayConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads:
    /// - `OPENAI_API_KEY` / `OPENAI_BASE_URL`
    /// - `ANTHROPIC_API_KEY` / `ANTHROPIC_BASE_URL`
    /// - `GOOGLE_API_KEY` / `GEMINI_BASE_URL`
    /// - `PORT` (defaults to 5000)
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5000);

        Self {
            openai: ProviderCredentials::from_env("OPENAI_API_KEY", "OPENAI_BASE_URL"),
            anthropic: ProviderCredentials::from_env("ANTHROPIC_API_KEY", "ANTHROPIC_BASE_URL"),
            gemini: ProviderCredentials::from_env("GOOGLE_API_KEY", "GEMINI_BASE_URL"),
            port,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            openai: ProviderCredentials::default(),
            anthropic: ProviderCredentials::default(),
            gemini: ProviderCredentials::default(),
            port: 5000,
        }
    }
}
