//! Ollama connection configuration

use crate::types::DEFAULT_BASE_URL;

/// Environment variable holding the Ollama base URL
pub const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";

/// Ollama configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server, without a trailing slash
    pub base_url: String,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        let base_url =
            std::env::var(OLLAMA_HOST_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url)
    }
}

impl OllamaConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific server
    pub fn new(base_url: &str) -> Self {
        OllamaConfig {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            user_agent: concat!("agent-crew/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
