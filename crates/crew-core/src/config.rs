//! Process-wide crew configuration, read once at startup.

use ollama_client::OllamaConfig;

/// Model used when a role's preferred model cannot be constructed.
pub const FALLBACK_MODEL: &str = "qwen2.5-coder:7b";

/// Crew configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewConfig {
    /// Ollama server connection settings (`OLLAMA_HOST`)
    pub ollama: OllamaConfig,
    /// Single substitute model for failed constructions
    pub fallback_model: String,
}

impl Default for CrewConfig {
    fn default() -> Self {
        CrewConfig {
            ollama: OllamaConfig::from_env(),
            fallback_model: FALLBACK_MODEL.to_string(),
        }
    }
}

impl CrewConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn ollama_host(&self) -> &str {
        &self.ollama.base_url
    }
}
