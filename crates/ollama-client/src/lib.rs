//! Ollama-Client: Ollama REST integration for agent-crew
//!
//! Provides the model-serving layer: constructing a handle bound to a
//! model identifier (verifying the model exists on the server) and running
//! non-streaming chat completions against it.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{OllamaClient, OllamaModel};
pub use config::{OllamaConfig, OLLAMA_HOST_ENV};
pub use error::{OllamaError, Result};
pub use types::{ChatMessage, ChatResponse, ChatRole, ModelInfo, DEFAULT_BASE_URL};
