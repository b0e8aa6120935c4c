//! Ollama HTTP client
//!
//! Talks to a local or remote Ollama server over its REST API. Requests are
//! sent without a timeout: a chat call blocks until the model finishes.

use crate::config::OllamaConfig;
use crate::error::{OllamaError, Result};
use crate::types::{ChatMessage, ChatRequest, ChatResponse, ErrorBody, ModelInfo, ShowRequest};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

/// Ollama client for model lookup and chat completion
#[derive(Debug, Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    http_client: reqwest::Client,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(OllamaClient {
            config,
            http_client,
        })
    }

    /// Construct a model handle bound to `model`.
    ///
    /// Fails with [`OllamaError::ModelNotFound`] when the server does not have
    /// the model and [`OllamaError::Unreachable`] when the server is down.
    #[instrument(skip(self), fields(base_url = %self.config.base_url))]
    pub async fn connect(&self, model: &str) -> Result<OllamaModel> {
        let info = self.show_model(model).await?;
        debug!(
            family = info.details.family.as_deref().unwrap_or("unknown"),
            parameter_size = info.details.parameter_size.as_deref().unwrap_or("unknown"),
            "model available"
        );
        Ok(OllamaModel {
            client: self.clone(),
            model: model.to_string(),
        })
    }

    /// Fetch model details via `POST /api/show`
    pub async fn show_model(&self, model: &str) -> Result<ModelInfo> {
        self.post_json("api/show", &ShowRequest { model }, model).await
    }

    /// Non-streaming chat completion via `POST /api/chat`
    pub async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<ChatResponse> {
        debug!(model = %model, messages = messages.len(), "sending chat request");
        let request = ChatRequest {
            model,
            messages,
            stream: false,
        };
        self.post_json("api/chat", &request, model).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B, model: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path);

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    OllamaError::Unreachable {
                        url: self.config.base_url.clone(),
                        detail: e.to_string(),
                    }
                } else {
                    OllamaError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(error_from_status(status, &text, model));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Map a non-success response to an error, preferring Ollama's `{"error": ...}` body.
pub(crate) fn error_from_status(status: StatusCode, body: &str, model: &str) -> OllamaError {
    if status == StatusCode::NOT_FOUND {
        return OllamaError::ModelNotFound(model.to_string());
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.trim().to_string());

    OllamaError::Api {
        status: status.as_u16(),
        message,
    }
}

/// A client bound to one model that has been confirmed to exist on the server
#[derive(Debug, Clone)]
pub struct OllamaModel {
    client: OllamaClient,
    model: String,
}

impl OllamaModel {
    pub fn name(&self) -> &str {
        &self.model
    }

    /// Send `messages` and return the assistant's reply text
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let response = self.client.chat(&self.model, messages).await?;
        Ok(response.message.content)
    }
}
