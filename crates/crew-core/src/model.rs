//! Model construction and the one-shot fallback resolver.
//!
//! [`ModelProvider`] is the seam to the model server: inject a deterministic
//! stub in tests, use [`OllamaProvider`] in production.

use std::sync::Arc;

use async_trait::async_trait;
use ollama_client::{ChatMessage, OllamaClient, OllamaModel};
use tracing::{debug, instrument};

use crate::config::CrewConfig;
use crate::error::{CrewError, CrewResult};
use crate::obs::emit_model_fallback;

/// An invocable model bound to one model identifier.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn name(&self) -> &str;

    /// Send a conversation and return the reply text.
    async fn chat(&self, messages: &[ChatMessage]) -> CrewResult<String>;
}

/// Constructs [`ChatModel`]s by identifier.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn connect(&self, model_id: &str) -> CrewResult<Arc<dyn ChatModel>>;
}

#[async_trait]
impl ChatModel for OllamaModel {
    fn name(&self) -> &str {
        OllamaModel::name(self)
    }

    async fn chat(&self, messages: &[ChatMessage]) -> CrewResult<String> {
        Ok(OllamaModel::chat(self, messages).await?)
    }
}

/// [`ModelProvider`] backed by an Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: OllamaClient,
}

impl OllamaProvider {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &CrewConfig) -> CrewResult<Self> {
        Ok(Self::new(OllamaClient::new(config.ollama.clone())?))
    }
}

#[async_trait]
impl ModelProvider for OllamaProvider {
    async fn connect(&self, model_id: &str) -> CrewResult<Arc<dyn ChatModel>> {
        let model = self.client.connect(model_id).await?;
        Ok(Arc::new(model))
    }
}

/// A resolved model together with the identifier that was asked for.
#[derive(Clone)]
pub struct ModelHandle {
    requested: String,
    used_fallback: bool,
    model: Arc<dyn ChatModel>,
}

impl ModelHandle {
    pub fn new(requested: &str, model: Arc<dyn ChatModel>) -> Self {
        Self {
            requested: requested.to_string(),
            used_fallback: false,
            model,
        }
    }

    fn fallback(requested: &str, model: Arc<dyn ChatModel>) -> Self {
        Self {
            requested: requested.to_string(),
            used_fallback: true,
            model,
        }
    }

    /// The preferred model identifier.
    pub fn requested(&self) -> &str {
        &self.requested
    }

    /// The identifier of the model actually in use.
    pub fn resolved(&self) -> &str {
        self.model.name()
    }

    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    pub async fn chat(&self, messages: &[ChatMessage]) -> CrewResult<String> {
        self.model.chat(messages).await
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("requested", &self.requested)
            .field("resolved", &self.resolved())
            .field("used_fallback", &self.used_fallback)
            .finish()
    }
}

/// Resolves model identifiers, substituting a single fallback on failure.
#[derive(Clone)]
pub struct ModelResolver {
    provider: Arc<dyn ModelProvider>,
    fallback_model: String,
}

impl ModelResolver {
    pub fn new(provider: Arc<dyn ModelProvider>, fallback_model: &str) -> Self {
        Self {
            provider,
            fallback_model: fallback_model.to_string(),
        }
    }

    /// Construct a handle for `model_id`.
    ///
    /// On any construction error, logs a warning and tries the fallback model
    /// exactly once. A second failure is returned as
    /// [`CrewError::ModelUnavailable`].
    #[instrument(skip(self))]
    pub async fn resolve(&self, model_id: &str) -> CrewResult<ModelHandle> {
        match self.provider.connect(model_id).await {
            Ok(model) => {
                debug!(model = %model_id, "model resolved");
                Ok(ModelHandle::new(model_id, model))
            }
            Err(err) => {
                emit_model_fallback(model_id, &self.fallback_model, &err);
                let model = self
                    .provider
                    .connect(&self.fallback_model)
                    .await
                    .map_err(|source| CrewError::ModelUnavailable {
                        requested: model_id.to_string(),
                        fallback: self.fallback_model.clone(),
                        source: Box::new(source),
                    })?;
                Ok(ModelHandle::fallback(model_id, model))
            }
        }
    }
}

impl std::fmt::Debug for ModelResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelResolver")
            .field("fallback_model", &self.fallback_model)
            .finish_non_exhaustive()
    }
}
