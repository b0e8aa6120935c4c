//! In-memory fakes for the model and engine seams (testing only)
//!
//! Provides `StubModel`, `StubProvider` and `RecordingEngine`, which satisfy
//! the trait contracts without a model server.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ollama_client::{ChatMessage, OllamaError};

use crate::agent::AgentHandle;
use crate::crew::{Crew, CrewEngine, CrewOutput, TaskOutput};
use crate::error::{CrewError, CrewResult};
use crate::model::{ChatModel, ModelHandle, ModelProvider};
use crate::roles::Role;

// ---------------------------------------------------------------------------
// StubModel
// ---------------------------------------------------------------------------

/// Chat model that returns scripted replies and records every request.
///
/// Once the script runs out it answers `"<name> answer"`.
#[derive(Debug)]
pub struct StubModel {
    name: String,
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
    fail: bool,
}

impl StubModel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn with_replies(self, replies: &[&str]) -> Self {
        self.replies
            .lock()
            .unwrap()
            .extend(replies.iter().map(|r| r.to_string()));
        self
    }

    /// Every chat call fails with an API error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Conversations received so far, oldest first.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for StubModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat(&self, messages: &[ChatMessage]) -> CrewResult<String> {
        self.requests.lock().unwrap().push(messages.to_vec());
        if self.fail {
            return Err(CrewError::Model(OllamaError::Api {
                status: 500,
                message: format!("{} crashed", self.name),
            }));
        }
        let scripted = self.replies.lock().unwrap().pop_front();
        Ok(scripted.unwrap_or_else(|| format!("{} answer", self.name)))
    }
}

// ---------------------------------------------------------------------------
// StubProvider
// ---------------------------------------------------------------------------

/// Model provider that hands out [`StubModel`]s and records connect attempts.
#[derive(Debug, Default)]
pub struct StubProvider {
    unavailable: HashSet<String>,
    attempts: Mutex<Vec<String>>,
    models: Mutex<HashMap<String, Arc<StubModel>>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `connect` fail for these model identifiers.
    pub fn with_unavailable(mut self, models: &[&str]) -> Self {
        self.unavailable
            .extend(models.iter().map(|m| m.to_string()));
        self
    }

    /// Model identifiers passed to `connect`, in call order.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    /// The model handed out for `name`, created on first use.
    pub fn model(&self, name: &str) -> Arc<StubModel> {
        let mut models = self.models.lock().unwrap();
        Arc::clone(
            models
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(StubModel::new(name))),
        )
    }
}

#[async_trait]
impl ModelProvider for StubProvider {
    async fn connect(&self, model_id: &str) -> CrewResult<Arc<dyn ChatModel>> {
        self.attempts.lock().unwrap().push(model_id.to_string());
        if self.unavailable.contains(model_id) {
            return Err(CrewError::Model(OllamaError::ModelNotFound(
                model_id.to_string(),
            )));
        }
        Ok(self.model(model_id))
    }
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// Agent for `role` bound to `model`, with the same flags the factory sets.
pub fn agent_with_model(role: Role, model: Arc<StubModel>) -> Arc<AgentHandle> {
    let descriptor = role.descriptor();
    Arc::new(AgentHandle {
        role,
        title: descriptor.title,
        objective: descriptor.objective,
        persona: descriptor.persona,
        model: ModelHandle::new(descriptor.preferred_model, model),
        verbose: true,
        allow_delegation: role.allows_delegation(),
    })
}

/// Agent for `role` bound to a fresh [`StubModel`].
pub fn stub_agent(role: Role) -> Arc<AgentHandle> {
    agent_with_model(
        role,
        Arc::new(StubModel::new(role.descriptor().preferred_model)),
    )
}

// ---------------------------------------------------------------------------
// RecordingEngine
// ---------------------------------------------------------------------------

/// Engine that counts kickoffs and returns a canned result without calling models.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    result: String,
    fail: bool,
    calls: AtomicUsize,
    task_roles: Mutex<Vec<Vec<Role>>>,
}

impl RecordingEngine {
    pub fn new(result: &str) -> Self {
        Self {
            result: result.to_string(),
            ..Self::default()
        }
    }

    /// Every kickoff fails as if the first task's model had crashed.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Task roles of each kicked-off crew, in kickoff order.
    pub fn task_roles(&self) -> Vec<Vec<Role>> {
        self.task_roles.lock().unwrap().clone()
    }
}

#[async_trait]
impl CrewEngine for RecordingEngine {
    async fn kickoff(&self, crew: &Crew) -> CrewResult<CrewOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let roles: Vec<Role> = crew.tasks().iter().map(|t| t.role).collect();
        self.task_roles.lock().unwrap().push(roles);

        if self.fail {
            let role = crew.tasks()[0].role;
            return Err(CrewError::TaskFailed {
                role,
                source: Box::new(CrewError::Model(OllamaError::Api {
                    status: 500,
                    message: "engine crashed".to_string(),
                })),
            });
        }

        let mut tasks_output: Vec<TaskOutput> = crew
            .tasks()
            .iter()
            .map(|t| TaskOutput {
                role: t.role,
                agent: t.agent.title,
                instruction: t.instruction.clone(),
                raw: String::new(),
                delegations: vec![],
            })
            .collect();
        if let Some(last) = tasks_output.last_mut() {
            last.raw = self.result.clone();
        }
        Ok(CrewOutput::from_tasks(tasks_output))
    }
}
