//! Crew Core Library
//!
//! Role registry, model resolution, agent factory, task assembly and
//! sequential crew execution for agent-crew.

pub mod agent;
pub mod config;
pub mod crew;
pub mod error;
pub mod fakes;
pub mod model;
pub mod obs;
pub mod roles;
pub mod task;
pub mod telemetry;

pub use agent::{AgentFactory, AgentHandle};
pub use config::{CrewConfig, FALLBACK_MODEL};
pub use crew::{
    create_crew, run_crew, Crew, CrewEngine, CrewOutput, Delegation, Process, SequentialEngine,
    TaskOutput,
};
pub use error::{CrewError, CrewResult};
pub use model::{ChatModel, ModelHandle, ModelProvider, ModelResolver, OllamaProvider};
pub use obs::{
    crew_span, emit_crew_finished, emit_crew_started, emit_model_fallback, emit_task_delegated,
    emit_task_finished, emit_task_started,
};
pub use roles::{describe, parse_role_list, Role, RoleDescriptor, RoleSelection};
pub use task::{assemble_tasks, task_template, TaskRecord};
pub use telemetry::init_tracing;

/// agent-crew version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
