//! Error taxonomy for crew assembly and execution.

use crate::roles::Role;

/// Errors produced by the crew layer.
#[derive(Debug, thiserror::Error)]
pub enum CrewError {
    #[error("unknown agent role: {0}")]
    UnknownRole(String),

    #[error("no valid agents specified")]
    NoValidAgents,

    #[error("crew has no tasks to run")]
    NoTasks,

    #[error("model {requested} unavailable and fallback model {fallback} failed")]
    ModelUnavailable {
        requested: String,
        fallback: String,
        #[source]
        source: Box<CrewError>,
    },

    #[error("task for {role} failed")]
    TaskFailed {
        role: Role,
        #[source]
        source: Box<CrewError>,
    },

    #[error("model error: {0}")]
    Model(#[from] ollama_client::OllamaError),
}

/// Result type for crew operations.
pub type CrewResult<T> = std::result::Result<T, CrewError>;
