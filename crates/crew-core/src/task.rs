//! Task assembly: one task record per requested role, in canonical order.

use std::sync::Arc;

use tracing::warn;

use crate::agent::AgentHandle;
use crate::roles::Role;

/// One unit of work paired with the agent that performs it.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub role: Role,
    pub instruction: String,
    pub expected_output: &'static str,
    pub agent: Arc<AgentHandle>,
}

/// Instruction prefix and expected-output wording for a role.
pub fn task_template(role: Role) -> (&'static str, &'static str) {
    match role {
        Role::Architect => (
            "Analyze and design the architecture for",
            "Architecture design with components, data flow, and rationale",
        ),
        Role::Coder => (
            "Implement the solution for",
            "Working code with proper structure and error handling",
        ),
        Role::Tester => (
            "Write tests for",
            "Comprehensive test suite covering edge cases",
        ),
        Role::Reviewer => (
            "Review the code/design for",
            "Code review with security analysis and improvement suggestions",
        ),
        Role::Researcher => (
            "Research and gather information for",
            "Research findings with relevant documentation and examples",
        ),
        Role::Docwriter => (
            "Write documentation for",
            "Clear, comprehensive documentation in Markdown format",
        ),
    }
}

/// Build task records for `requested` roles.
///
/// Records follow [`Role::ALL`] order regardless of request order. A
/// requested role with no agent in `agents` gets no record; a warning names
/// the skipped task.
pub fn assemble_tasks(
    task_description: &str,
    requested: &[Role],
    agents: &[Arc<AgentHandle>],
) -> Vec<TaskRecord> {
    let mut tasks = Vec::new();

    for role in Role::ALL {
        if !requested.contains(&role) {
            continue;
        }
        let Some(agent) = agents.iter().find(|a| a.role == role) else {
            warn!(role = %role, "no agent built for role, skipping its task");
            continue;
        };

        let (prefix, expected_output) = task_template(role);
        tasks.push(TaskRecord {
            role,
            instruction: format!("{prefix}: {task_description}"),
            expected_output,
            agent: Arc::clone(agent),
        });
    }

    tasks
}
