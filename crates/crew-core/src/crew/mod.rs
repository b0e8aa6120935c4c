//! Crew assembly and execution.
//!
//! # Module layout
//!
//! - this module: `Crew`, `Process`, `CrewOutput`, `CrewEngine`, `create_crew`, `run_crew`
//! - [`engine`]: `SequentialEngine`, the in-process engine that drives each task's model
//! - [`prompt`]: chat prompt construction and delegation directive parsing

pub mod engine;
pub mod prompt;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::Instrument;
use uuid::Uuid;

use crate::agent::{AgentFactory, AgentHandle};
use crate::error::{CrewError, CrewResult};
use crate::obs::{crew_span, emit_crew_finished, emit_crew_started};
use crate::roles::{Role, RoleSelection};
use crate::task::{assemble_tasks, TaskRecord};

pub use engine::SequentialEngine;

/// How tasks are scheduled across agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Process {
    /// One task after another, in task-record order.
    Sequential,
}

/// Agents, tasks and execution mode for one run.
#[derive(Debug, Clone)]
pub struct Crew {
    run_id: Uuid,
    agents: Vec<Arc<AgentHandle>>,
    tasks: Vec<TaskRecord>,
    process: Process,
    verbose: bool,
}

impl Crew {
    /// Bundle `agents` and `tasks` into a sequential crew.
    pub fn new(agents: Vec<Arc<AgentHandle>>, tasks: Vec<TaskRecord>) -> CrewResult<Self> {
        if agents.is_empty() {
            return Err(CrewError::NoValidAgents);
        }
        if tasks.is_empty() {
            return Err(CrewError::NoTasks);
        }
        Ok(Self {
            run_id: Uuid::new_v4(),
            agents,
            tasks,
            process: Process::Sequential,
            verbose: true,
        })
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn agents(&self) -> &[Arc<AgentHandle>] {
        &self.agents
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn process(&self) -> Process {
        self.process
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Crew members other than `role`.
    pub fn coworkers_of(&self, role: Role) -> Vec<&AgentHandle> {
        self.agents
            .iter()
            .filter(|a| a.role != role)
            .map(|a| a.as_ref())
            .collect()
    }

    pub fn agent(&self, role: Role) -> Option<&AgentHandle> {
        self.agents.iter().find(|a| a.role == role).map(|a| a.as_ref())
    }
}

/// A coworker consultation made while performing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegation {
    pub to: Role,
    pub request: String,
    pub answer: String,
}

/// Result of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutput {
    pub role: Role,
    pub agent: &'static str,
    pub instruction: String,
    pub raw: String,
    pub delegations: Vec<Delegation>,
}

/// Result of a crew run. Displays as the final task's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewOutput {
    pub tasks_output: Vec<TaskOutput>,
    pub raw: String,
}

impl CrewOutput {
    pub fn from_tasks(tasks_output: Vec<TaskOutput>) -> Self {
        let raw = tasks_output
            .last()
            .map(|t| t.raw.clone())
            .unwrap_or_default();
        Self { tasks_output, raw }
    }
}

impl std::fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Runs a crew to completion.
#[async_trait]
pub trait CrewEngine: Send + Sync {
    async fn kickoff(&self, crew: &Crew) -> CrewResult<CrewOutput>;
}

/// Build agents for `selection`, assemble their tasks and bundle the crew.
///
/// Fails with [`CrewError::NoValidAgents`] when nothing was selected.
pub async fn create_crew(
    factory: &AgentFactory,
    task_description: &str,
    selection: &RoleSelection,
) -> CrewResult<Crew> {
    let agents = factory.build_all(selection).await?;
    let tasks = assemble_tasks(task_description, &selection.roles, &agents);
    Crew::new(agents, tasks)
}

/// Invoke `engine` once for `crew` and return its result as text.
///
/// Engine errors propagate unchanged; there is no retry and no timeout.
pub async fn run_crew(engine: &dyn CrewEngine, crew: &Crew) -> CrewResult<String> {
    let run_id = crew.run_id().to_string();
    async {
        emit_crew_started(&run_id, crew.agents().len(), crew.tasks().len());

        let started = Instant::now();
        let result = engine.kickoff(crew).await;
        emit_crew_finished(
            &run_id,
            started.elapsed().as_millis() as u64,
            crew.tasks().len(),
            result.is_ok(),
        );

        Ok(result?.to_string())
    }
    .instrument(crew_span(&run_id))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{stub_agent, RecordingEngine};

    #[test]
    fn test_crew_is_sequential_and_verbose() {
        let agent = stub_agent(Role::Coder);
        let tasks = assemble_tasks("x", &[Role::Coder], std::slice::from_ref(&agent));
        let crew = Crew::new(vec![agent], tasks).unwrap();
        assert_eq!(crew.process(), Process::Sequential);
        assert!(crew.verbose());
    }

    #[test]
    fn test_crew_rejects_empty_agents_and_tasks() {
        assert!(matches!(
            Crew::new(vec![], vec![]).unwrap_err(),
            CrewError::NoValidAgents
        ));
        assert!(matches!(
            Crew::new(vec![stub_agent(Role::Coder)], vec![]).unwrap_err(),
            CrewError::NoTasks
        ));
    }

    #[test]
    fn test_coworkers_exclude_self() {
        let agents = vec![
            stub_agent(Role::Architect),
            stub_agent(Role::Coder),
            stub_agent(Role::Tester),
        ];
        let tasks = assemble_tasks("x", &[Role::Architect], &agents);
        let crew = Crew::new(agents, tasks).unwrap();

        let roles: Vec<Role> = crew
            .coworkers_of(Role::Architect)
            .iter()
            .map(|a| a.role)
            .collect();
        assert_eq!(roles, vec![Role::Coder, Role::Tester]);
    }

    #[test]
    fn test_crew_output_displays_last_task() {
        let output = CrewOutput::from_tasks(vec![
            TaskOutput {
                role: Role::Coder,
                agent: "Senior Developer",
                instruction: "a".to_string(),
                raw: "code".to_string(),
                delegations: vec![],
            },
            TaskOutput {
                role: Role::Tester,
                agent: "QA Engineer",
                instruction: "b".to_string(),
                raw: "tests".to_string(),
                delegations: vec![],
            },
        ]);
        assert_eq!(output.to_string(), "tests");
        assert_eq!(CrewOutput::from_tasks(vec![]).to_string(), "");
    }

    #[tokio::test]
    async fn test_run_crew_invokes_engine_once() {
        let agent = stub_agent(Role::Coder);
        let tasks = assemble_tasks("x", &[Role::Coder], std::slice::from_ref(&agent));
        let crew = Crew::new(vec![agent], tasks).unwrap();
        let engine = RecordingEngine::new("done");

        let result = run_crew(&engine, &crew).await.unwrap();
        assert_eq!(result, "done");
        assert_eq!(engine.calls(), 1);
    }

    #[tokio::test]
    async fn test_run_crew_propagates_engine_failure() {
        let agent = stub_agent(Role::Coder);
        let tasks = assemble_tasks("x", &[Role::Coder], std::slice::from_ref(&agent));
        let crew = Crew::new(vec![agent], tasks).unwrap();
        let engine = RecordingEngine::failing();

        let err = run_crew(&engine, &crew).await.unwrap_err();
        assert!(matches!(err, CrewError::TaskFailed { .. }));
        assert_eq!(engine.calls(), 1);
    }
}
