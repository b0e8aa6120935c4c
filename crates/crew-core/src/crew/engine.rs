//! In-process sequential engine.
//!
//! Each task is sent to its agent's model in task-record order. Later tasks
//! see the raw output of every earlier task as context. A delegating agent
//! gets one round of coworker consultation per task.

use std::time::Instant;

use async_trait::async_trait;
use ollama_client::ChatMessage;
use tracing::{debug, info, instrument};

use crate::crew::prompt::{
    delegation_followup, delegation_request, parse_delegations, system_prompt, task_messages,
};
use crate::crew::{Crew, CrewEngine, CrewOutput, Delegation, TaskOutput};
use crate::error::{CrewError, CrewResult};
use crate::obs::{emit_task_delegated, emit_task_finished, emit_task_started};
use crate::roles::Role;
use crate::task::TaskRecord;

/// Runs a crew's tasks one after another against their agents' models.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialEngine;

impl SequentialEngine {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip_all, fields(role = %task.role, position = position))]
    async fn execute_task(
        &self,
        crew: &Crew,
        task: &TaskRecord,
        position: usize,
        context: &[TaskOutput],
    ) -> CrewResult<TaskOutput> {
        let run_id = crew.run_id().to_string();
        let agent = &task.agent;
        emit_task_started(&run_id, position, task.role, agent.model.resolved());
        let started = Instant::now();
        if crew.verbose() {
            info!(agent = agent.title, "working on: {}", task.instruction);
        }

        let coworkers = if agent.allow_delegation {
            crew.coworkers_of(task.role)
        } else {
            Vec::new()
        };
        let mut messages = task_messages(task, &coworkers, context);
        let mut reply = agent.model.chat(&messages).await?;

        let mut delegations = Vec::new();
        if !coworkers.is_empty() {
            let coworker_roles: Vec<Role> = coworkers.iter().map(|c| c.role).collect();
            for (to, request) in parse_delegations(&reply, &coworker_roles) {
                let Some(coworker) = crew.agent(to) else {
                    continue;
                };
                emit_task_delegated(&run_id, task.role, to);
                let answer = coworker
                    .model
                    .chat(&[
                        ChatMessage::system(system_prompt(coworker, &[])),
                        ChatMessage::user(delegation_request(agent, &request, task)),
                    ])
                    .await?;
                delegations.push(Delegation {
                    to,
                    request,
                    answer,
                });
            }

            if !delegations.is_empty() {
                messages.push(ChatMessage::assistant(reply));
                messages.push(ChatMessage::user(delegation_followup(&delegations)));
                reply = agent.model.chat(&messages).await?;
            }
        }

        if agent.verbose {
            info!(agent = agent.title, "final answer:\n{}", reply);
        } else {
            debug!(agent = agent.title, chars = reply.len(), "final answer");
        }
        emit_task_finished(
            &run_id,
            position,
            task.role,
            started.elapsed().as_millis() as u64,
            reply.len(),
        );

        Ok(TaskOutput {
            role: task.role,
            agent: agent.title,
            instruction: task.instruction.clone(),
            raw: reply,
            delegations,
        })
    }
}

#[async_trait]
impl CrewEngine for SequentialEngine {
    async fn kickoff(&self, crew: &Crew) -> CrewResult<CrewOutput> {
        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(crew.tasks().len());

        for (position, task) in crew.tasks().iter().enumerate() {
            let output = self
                .execute_task(crew, task, position, &outputs)
                .await
                .map_err(|source| CrewError::TaskFailed {
                    role: task.role,
                    source: Box::new(source),
                })?;
            outputs.push(output);
        }

        Ok(CrewOutput::from_tasks(outputs))
    }
}
