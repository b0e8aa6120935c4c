//! Chat prompt construction for crew tasks.
//!
//! Delegating agents are told about their coworkers and may ask them for help
//! with lines of the form `DELEGATE <role>: <request>`.

use std::fmt::Write as _;

use ollama_client::ChatMessage;

use crate::agent::AgentHandle;
use crate::crew::{Delegation, TaskOutput};
use crate::roles::Role;
use crate::task::TaskRecord;

/// Upper bound on coworker consultations per task.
pub const MAX_DELEGATIONS: usize = 3;

const DELEGATE_PREFIX: &str = "DELEGATE ";

/// System message describing the agent, plus its coworkers when it may delegate.
pub fn system_prompt(agent: &AgentHandle, coworkers: &[&AgentHandle]) -> String {
    let mut prompt = format!(
        "You are {}. {}\nYour personal goal is: {}",
        agent.title, agent.persona, agent.objective
    );

    if agent.allow_delegation && !coworkers.is_empty() {
        prompt.push_str("\n\nYou can ask the following coworkers for help:\n");
        for coworker in coworkers {
            let _ = writeln!(
                prompt,
                "- {}: {}. {}",
                coworker.role, coworker.title, coworker.objective
            );
        }
        let _ = write!(
            prompt,
            "To ask a coworker, write a line of the form\n{DELEGATE_PREFIX}<coworker>: <request>\n\
             You will receive their answers before giving your final answer. \
             At most {MAX_DELEGATIONS} requests are answered."
        );
    }

    prompt
}

/// User message for `task`, with the outputs of earlier tasks as context.
pub fn task_prompt(task: &TaskRecord, context: &[TaskOutput]) -> String {
    let mut prompt = format!(
        "Current Task: {}\n\n\
         This is the expected criteria for your final answer: {}\n\
         You MUST return the actual complete content as the final answer, not a summary.",
        task.instruction, task.expected_output
    );

    if !context.is_empty() {
        prompt.push_str("\n\nThis is the context you're working with:\n");
        for output in context {
            let _ = write!(prompt, "\n## {} ({})\n{}\n", output.agent, output.role, output.raw);
        }
    }

    prompt
}

/// Initial conversation for a task.
pub fn task_messages(
    task: &TaskRecord,
    coworkers: &[&AgentHandle],
    context: &[TaskOutput],
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt(&task.agent, coworkers)),
        ChatMessage::user(task_prompt(task, context)),
    ]
}

/// Message sent to a coworker on behalf of a delegating agent.
pub fn delegation_request(from: &AgentHandle, request: &str, task: &TaskRecord) -> String {
    format!(
        "{} asks for your help with: {request}\n\nOverall task: {}",
        from.title, task.instruction
    )
}

/// Follow-up message returning coworker answers to the delegating agent.
pub fn delegation_followup(delegations: &[Delegation]) -> String {
    let mut prompt = String::from("Your coworkers answered:\n");
    for delegation in delegations {
        let _ = write!(
            prompt,
            "\n### {}\nRequest: {}\nAnswer: {}\n",
            delegation.to.descriptor().title,
            delegation.request,
            delegation.answer
        );
    }
    prompt.push_str("\nNow give your complete final answer to the task.");
    prompt
}

/// Extract `DELEGATE <role>: <request>` directives addressed to `coworkers`.
///
/// Directives naming unknown roles, roles outside `coworkers`, or carrying an
/// empty request are ignored. At most [`MAX_DELEGATIONS`] are returned.
pub fn parse_delegations(reply: &str, coworkers: &[Role]) -> Vec<(Role, String)> {
    reply
        .lines()
        .filter_map(|line| line.trim().strip_prefix(DELEGATE_PREFIX))
        .filter_map(|rest| {
            let (target, request) = rest.split_once(':')?;
            let role = target.parse::<Role>().ok()?;
            let request = request.trim();
            (coworkers.contains(&role) && !request.is_empty())
                .then(|| (role, request.to_string()))
        })
        .take(MAX_DELEGATIONS)
        .collect()
}
