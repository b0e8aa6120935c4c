//! Structured observability hooks for the crew run lifecycle.
//!
//! - Run-scoped tracing span via [`crew_span`]
//! - Emission functions for key lifecycle events: crew start/finish,
//!   task start/finish, delegation, model fallback

use tracing::{info, warn};

use crate::roles::Role;

/// Run-scoped span; every event recorded inside it carries `crew_run_id`.
///
/// ```ignore
/// async { /* ... */ }.instrument(crew_span("5f0c...")).await
/// ```
pub fn crew_span(run_id: &str) -> tracing::Span {
    tracing::info_span!("crew.run", crew_run_id = %run_id)
}

/// Emit event: crew run started.
pub fn emit_crew_started(run_id: &str, agents: usize, tasks: usize) {
    info!(event = "crew.started", run_id = %run_id, agents = agents, tasks = tasks);
}

/// Emit event: crew run finished with duration and outcome.
pub fn emit_crew_finished(run_id: &str, duration_ms: u64, tasks: usize, success: bool) {
    info!(
        event = "crew.finished",
        run_id = %run_id,
        duration_ms = duration_ms,
        tasks = tasks,
        success = success,
    );
}

/// Emit event: an agent started working on its task.
pub fn emit_task_started(run_id: &str, position: usize, role: Role, model: &str) {
    info!(
        event = "task.started",
        run_id = %run_id,
        position = position,
        role = %role,
        model = %model,
    );
}

/// Emit event: an agent produced its final answer.
pub fn emit_task_finished(
    run_id: &str,
    position: usize,
    role: Role,
    duration_ms: u64,
    output_chars: usize,
) {
    info!(
        event = "task.finished",
        run_id = %run_id,
        position = position,
        role = %role,
        duration_ms = duration_ms,
        output_chars = output_chars,
    );
}

/// Emit event: a delegating agent consulted a coworker.
pub fn emit_task_delegated(run_id: &str, from: Role, to: Role) {
    info!(event = "task.delegated", run_id = %run_id, from = %from, to = %to);
}

/// Emit event: preferred model unavailable, falling back (warning level).
pub fn emit_model_fallback(requested: &str, fallback: &str, error: &dyn std::fmt::Display) {
    warn!(
        event = "model.fallback",
        model = %requested,
        fallback = %fallback,
        error = %error,
        "model not available, using fallback"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_crew_span_is_named_and_tags_events() {
        let span = crew_span("test-run-id");
        assert_eq!(span.metadata().map(|m| m.name()), Some("crew.run"));

        let _guard = span.entered();
        emit_task_delegated("test-run-id", Role::Architect, Role::Coder);
        assert!(logs_contain("crew.run{crew_run_id=test-run-id}"));
    }
}
