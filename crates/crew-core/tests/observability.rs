//! Observability tests for crew lifecycle tracing.
//!
//! Verifies that structured events are emitted for crew start/finish, task
//! start/finish, delegation and model fallback.

use std::sync::Arc;

use crew_core::fakes::{RecordingEngine, StubProvider};
use crew_core::{
    create_crew, crew_span, emit_crew_finished, emit_crew_started, emit_model_fallback,
    emit_task_delegated, emit_task_finished, emit_task_started, parse_role_list, run_crew,
    AgentFactory, ModelResolver, Role, FALLBACK_MODEL,
};
use tracing_test::traced_test;

#[traced_test]
#[test]
fn test_emit_crew_started_logs_counts() {
    emit_crew_started("run-123", 2, 2);
    assert!(logs_contain("crew.started"));
    assert!(logs_contain("run-123"));
}

#[traced_test]
#[test]
fn test_emit_crew_finished_logs_outcome() {
    emit_crew_finished("run-456", 5000, 3, true);
    assert!(logs_contain("crew.finished"));
    assert!(logs_contain("success=true"));
}

#[traced_test]
#[test]
fn test_emit_task_events_log_role() {
    emit_task_started("run-789", 0, Role::Coder, "qwen2.5-coder:32b");
    emit_task_finished("run-789", 0, Role::Coder, 1200, 512);
    assert!(logs_contain("task.started"));
    assert!(logs_contain("task.finished"));
    assert!(logs_contain("role=coder"));
}

#[traced_test]
#[test]
fn test_emit_task_delegated_logs_both_roles() {
    emit_task_delegated("run-del", Role::Architect, Role::Researcher);
    assert!(logs_contain("from=architect"));
    assert!(logs_contain("to=researcher"));
}

#[traced_test]
#[test]
fn test_emit_model_fallback_logs_warning() {
    emit_model_fallback("llama3.1:70b", FALLBACK_MODEL, &"model not found");
    assert!(logs_contain("WARN"));
    assert!(logs_contain("using fallback"));
}

#[traced_test]
#[test]
fn test_events_inside_crew_span_carry_run_id() {
    let _guard = crew_span("test-span-run").entered();
    emit_crew_started("test-span-run", 1, 1);
    assert!(logs_contain("crew_run_id=test-span-run"));
}

#[tokio::test]
#[traced_test]
async fn test_run_crew_emits_lifecycle_events() {
    let provider = Arc::new(StubProvider::new());
    let factory = AgentFactory::new(ModelResolver::new(provider, FALLBACK_MODEL));
    let crew = create_crew(&factory, "Create a REST API", &parse_role_list("coder"))
        .await
        .unwrap();

    run_crew(&RecordingEngine::new("done"), &crew).await.unwrap();

    assert!(logs_contain("crew.started"));
    assert!(logs_contain("crew.finished"));
    assert!(logs_contain(&crew.run_id().to_string()));
}

#[tokio::test]
#[traced_test]
async fn test_fallback_resolution_emits_warning() {
    let provider = Arc::new(StubProvider::new().with_unavailable(&["llama3.1:70b"]));
    let factory = AgentFactory::new(ModelResolver::new(provider, FALLBACK_MODEL));

    create_crew(&factory, "x", &parse_role_list("architect"))
        .await
        .unwrap();

    assert!(logs_contain("model.fallback"));
    assert!(logs_contain("llama3.1:70b"));
}
