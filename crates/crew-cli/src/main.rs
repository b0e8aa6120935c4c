//! agent-crew - run a task through a crew of local Ollama agents
//!
//! Each selected agent gets one task, executed sequentially in a fixed role
//! order: architect, coder, tester, reviewer, researcher, docwriter.
//!
//! ```text
//! agent-crew --task "Create a REST API" --agents coder,tester
//! agent-crew --task "Design auth system" --agents architect,coder,reviewer --output design.md
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crew_core::{
    create_crew, parse_role_list, run_crew, AgentFactory, CrewConfig, CrewEngine, ModelProvider,
    ModelResolver, OllamaProvider, SequentialEngine,
};
use tracing::{info, Level};

const BANNER_RULE: &str =
    "============================================================";

/// Number of task characters shown in the start banner
const TASK_PREVIEW_CHARS: usize = 50;

const AFTER_HELP: &str = "\
Available Agents:
  architect   - System design and architecture
  coder       - Code implementation
  tester      - Test writing and QA
  reviewer    - Code review and security
  researcher  - Documentation research
  docwriter   - Technical writing

Examples:
  agent-crew --task \"Create a REST API\" --agents coder,tester
  agent-crew --task \"Design auth system\" --agents architect,coder,reviewer
  agent-crew --task \"Document the API\" --agents researcher,docwriter

Environment:
  OLLAMA_HOST   Ollama server URL (default: http://localhost:11434)
  RUST_LOG      Log filter override";

#[derive(Parser, Debug)]
#[command(name = "agent-crew")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multi-agent crew for local Ollama models", long_about = None)]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// Task description
    #[arg(long)]
    task: String,

    /// Comma-separated agent names
    #[arg(long)]
    agents: String,

    /// Output file for results
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    crew_core::init_tracing(cli.json, level);

    let config = CrewConfig::from_env();
    info!(ollama_host = %config.ollama_host(), "using Ollama server");
    let provider =
        OllamaProvider::from_config(&config).context("Failed to create Ollama client")?;

    let result = cmd_run(
        &cli.task,
        &cli.agents,
        Arc::new(provider),
        &config.fallback_model,
        &SequentialEngine::new(),
    )
    .await?;

    match cli.output {
        Some(path) => {
            write_result(&path, &result)?;
            println!("Results saved to {}", path.display());
        }
        None => println!("{result}"),
    }

    Ok(())
}

/// Build the crew for `agents`, run `task` through it and return the result.
async fn cmd_run(
    task: &str,
    agents: &str,
    provider: Arc<dyn ModelProvider>,
    fallback_model: &str,
    engine: &dyn CrewEngine,
) -> Result<String> {
    println!("{}", start_banner(task, agents));

    let selection = parse_role_list(agents);
    let factory = AgentFactory::new(ModelResolver::new(provider, fallback_model));
    let crew = create_crew(&factory, task, &selection)
        .await
        .context("Failed to assemble crew")?;

    let result = run_crew(engine, &crew).await.context("Crew run failed")?;

    println!("\n{BANNER_RULE}\n  CREW COMPLETED\n{BANNER_RULE}\n");
    Ok(result)
}

fn start_banner(task: &str, agents: &str) -> String {
    let preview: String = task.chars().take(TASK_PREVIEW_CHARS).collect();
    let names: Vec<&str> = agents.split(',').map(str::trim).collect();
    format!(
        "\n{BANNER_RULE}\n  AGENT CREW\n  Task: {preview}...\n  Agents: {}\n{BANNER_RULE}\n",
        names.join(", ")
    )
}

fn write_result(path: &Path, result: &str) -> Result<()> {
    std::fs::write(path, result)
        .with_context(|| format!("Failed to write results to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use crew_core::fakes::{RecordingEngine, StubProvider};
    use crew_core::{CrewError, Role, FALLBACK_MODEL};

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_requires_task_and_agents() {
        assert!(Cli::try_parse_from(["agent-crew", "--task", "x"]).is_err());
        assert!(Cli::try_parse_from(["agent-crew", "--agents", "coder"]).is_err());

        let cli = Cli::try_parse_from([
            "agent-crew",
            "--task",
            "Create a REST API",
            "--agents",
            "coder,tester",
            "--output",
            "out.md",
        ])
        .unwrap();
        assert_eq!(cli.task, "Create a REST API");
        assert_eq!(cli.agents, "coder,tester");
        assert_eq!(cli.output, Some(PathBuf::from("out.md")));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_help_lists_every_agent() {
        for role in Role::ALL {
            assert!(AFTER_HELP.contains(role.as_str()), "missing {role}");
        }
    }

    #[test]
    fn test_start_banner_truncates_task() {
        let task = "a".repeat(80);
        let banner = start_banner(&task, "coder , tester");
        assert!(banner.contains(&format!("Task: {}...", "a".repeat(50))));
        assert!(!banner.contains(&"a".repeat(51)));
        assert!(banner.contains("Agents: coder, tester"));
    }

    #[tokio::test]
    async fn test_cmd_run_returns_engine_result() {
        let engine = RecordingEngine::new("crew result");
        let result = cmd_run(
            "Create a REST API",
            "coder,tester",
            Arc::new(StubProvider::new()),
            FALLBACK_MODEL,
            &engine,
        )
        .await
        .unwrap();

        assert_eq!(result, "crew result");
        assert_eq!(engine.task_roles(), vec![vec![Role::Coder, Role::Tester]]);
    }

    #[tokio::test]
    async fn test_cmd_run_skips_unknown_agent() {
        let engine = RecordingEngine::new("ok");
        cmd_run(
            "Create a REST API",
            "bogus,coder",
            Arc::new(StubProvider::new()),
            FALLBACK_MODEL,
            &engine,
        )
        .await
        .unwrap();

        assert_eq!(engine.task_roles(), vec![vec![Role::Coder]]);
    }

    #[tokio::test]
    async fn test_cmd_run_with_no_valid_agents_fails_before_engine() {
        let engine = RecordingEngine::new("never");
        let err = cmd_run(
            "anything",
            "bogus",
            Arc::new(StubProvider::new()),
            FALLBACK_MODEL,
            &engine,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CrewError>(),
            Some(CrewError::NoValidAgents)
        ));
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_cmd_run_rejects_capitalised_agent_names() {
        let engine = RecordingEngine::new("never");
        let err = cmd_run(
            "anything",
            "Coder,TESTER",
            Arc::new(StubProvider::new()),
            FALLBACK_MODEL,
            &engine,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CrewError>(),
            Some(CrewError::NoValidAgents)
        ));
        assert_eq!(engine.calls(), 0);
    }

    #[test]
    fn test_write_result_writes_raw_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.md");

        write_result(&path, "# Design\n\nplain text").unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# Design\n\nplain text"
        );
    }

    #[test]
    fn test_write_result_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("result.md");
        assert!(write_result(&path, "x").is_err());
    }
}
