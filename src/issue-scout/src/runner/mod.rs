//! Orchestrates a scan, selection and commenting run.

mod config;
mod error;
mod pipeline;

pub use config::RunnerConfig;
pub use error::RunnerError;
pub use pipeline::run_pipeline;

use crate::analysis::LlmCommenter;
use crate::config::{AgentConfig, RunContext};
use crate::discovery::{expand_entries, GitHubDiscovery, TOP_REPOSITORIES_PER_OWNER};
use crate::ledger::{ActivityLog, Ledger};
use crate::repositories::{load_repository_list, RepositoryEntry};
use crate::selection::SelectionPipeline;
use crate::summary::RunSummary;
use chrono::{Duration, Utc};
use octocrab::Octocrab;
use tracing::{info, warn};

/// Wires the GitHub and LLM clients into [`run_pipeline`].
pub struct Runner {
    config: RunnerConfig,
    octocrab: Octocrab,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let octocrab = Octocrab::builder()
            .personal_token(config.token().to_string())
            .build()?;
        Ok(Self { config, octocrab })
    }

    /// Executes the full orchestration flow.
    ///
    /// Configuration, the ledger and the repository list are all loaded
    /// before the first GitHub call, so any of them being invalid aborts the
    /// run without touching the network. Organization and user entries are
    /// expanded to their most starred repositories once authenticated.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let Prepared {
            agent_config,
            context,
            ledger,
            entries,
        } = prepare(&self.config)?;
        if entries.is_empty() {
            warn!("No repositories to scan");
            return Ok(RunSummary::new(context.dry_run()));
        }

        let login = self.octocrab.current().user().await?.login;
        info!(login = %login, "Authenticated");

        let discovery =
            GitHubDiscovery::new(self.octocrab.clone(), agent_config.scan.screening_rules());
        let repositories = expand_entries(&entries, &discovery, TOP_REPOSITORIES_PER_OWNER).await;
        info!(count = repositories.len(), "Resolved repositories");

        let analyzer = LlmCommenter::new(self.octocrab.clone(), login, &agent_config);
        let mut pipeline = SelectionPipeline::new(ledger);
        let activity = ActivityLog::new(self.config.log_dir());

        run_pipeline(
            &repositories,
            &discovery,
            &analyzer,
            &mut pipeline,
            &context,
            Some(&activity),
        )
        .await
    }
}

/// Local state a run needs before its first GitHub call.
struct Prepared {
    agent_config: AgentConfig,
    context: RunContext,
    ledger: Ledger,
    entries: Vec<RepositoryEntry>,
}

/// Loads configuration, opens and compacts the ledger, then reads the
/// repository list.
fn prepare(config: &RunnerConfig) -> Result<Prepared, RunnerError> {
    let agent_config = AgentConfig::load(config.config_path())?;
    let context = agent_config.run_context(config.max_issues(), config.dry_run())?;
    info!(
        labels = ?context.target_labels(),
        max_issues = context.max_issues_per_run(),
        dry_run = context.dry_run(),
        "Starting run"
    );

    let mut ledger = Ledger::open(config.ledger_path())?;
    let retention = Duration::days(i64::from(agent_config.ledger.dry_run_retention_days));
    ledger.compact_dry_runs(retention, Utc::now())?;

    info!(path = %config.repos_file().display(), "Loading repository list");
    let entries = load_repository_list(config.repos_file())?;

    Ok(Prepared {
        agent_config,
        context,
        ledger,
        entries,
    })
}
