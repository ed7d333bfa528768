//! CLI for issue-scout.
//!
//! Scans a list of repositories for beginner-friendly issues, drafts a
//! solution summary for the best candidates with an LLM and posts it as a
//! comment. Meant to run on a schedule; the ledger keeps runs from
//! commenting on the same issue twice.

use clap::builder::BoolishValueParser;
use clap::Parser;
use issue_scout::{RunSummary, Runner, RunnerConfig, RunnerError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// issue-scout - Find beginner-friendly GitHub issues and offer a solution outline.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Analyze issues and preview comments without posting anything.
    #[arg(long, env = "DRY_RUN", value_parser = BoolishValueParser::new())]
    dry_run: bool,

    /// Maximum issues to process this run (overrides config.toml).
    #[arg(long, env = "MAX_ISSUES_PER_RUN")]
    max_issues: Option<usize>,

    /// Repository list, one `owner/name` or GitHub URL per line.
    #[arg(long, default_value = "repos.txt")]
    repos_file: PathBuf,

    /// Agent settings file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Processed-issue ledger.
    #[arg(long, default_value = "state/ledger.json")]
    ledger: PathBuf,

    /// Directory for the daily activity log.
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    // octocrab and serdes-ai both pull in rustls; pick one provider for the process.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    match run(args).await {
        Ok(summary) => report(&summary),
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Prints the run summary.
///
/// Per-issue failures are retried on the next run, so they are reported but
/// do not fail the process.
fn report(summary: &RunSummary) -> ExitCode {
    println!("\n{summary}");
    if summary.has_failures() {
        warn!(failed = summary.failed, "Some issues failed and will be retried next run");
    }
    ExitCode::SUCCESS
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info", or
///   "debug" with `--verbose`)
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}

async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let config = RunnerConfig::new(args.token)
        .with_repos_file(args.repos_file)
        .with_config_path(args.config)
        .with_ledger_path(args.ledger)
        .with_log_dir(args.log_dir)
        .with_dry_run(args.dry_run)
        .with_max_issues(args.max_issues);
    let runner = Runner::new(config)?;
    runner.run().await
}
