//! Runner configuration.

use std::path::{Path, PathBuf};

/// Paths and command-line overrides for one run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// GitHub token used for API calls.
    token: String,
    /// Repository list, one `owner/name` per line.
    repos_file: PathBuf,
    /// Agent settings (`config.toml`).
    config_path: PathBuf,
    /// Processed-issue ledger snapshot.
    ledger_path: PathBuf,
    /// Directory for the daily activity log.
    log_dir: PathBuf,
    /// Whether to preview comments without posting.
    dry_run: bool,
    /// Overrides `[scan] max-issues-per-run` when set.
    max_issues: Option<usize>,
}

impl RunnerConfig {
    /// Creates a configuration with the default file locations.
    pub fn new(token: String) -> Self {
        Self {
            token,
            repos_file: PathBuf::from("repos.txt"),
            config_path: PathBuf::from("config.toml"),
            ledger_path: PathBuf::from("state/ledger.json"),
            log_dir: PathBuf::from("logs"),
            dry_run: false,
            max_issues: None,
        }
    }

    /// Sets the repository list path.
    pub fn with_repos_file(mut self, repos_file: PathBuf) -> Self {
        self.repos_file = repos_file;
        self
    }

    /// Sets the `config.toml` path.
    pub fn with_config_path(mut self, config_path: PathBuf) -> Self {
        self.config_path = config_path;
        self
    }

    /// Sets the ledger snapshot path.
    pub fn with_ledger_path(mut self, ledger_path: PathBuf) -> Self {
        self.ledger_path = ledger_path;
        self
    }

    /// Sets the activity log directory.
    pub fn with_log_dir(mut self, log_dir: PathBuf) -> Self {
        self.log_dir = log_dir;
        self
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Overrides the per-run issue quota.
    pub fn with_max_issues(mut self, max_issues: Option<usize>) -> Self {
        self.max_issues = max_issues;
        self
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn repos_file(&self) -> &Path {
        &self.repos_file
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the quota override, if any.
    pub fn max_issues(&self) -> Option<usize> {
        self.max_issues
    }
}
