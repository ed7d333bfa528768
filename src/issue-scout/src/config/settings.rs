//! `config.toml` parsing.

use super::run_context::{DEFAULT_MAX_ISSUES_PER_RUN, DEFAULT_TARGET_LABELS};
use super::{ConfigError, RunContext};
use crate::discovery::ScreeningRules;
use crate::llm::LlmConfig;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Parsed contents of `config.toml`.
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AgentConfig {
    /// Issue discovery and selection settings.
    pub scan: ScanSettings,

    /// Comment rendering settings.
    pub comment: CommentSettings,

    /// Processed-issue ledger settings.
    pub ledger: LedgerSettings,

    /// LLM provider configuration.
    pub llm: Option<LlmConfig>,
}

/// The `[scan]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ScanSettings {
    /// Labels to look for, highest priority first.
    pub target_labels: Vec<String>,

    /// Issues carrying any of these labels are never candidates.
    pub exclude_labels: Vec<String>,

    /// Issues older than this are ignored.
    pub max_issue_age_days: u32,

    /// Per-run quota, overridable from the command line.
    pub max_issues_per_run: usize,

    /// Issues with a shorter body are too vague to analyze.
    pub min_body_length: usize,

    /// Issues with more comments than this are likely under active discussion.
    pub max_comments: u32,

    /// Title/body keywords that mark an issue as too large for a drive-by solution.
    pub avoid_keywords: Vec<String>,

    /// Do not comment again if our account commented within this window.
    pub min_comment_interval_hours: u32,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            target_labels: DEFAULT_TARGET_LABELS.iter().map(|l| l.to_string()).collect(),
            exclude_labels: Vec::new(),
            max_issue_age_days: 90,
            max_issues_per_run: DEFAULT_MAX_ISSUES_PER_RUN,
            min_body_length: 50,
            max_comments: 10,
            avoid_keywords: ["redesign", "refactor", "rewrite", "breaking change"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            min_comment_interval_hours: 168,
        }
    }
}

impl ScanSettings {
    /// Builds the discovery-time screening rules from these settings.
    #[must_use]
    pub fn screening_rules(&self) -> ScreeningRules {
        ScreeningRules {
            exclude_labels: self.exclude_labels.clone(),
            max_issue_age_days: self.max_issue_age_days,
            min_body_length: self.min_body_length,
            max_comments: self.max_comments,
            avoid_keywords: self.avoid_keywords.clone(),
        }
    }
}

/// The `[comment]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CommentSettings {
    /// Handlebars template for the posted comment. Falls back to the built-in one.
    pub template: Option<String>,

    /// Ask maintainers to assign the issue in the posted comment.
    pub request_assignment: bool,
}

/// The `[ledger]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LedgerSettings {
    /// Dry-run entries older than this are compacted away on load.
    pub dry_run_retention_days: u32,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            dry_run_retention_days: 30,
        }
    }
}

impl AgentConfig {
    /// Loads `config.toml`, returning defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read, parsed,
    /// or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::parse(&contents, path)?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parses and validates config contents. `path` is used for error messages only.
    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::TomlError {
            path: path.display().to_string(),
            source,
        })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::ValidationError {
            path: path.display().to_string(),
            message: message.to_string(),
        };

        if self.scan.max_issue_age_days == 0 {
            return Err(invalid("scan.max-issue-age-days must be positive"));
        }
        if let Some(template) = &self.comment.template {
            if template.trim().is_empty() {
                return Err(invalid("comment.template must not be empty"));
            }
        }
        Ok(())
    }

    /// Builds the run context, letting command-line values override the file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the resulting labels are empty or the quota is zero.
    pub fn run_context(
        &self,
        max_issues_override: Option<usize>,
        dry_run: bool,
    ) -> Result<RunContext, ConfigError> {
        RunContext::new(
            &self.scan.target_labels,
            max_issues_override.unwrap_or(self.scan.max_issues_per_run),
            dry_run,
        )
    }
}
