//! Immutable per-invocation run context.

use super::ConfigError;

/// Default per-run quota.
pub const DEFAULT_MAX_ISSUES_PER_RUN: usize = 10;

/// Labels targeted when none are configured, highest priority first.
pub const DEFAULT_TARGET_LABELS: [&str; 2] = ["good first issue", "help wanted"];

/// Settings that stay fixed for the duration of a single run.
///
/// Built once per invocation and passed by reference into the selection
/// pipeline. Construction validates the inputs, so holding a `RunContext`
/// means the label set is non-empty and the quota is positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    target_labels: Vec<String>,
    max_issues_per_run: usize,
    dry_run: bool,
}

impl RunContext {
    /// Creates a validated run context.
    ///
    /// Labels are trimmed; blank entries and case-insensitive repeats are
    /// dropped while keeping the first occurrence, so priority order survives.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyTargetLabels`] when no usable label remains
    /// and [`ConfigError::InvalidQuota`] when `max_issues_per_run` is zero.
    pub fn new<I, S>(
        target_labels: I,
        max_issues_per_run: usize,
        dry_run: bool,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut labels: Vec<String> = Vec::new();
        for label in target_labels {
            let label = label.as_ref().trim();
            if label.is_empty() || labels.iter().any(|l| l.eq_ignore_ascii_case(label)) {
                continue;
            }
            labels.push(label.to_string());
        }

        if labels.is_empty() {
            return Err(ConfigError::EmptyTargetLabels);
        }
        if max_issues_per_run == 0 {
            return Err(ConfigError::InvalidQuota {
                value: max_issues_per_run,
            });
        }

        Ok(Self {
            target_labels: labels,
            max_issues_per_run,
            dry_run,
        })
    }

    /// Returns the target labels, highest priority first.
    pub fn target_labels(&self) -> &[String] {
        &self.target_labels
    }

    /// Returns the per-run issue quota.
    pub fn max_issues_per_run(&self) -> usize {
        self.max_issues_per_run
    }

    /// Returns whether posting is suppressed for this run.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the priority rank of the first target label present in `labels`.
    ///
    /// Lower is better. `None` means the labels share nothing with the target set.
    pub fn label_rank<S: AsRef<str>>(&self, labels: &[S]) -> Option<usize> {
        self.target_labels.iter().position(|target| {
            labels
                .iter()
                .any(|label| label.as_ref().eq_ignore_ascii_case(target))
        })
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self {
            target_labels: DEFAULT_TARGET_LABELS.iter().map(|l| l.to_string()).collect(),
            max_issues_per_run: DEFAULT_MAX_ISSUES_PER_RUN,
            dry_run: false,
        }
    }
}
