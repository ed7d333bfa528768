//! Run summary types.

use super::result::ProcessedIssue;
use crate::ledger::Outcome;
use crate::selection::SelectionStats;
use std::fmt;

/// Summary of a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Repositories whose issues were listed successfully.
    pub repositories_scanned: usize,

    /// Repositories skipped because discovery failed (rate limit, not found, API error).
    pub repositories_skipped: usize,

    /// Candidates returned by discovery across all repositories.
    pub issues_discovered: usize,

    /// Candidates that passed label and ledger filtering.
    pub issues_eligible: usize,

    /// Candidates selected for processing after the quota.
    pub issues_selected: usize,

    /// Issues commented on or asked to be assigned.
    pub succeeded: usize,

    /// Issues whose analysis or comment failed.
    pub failed: usize,

    /// Issues previewed without posting.
    pub skipped: usize,

    /// Issues acted on, in processing order.
    pub processed: Vec<ProcessedIssue>,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with the counters of a selection pass.
    pub fn record_selection(&mut self, stats: &SelectionStats, selected: usize) {
        self.issues_eligible = stats.eligible;
        self.issues_selected = selected;
    }

    /// Updates the summary with the outcome for one issue.
    pub fn record_outcome(&mut self, issue: ProcessedIssue) {
        match issue.outcome {
            Outcome::Commented | Outcome::AssignmentRequested => self.succeeded += 1,
            Outcome::SkippedDryRun => self.skipped += 1,
            Outcome::Failed => self.failed += 1,
        }
        self.processed.push(issue);
    }

    /// Returns true if any issue failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.dry_run { " (dry run)" } else { "" };
        writeln!(f, "Run summary{mode}:")?;
        writeln!(
            f,
            "  Repositories: {} scanned, {} skipped",
            self.repositories_scanned, self.repositories_skipped
        )?;
        writeln!(
            f,
            "  Issues: {} discovered, {} eligible, {} selected",
            self.issues_discovered, self.issues_eligible, self.issues_selected
        )?;
        write!(
            f,
            "  Outcomes: {} succeeded, {} failed, {} skipped",
            self.succeeded, self.failed, self.skipped
        )?;
        for issue in &self.processed {
            write!(f, "\n    {issue}")?;
        }
        Ok(())
    }
}
