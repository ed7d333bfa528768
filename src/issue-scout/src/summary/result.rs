//! Per-issue processing result.

use crate::ledger::Outcome;
use crate::repositories::RepositoryId;
use std::fmt;

/// An issue the run acted on, with the outcome recorded for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedIssue {
    /// Repository the issue belongs to.
    pub repository: RepositoryId,
    /// Issue number.
    pub number: u64,
    /// GitHub URL of the issue.
    pub url: String,
    /// Outcome recorded in the ledger.
    pub outcome: Outcome,
}

impl fmt::Display for ProcessedIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}: {}", self.repository, self.number, self.outcome)
    }
}
