//! Ledger keys and entries.

use super::Outcome;
use crate::repositories::RepositoryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies an issue across runs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LedgerKey {
    /// Repository containing the issue.
    pub repository: RepositoryId,

    /// Issue number within the repository.
    pub number: u64,
}

impl LedgerKey {
    /// Creates a key.
    pub fn new(repository: RepositoryId, number: u64) -> Self {
        Self { repository, number }
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repository, self.number)
    }
}

/// The last recorded action for an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LedgerEntry {
    /// When the action was taken.
    pub processed_at: DateTime<Utc>,

    /// What the action produced.
    pub outcome: Outcome,
}
