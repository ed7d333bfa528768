//! Issue candidates.

use crate::ledger::LedgerKey;
use crate::repositories::RepositoryId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// An open issue returned by discovery, as it looked at discovery time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueCandidate {
    /// Repository the issue belongs to.
    pub repository: RepositoryId,

    /// Issue number, unique within the repository.
    pub number: u64,

    /// Label names on the issue.
    pub labels: Vec<String>,

    /// Issue title.
    pub title: String,

    /// Issue body (empty if the issue has none).
    pub body: String,

    /// When the issue was opened.
    pub created_at: DateTime<Utc>,

    /// Number of comments at discovery time.
    pub comments: u32,

    /// GitHub URL of the issue.
    pub url: String,
}

impl IssueCandidate {
    /// Returns the ledger key identifying this issue.
    pub fn key(&self) -> LedgerKey {
        LedgerKey::new(self.repository.clone(), self.number)
    }

    /// Returns `false` if the repository or issue number is missing.
    pub fn is_well_formed(&self) -> bool {
        self.number != 0 && self.repository.is_well_formed()
    }

    /// Returns `true` if the issue carries `label` (ASCII case-insensitive).
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.eq_ignore_ascii_case(label))
    }
}
