//! Issue selection and deduplication.
//!
//! [`select`] is a pure function of the gathered candidates, the ledger and
//! the run context. [`SelectionPipeline`] owns the ledger and exposes the one
//! mutation the orchestrator needs: [`SelectionPipeline::record`], called
//! after an issue has actually been acted upon.

mod select;

pub use select::{select, Selection, SelectionStats};

use crate::config::RunContext;
use crate::discovery::IssueCandidate;
use crate::ledger::{Ledger, LedgerEntry, LedgerError, LedgerKey, Outcome};
use crate::repositories::RepositoryId;
use chrono::{DateTime, Utc};

/// Ledger-aware selection of issues across runs.
#[derive(Debug)]
pub struct SelectionPipeline {
    ledger: Ledger,
}

impl SelectionPipeline {
    /// Creates a pipeline that takes ownership of `ledger`.
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    /// Returns the ledger for inspection.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Consumes the pipeline and returns its ledger.
    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    /// Chooses the issues to act on. Does not modify the ledger.
    #[must_use]
    pub fn select(&self, candidates: &[IssueCandidate], context: &RunContext) -> Selection {
        select(candidates, &self.ledger, context)
    }

    /// Records the outcome of acting on an issue.
    ///
    /// Replaces any earlier entry for the same issue and persists the ledger.
    /// Returns the replaced entry, if any.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the ledger cannot be written.
    pub fn record(
        &mut self,
        repository: &RepositoryId,
        number: u64,
        outcome: Outcome,
        processed_at: DateTime<Utc>,
    ) -> Result<Option<LedgerEntry>, LedgerError> {
        self.ledger.upsert(
            LedgerKey::new(repository.clone(), number),
            LedgerEntry {
                processed_at,
                outcome,
            },
        )
    }
}
