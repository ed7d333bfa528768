//! Filtering, ranking and quota enforcement.

use crate::config::RunContext;
use crate::discovery::IssueCandidate;
use crate::ledger::Ledger;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Issues chosen for this run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Selected issues, highest priority first, at most the run quota.
    pub issues: Vec<IssueCandidate>,

    /// How the input was narrowed down.
    pub stats: SelectionStats,
}

/// Counters describing one selection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionStats {
    /// Candidates passed in.
    pub considered: usize,
    /// Candidates missing a repository or issue number.
    pub malformed: usize,
    /// Candidates carrying none of the target labels.
    pub label_filtered: usize,
    /// Candidates the ledger already marks as commented or assignment-requested.
    pub already_processed: usize,
    /// Repeats of a candidate seen earlier in the same input.
    pub duplicates: usize,
    /// Candidates that passed every filter.
    pub eligible: usize,
    /// Eligible candidates left for a later run by the quota.
    pub truncated: usize,
}

/// Chooses the issues to act on this run.
///
/// Candidates are expected in gathering order: per repository, repositories
/// in list order. The result ranks eligible candidates by the position of
/// their best target label, then by age (oldest first), keeping gathering
/// order for full ties, and truncates to the run quota.
///
/// This reads the ledger but never writes it, so calling it twice with the
/// same inputs yields the same selection.
#[must_use]
pub fn select(candidates: &[IssueCandidate], ledger: &Ledger, context: &RunContext) -> Selection {
    let mut stats = SelectionStats {
        considered: candidates.len(),
        ..SelectionStats::default()
    };
    let mut seen = HashSet::new();
    let mut ranked: Vec<(usize, &IssueCandidate)> = Vec::new();

    for candidate in candidates {
        if !candidate.is_well_formed() {
            warn!(
                repo = %candidate.repository,
                issue = candidate.number,
                "Skipping malformed candidate"
            );
            stats.malformed += 1;
            continue;
        }

        let Some(rank) = context.label_rank(&candidate.labels) else {
            stats.label_filtered += 1;
            continue;
        };

        let key = candidate.key();
        if ledger.blocks(&key) {
            debug!(issue = %key, "Already processed, skipping");
            stats.already_processed += 1;
            continue;
        }
        if !seen.insert(key) {
            stats.duplicates += 1;
            continue;
        }

        ranked.push((rank, candidate));
    }

    stats.eligible = ranked.len();

    // `sort_by` is stable: full ties keep gathering order.
    ranked.sort_by(|(rank_a, a), (rank_b, b)| {
        rank_a
            .cmp(rank_b)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });

    let quota = context.max_issues_per_run();
    stats.truncated = ranked.len().saturating_sub(quota);

    let issues = ranked
        .into_iter()
        .take(quota)
        .map(|(_, candidate)| candidate.clone())
        .collect();

    Selection { issues, stats }
}
