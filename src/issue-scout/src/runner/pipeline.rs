//! The discovery, selection and analysis loop of a single run.

use super::RunnerError;
use crate::analysis::IssueAnalyzer;
use crate::config::RunContext;
use crate::discovery::{DiscoveryError, IssueCandidate, IssueDiscovery};
use crate::ledger::ActivityLog;
use crate::repositories::RepositoryId;
use crate::selection::SelectionPipeline;
use crate::summary::{ProcessedIssue, RunSummary};
use chrono::Utc;
use tracing::{info, info_span, warn, Instrument};

/// Runs discovery over `repositories`, selects issues and processes them.
///
/// Repositories are scanned in list order and selected issues are processed
/// one at a time in rank order. A repository whose discovery fails is
/// skipped. Every outcome is recorded in the ledger as soon as it is known,
/// then appended to `activity` if given.
///
/// # Errors
///
/// Returns [`RunnerError::Ledger`] if an outcome cannot be recorded. Issues
/// processed before the failure keep their ledger entries.
pub async fn run_pipeline(
    repositories: &[RepositoryId],
    discovery: &dyn IssueDiscovery,
    analyzer: &dyn IssueAnalyzer,
    pipeline: &mut SelectionPipeline,
    context: &RunContext,
    activity: Option<&ActivityLog>,
) -> Result<RunSummary, RunnerError> {
    let mut summary = RunSummary::new(context.dry_run());

    let candidates = gather_candidates(repositories, discovery, context, &mut summary).await;
    summary.issues_discovered = candidates.len();

    let selection = pipeline.select(&candidates, context);
    summary.record_selection(&selection.stats, selection.issues.len());
    info!(
        discovered = candidates.len(),
        eligible = selection.stats.eligible,
        already_processed = selection.stats.already_processed,
        selected = selection.issues.len(),
        "Selected issues"
    );

    for candidate in &selection.issues {
        let span = info_span!(
            "process_issue",
            repo = %candidate.repository,
            issue = candidate.number
        );
        let outcome = analyzer
            .analyze_and_post(candidate, context.dry_run())
            .instrument(span)
            .await;

        let processed_at = Utc::now();
        pipeline.record(&candidate.repository, candidate.number, outcome, processed_at)?;
        info!(
            repo = %candidate.repository,
            issue = candidate.number,
            outcome = %outcome,
            "Recorded outcome"
        );

        if let Some(activity) = activity {
            if let Err(e) =
                activity.append(&candidate.repository, candidate.number, outcome, processed_at)
            {
                warn!(error = %e, dir = %activity.dir().display(), "Failed to write activity log");
            }
        }

        summary.record_outcome(ProcessedIssue {
            repository: candidate.repository.clone(),
            number: candidate.number,
            url: candidate.url.clone(),
            outcome,
        });
    }

    Ok(summary)
}

async fn gather_candidates(
    repositories: &[RepositoryId],
    discovery: &dyn IssueDiscovery,
    context: &RunContext,
    summary: &mut RunSummary,
) -> Vec<IssueCandidate> {
    let mut candidates = Vec::new();

    for repository in repositories {
        match discovery.discover(repository, context.target_labels()).await {
            Ok(found) => {
                info!(repo = %repository, count = found.len(), "Scanned repository");
                summary.repositories_scanned += 1;
                candidates.extend(found);
            }
            Err(e @ DiscoveryError::RateLimited { .. }) => {
                warn!(repo = %repository, error = %e, "Rate limited, skipping repository");
                summary.repositories_skipped += 1;
            }
            Err(e @ DiscoveryError::NotFound { .. }) => {
                warn!(repo = %repository, error = %e, "Skipping repository");
                summary.repositories_skipped += 1;
            }
            Err(e) => {
                warn!(repo = %repository, error = %e, "Failed to list issues, skipping repository");
                summary.repositories_skipped += 1;
            }
        }
    }

    candidates
}
