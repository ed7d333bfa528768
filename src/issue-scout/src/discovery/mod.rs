//! Issue discovery.
//!
//! Lists open issues carrying the target labels in a repository and screens
//! out the ones the agent should never touch (pull requests, assigned or
//! stale issues, and issues that look too large or too vague). Organization
//! and user entries in the repository list are expanded here as well.

mod candidate;
mod error;
mod owners;
mod screening;

pub use candidate::IssueCandidate;
pub use error::DiscoveryError;
pub use owners::{expand_entries, OwnerRepositories, TOP_REPOSITORIES_PER_OWNER};
pub use screening::{ScreenReason, ScreeningRules};

use crate::rate_limit::ensure_core_rate_limit;
use crate::repositories::RepositoryId;
use async_trait::async_trait;
use chrono::Utc;
use octocrab::models::issues::Issue;
use octocrab::{params, Octocrab};
use std::collections::HashSet;
use tracing::{debug, info, info_span, Instrument};

/// Maximum issues fetched per label per repository.
const MAX_ISSUES_PER_LABEL: usize = 300;

/// Results per page for issue listing.
const RESULTS_PER_PAGE: u8 = 100;

/// Source of candidate issues for a repository.
#[async_trait]
pub trait IssueDiscovery: Send + Sync {
    /// Returns open issues in `repository` carrying at least one of `labels`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::RateLimited`] or [`DiscoveryError::NotFound`]
    /// for conditions the caller should skip past, and
    /// [`DiscoveryError::GitHubError`] for anything else.
    async fn discover(
        &self,
        repository: &RepositoryId,
        labels: &[String],
    ) -> Result<Vec<IssueCandidate>, DiscoveryError>;
}

/// Discovers issues through the GitHub REST API.
pub struct GitHubDiscovery {
    octocrab: Octocrab,
    rules: ScreeningRules,
}

impl GitHubDiscovery {
    /// Creates a discovery client using `rules` for screening.
    pub fn new(octocrab: Octocrab, rules: ScreeningRules) -> Self {
        Self { octocrab, rules }
    }
}

#[async_trait]
impl IssueDiscovery for GitHubDiscovery {
    async fn discover(
        &self,
        repository: &RepositoryId,
        labels: &[String],
    ) -> Result<Vec<IssueCandidate>, DiscoveryError> {
        let span = info_span!("discover", repo = %repository);

        async {
            let now = Utc::now();
            let mut seen = HashSet::new();
            let mut candidates = Vec::new();

            // GitHub ANDs multiple label filters, so each label is listed separately.
            for label in labels {
                let issues = self
                    .list_labelled_issues(repository, label)
                    .await
                    .map_err(|e| DiscoveryError::classify(e, repository))?;
                debug!(label = %label, count = issues.len(), "Listed labelled issues");

                for issue in &issues {
                    if !seen.insert(issue.number) {
                        continue;
                    }
                    if issue.pull_request.is_some() {
                        continue;
                    }
                    if issue.assignee.is_some() || !issue.assignees.is_empty() {
                        debug!(issue = issue.number, "Skipping assigned issue");
                        continue;
                    }

                    let candidate = to_candidate(repository, issue);
                    if let Some(reason) = self.rules.check(&candidate, now) {
                        debug!(issue = issue.number, reason = %reason, "Screened out issue");
                        continue;
                    }
                    candidates.push(candidate);
                }
            }

            info!(count = candidates.len(), "Discovery complete");
            Ok(candidates)
        }
        .instrument(span)
        .await
    }
}

impl GitHubDiscovery {
    /// Lists open issues with `label`, newest first.
    ///
    /// Paging stops at [`MAX_ISSUES_PER_LABEL`] or once a page reaches issues
    /// past the screening age limit, since everything after it is older.
    async fn list_labelled_issues(
        &self,
        repository: &RepositoryId,
        label: &str,
    ) -> Result<Vec<Issue>, octocrab::Error> {
        ensure_core_rate_limit(&self.octocrab).await?;

        let labels = vec![label.to_string()];
        let mut page = self
            .octocrab
            .issues(&repository.owner, &repository.name)
            .list()
            .state(params::State::Open)
            .labels(&labels)
            .sort(params::issues::Sort::Created)
            .direction(params::Direction::Descending)
            .per_page(RESULTS_PER_PAGE)
            .send()
            .await?;

        let now = Utc::now();
        let mut issues = std::mem::take(&mut page.items);

        while issues.len() < MAX_ISSUES_PER_LABEL {
            let reached_age_limit = issues
                .last()
                .is_some_and(|issue| self.rules.is_too_old(issue.created_at, now));
            if reached_age_limit {
                break;
            }

            ensure_core_rate_limit(&self.octocrab).await?;
            match self.octocrab.get_page::<Issue>(&page.next).await? {
                Some(mut next_page) => {
                    issues.append(&mut next_page.items);
                    page.next = next_page.next;
                }
                None => break,
            }
        }

        issues.truncate(MAX_ISSUES_PER_LABEL);
        Ok(issues)
    }
}

/// Snapshots an API issue as a candidate.
fn to_candidate(repository: &RepositoryId, issue: &Issue) -> IssueCandidate {
    IssueCandidate {
        repository: repository.clone(),
        number: issue.number,
        labels: issue.labels.iter().map(|l| l.name.clone()).collect(),
        title: issue.title.clone(),
        body: issue.body.clone().unwrap_or_default(),
        created_at: issue.created_at,
        comments: issue.comments,
        url: issue.html_url.to_string(),
    }
}
