//! Expansion of owner-only repository list entries.

use super::error::is_not_found;
use super::{DiscoveryError, GitHubDiscovery, RESULTS_PER_PAGE};
use crate::rate_limit::ensure_core_rate_limit;
use crate::repositories::{RepositoryEntry, RepositoryId};
use async_trait::async_trait;
use octocrab::models::Repository;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Repositories taken from each organization or user URL.
pub const TOP_REPOSITORIES_PER_OWNER: usize = 5;

/// Source of an owner's most starred repositories.
#[async_trait]
pub trait OwnerRepositories: Send + Sync {
    /// Returns up to `limit` repositories of `owner`, most starred first.
    ///
    /// `owner` is looked up as an organization first, then as a user.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::OwnerNotFound`] if neither exists.
    async fn top_repositories(
        &self,
        owner: &str,
        limit: usize,
    ) -> Result<Vec<RepositoryId>, DiscoveryError>;
}

#[async_trait]
impl OwnerRepositories for GitHubDiscovery {
    async fn top_repositories(
        &self,
        owner: &str,
        limit: usize,
    ) -> Result<Vec<RepositoryId>, DiscoveryError> {
        let repositories = match self.list_owner_repositories(owner).await {
            Ok(repositories) => repositories,
            Err(e) if is_not_found(&e) => {
                return Err(DiscoveryError::OwnerNotFound {
                    owner: owner.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        Ok(most_starred(owner, repositories, limit))
    }
}

impl GitHubDiscovery {
    /// Lists the first page of an organization's repositories, falling back
    /// to the user of the same name.
    async fn list_owner_repositories(
        &self,
        owner: &str,
    ) -> Result<Vec<Repository>, octocrab::Error> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let organization = self
            .octocrab
            .orgs(owner)
            .list_repos()
            .per_page(RESULTS_PER_PAGE)
            .send()
            .await;

        match organization {
            Ok(page) => Ok(page.items),
            Err(e) if is_not_found(&e) => {
                debug!(owner, "Not an organization, listing user repositories");
                ensure_core_rate_limit(&self.octocrab).await?;
                let page = self
                    .octocrab
                    .users(owner)
                    .repos()
                    .per_page(RESULTS_PER_PAGE)
                    .send()
                    .await?;
                Ok(page.items)
            }
            Err(e) => Err(e),
        }
    }
}

/// Sorts by stars, descending, keeping listing order between equal counts.
fn most_starred(
    owner: &str,
    mut repositories: Vec<Repository>,
    limit: usize,
) -> Vec<RepositoryId> {
    repositories.sort_by_key(|r| std::cmp::Reverse(r.stargazers_count.unwrap_or(0)));
    repositories
        .into_iter()
        .map(|r| RepositoryId::new(owner, r.name))
        .filter(RepositoryId::is_well_formed)
        .take(limit)
        .collect()
}

/// Resolves repository list entries into the repositories to scan.
///
/// Owner entries are replaced in place by their top `limit` repositories.
/// An owner that cannot be listed is logged and skipped. Repositories reached
/// more than once keep their first position.
pub async fn expand_entries(
    entries: &[RepositoryEntry],
    source: &dyn OwnerRepositories,
    limit: usize,
) -> Vec<RepositoryId> {
    let mut seen = HashSet::new();
    let mut repositories = Vec::new();

    for entry in entries {
        let expanded = match entry {
            RepositoryEntry::Repository(repository) => vec![repository.clone()],
            RepositoryEntry::Owner(owner) => match source.top_repositories(owner, limit).await {
                Ok(found) => {
                    info!(owner = %owner, count = found.len(), "Expanded owner repositories");
                    found
                }
                Err(e) => {
                    warn!(owner = %owner, error = %e, "Skipping owner entry");
                    continue;
                }
            },
        };

        for repository in expanded {
            if seen.insert(repository.clone()) {
                repositories.push(repository);
            }
        }
    }

    repositories
}
