//! Issue discovery error types.

use crate::repositories::RepositoryId;
use thiserror::Error;

/// Errors that can occur while discovering issues in one repository.
///
/// All variants are recoverable at the run level: the repository is skipped
/// and the remaining repositories are still scanned.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// GitHub rejected the request because a rate limit was hit.
    #[error("Rate limit exceeded while scanning {repository}: {message}")]
    RateLimited {
        repository: RepositoryId,
        message: String,
    },

    /// The repository does not exist or is not visible to the token.
    #[error("Repository {repository} not found or not accessible")]
    NotFound { repository: RepositoryId },

    /// Neither an organization nor a user with this name exists.
    #[error("Owner {owner} not found as an organization or user")]
    OwnerNotFound { owner: String },

    /// Any other GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),
}

impl DiscoveryError {
    /// Maps an octocrab error for `repository` onto the discovery taxonomy.
    pub(crate) fn classify(error: octocrab::Error, repository: &RepositoryId) -> Self {
        if let octocrab::Error::GitHub { source, .. } = &error {
            let status = source.status_code.as_u16();
            if let Some(classified) = Self::from_status(status, &source.message, repository) {
                return classified;
            }
        }
        Self::GitHubError(error)
    }

    /// Classifies a GitHub error response, or returns `None` when the status
    /// is not one the run skips past.
    fn from_status(status: u16, message: &str, repository: &RepositoryId) -> Option<Self> {
        if status == 404 {
            return Some(Self::NotFound {
                repository: repository.clone(),
            });
        }
        if is_rate_limit(status, message) {
            return Some(Self::RateLimited {
                repository: repository.clone(),
                message: message.to_string(),
            });
        }
        None
    }
}

/// Returns `true` if `error` is a GitHub 404 response.
pub(crate) fn is_not_found(error: &octocrab::Error) -> bool {
    matches!(error, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404)
}

/// GitHub signals primary limits with 403 and secondary limits with 403 or 429.
pub(crate) fn is_rate_limit(status: u16, message: &str) -> bool {
    status == 429 || (status == 403 && message.to_lowercase().contains("rate limit"))
}
