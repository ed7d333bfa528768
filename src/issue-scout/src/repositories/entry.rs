//! Repository list entries.

use super::repository_id::{is_valid_segment, InvalidRepository, RepositoryId};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// One line of the repository list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepositoryEntry {
    /// A single repository.
    Repository(RepositoryId),

    /// An organization or user URL, standing for that owner's most starred
    /// repositories.
    Owner(String),
}

impl fmt::Display for RepositoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repository(repository) => repository.fmt(f),
            Self::Owner(owner) => write!(f, "{owner} (owner)"),
        }
    }
}

impl From<RepositoryId> for RepositoryEntry {
    fn from(value: RepositoryId) -> Self {
        Self::Repository(value)
    }
}

impl FromStr for RepositoryEntry {
    type Err = InvalidRepository;

    /// Parses a repository reference, or a `https://github.com/owner` URL.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<RepositoryId>() {
            Ok(repository) => Ok(Self::Repository(repository)),
            Err(e) => owner_from_url(s.trim()).map(Self::Owner).ok_or(e),
        }
    }
}

/// Returns the owner of a GitHub URL whose path is just `/owner`.
fn owner_from_url(input: &str) -> Option<String> {
    if !input.contains("://") {
        return None;
    }
    let url = Url::parse(input).ok()?;
    if !matches!(url.host_str(), Some("github.com" | "www.github.com")) {
        return None;
    }
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    match (segments.next(), segments.next()) {
        (Some(owner), None) if is_valid_segment(owner) => Some(owner.to_string()),
        _ => None,
    }
}
