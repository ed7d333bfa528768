//! Repository identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// An `owner/name` GitHub repository identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepositoryId {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl RepositoryId {
    /// Creates an identifier from its parts without validation.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Returns `true` if both parts are non-empty.
    pub fn is_well_formed(&self) -> bool {
        !self.owner.is_empty() && !self.name.is_empty()
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Reason a repository reference could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid repository reference '{input}': expected owner/name or a GitHub URL")]
pub struct InvalidRepository {
    /// The rejected input.
    pub input: String,
}

impl FromStr for RepositoryId {
    type Err = InvalidRepository;

    /// Parses `owner/name` or a `https://github.com/owner/name` URL.
    ///
    /// URLs may carry a `.git` suffix or extra path segments
    /// (e.g. `/issues`), which are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = || InvalidRepository {
            input: input.to_string(),
        };

        let (owner, name) = if input.contains("://") {
            let url = Url::parse(input).map_err(|_| invalid())?;
            if !matches!(url.host_str(), Some("github.com" | "www.github.com")) {
                return Err(invalid());
            }
            let mut segments = url.path_segments().ok_or_else(invalid)?;
            let owner = segments.next().unwrap_or_default();
            let name = segments.next().unwrap_or_default();
            (owner.to_string(), name.to_string())
        } else {
            let (owner, name) = input.split_once('/').ok_or_else(invalid)?;
            if name.contains('/') {
                return Err(invalid());
            }
            (owner.to_string(), name.to_string())
        };

        let name = name.strip_suffix(".git").unwrap_or(&name).to_string();
        if !is_valid_segment(&owner) || !is_valid_segment(&name) {
            return Err(invalid());
        }
        Ok(Self { owner, name })
    }
}

impl TryFrom<String> for RepositoryId {
    type Error = InvalidRepository;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RepositoryId> for String {
    fn from(value: RepositoryId) -> Self {
        value.to_string()
    }
}

/// GitHub owner and repository names use ASCII alphanumerics, `-`, `_` and `.`.
pub(super) fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_name() {
        let repo: RepositoryId = "rust-lang/rust".parse().unwrap();
        assert_eq!(repo, RepositoryId::new("rust-lang", "rust"));
        assert_eq!(repo.to_string(), "rust-lang/rust");
    }

    #[test]
    fn parses_github_urls() {
        let repo: RepositoryId = "https://github.com/tokio-rs/tokio.git".parse().unwrap();
        assert_eq!(repo, RepositoryId::new("tokio-rs", "tokio"));

        let repo: RepositoryId = "https://github.com/serde-rs/serde/issues/"
            .parse()
            .unwrap();
        assert_eq!(repo, RepositoryId::new("serde-rs", "serde"));
    }

    #[test]
    fn rejects_malformed_references() {
        for input in [
            "",
            "owner",
            "owner/",
            "/name",
            "a/b/c",
            "https://gitlab.com/a/b",
            "https://github.com/only-owner",
            "own er/name",
        ] {
            assert!(input.parse::<RepositoryId>().is_err(), "{input}");
        }
    }

    #[test]
    fn serializes_as_full_name() {
        let repo = RepositoryId::new("a", "repo1");
        let json = serde_json::to_string(&repo).unwrap();
        assert_eq!(json, "\"a/repo1\"");
        let back: RepositoryId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, repo);
    }
}
