//! Repository list loading.
//!
//! The list is a flat text file with one repository per line, either as
//! `owner/name` or as a GitHub URL. A URL naming only an organization or
//! user stands for that owner's most starred repositories. Blank lines and
//! `#` comments are ignored.

mod entry;
mod repository_id;

pub use entry::RepositoryEntry;
pub use repository_id::{InvalidRepository, RepositoryId};

use crate::config::ConfigError;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Parses repository list text into entries, preserving order.
///
/// Invalid lines are logged and skipped. Repeated entries keep their first
/// position.
#[must_use]
pub fn parse_repository_list(text: &str) -> Vec<RepositoryEntry> {
    let mut seen = HashSet::new();
    let mut repositories = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        match line.parse::<RepositoryEntry>() {
            Ok(entry) => {
                if seen.insert(entry.clone()) {
                    repositories.push(entry);
                }
            }
            Err(e) => warn!(line = index + 1, error = %e, "Skipping repository entry"),
        }
    }

    repositories
}

/// Loads the repository list from a file.
///
/// # Errors
///
/// Returns [`ConfigError::MissingFile`] if the file does not exist and
/// [`ConfigError::IoError`] if it cannot be read.
pub fn load_repository_list(path: &Path) -> Result<Vec<RepositoryEntry>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile {
            path: path.display().to_string(),
        });
    }

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.display().to_string(),
        source,
    })?;
    let repositories = parse_repository_list(&text);
    info!(path = %path.display(), count = repositories.len(), "Loaded repository list");
    Ok(repositories)
}

/// Drops a trailing `#` comment.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}
