//! Human-readable daily activity log.

use super::Outcome;
use crate::repositories::RepositoryId;
use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends one line per processed issue to `processed_issues_YYYYMMDD.log`.
///
/// This is an operator-facing trail only; the [`Ledger`](super::Ledger) is
/// the source of truth for deduplication.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    dir: PathBuf,
}

impl ActivityLog {
    /// Creates a log writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the log directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the daily file that an action at `at` is written to.
    pub fn file_for(&self, at: DateTime<Utc>) -> PathBuf {
        self.dir
            .join(format!("processed_issues_{}.log", at.format("%Y%m%d")))
    }

    /// Appends an activity line, creating the directory and file as needed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened or written.
    pub fn append(
        &self,
        repository: &RepositoryId,
        number: u64,
        outcome: Outcome,
        at: DateTime<Utc>,
    ) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.file_for(at);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{}", format_line(repository, number, outcome, at))?;
        Ok(path)
    }
}

fn format_line(
    repository: &RepositoryId,
    number: u64,
    outcome: Outcome,
    at: DateTime<Utc>,
) -> String {
    format!("{} | {repository} | Issue #{number} | {outcome}", at.to_rfc3339())
}
