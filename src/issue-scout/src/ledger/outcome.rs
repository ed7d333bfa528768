//! Processing outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened when a selected issue was acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// A solution summary was posted.
    Commented,

    /// A solution summary was posted together with an assignment request.
    AssignmentRequested,

    /// Analysis ran in dry-run mode; nothing was posted.
    SkippedDryRun,

    /// Analysis or posting failed.
    Failed,
}

impl Outcome {
    /// Returns `true` if this outcome permanently excludes the issue from selection.
    ///
    /// Dry runs and failures stay eligible so they are retried on a later run.
    #[must_use]
    pub fn is_final(self) -> bool {
        matches!(self, Self::Commented | Self::AssignmentRequested)
    }

    /// Returns the outcome as its kebab-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Commented => "commented",
            Self::AssignmentRequested => "assignment-requested",
            Self::SkippedDryRun => "skipped-dry-run",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
