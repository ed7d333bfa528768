//! Issue analysis and commenting.
//!
//! An [`IssueAnalyzer`] takes a selected issue, works out a suggested
//! approach and posts it as a comment. It always reports an [`Outcome`];
//! failures are logged and reported as [`Outcome::Failed`] so one bad issue
//! never stops a run.

mod commenter;
mod error;
mod prompt;
mod response;

pub use commenter::LlmCommenter;
pub use error::AnalysisError;
pub use prompt::IssueComment;
pub use response::AnalysisResponse;

use crate::discovery::IssueCandidate;
use crate::ledger::Outcome;
use async_trait::async_trait;

/// Analyzes an issue and, outside dry runs, posts the result.
#[async_trait]
pub trait IssueAnalyzer: Send + Sync {
    /// Analyzes `candidate` and posts a comment unless `dry_run` is set.
    ///
    /// A dry run must not mutate anything remotely and always yields
    /// [`Outcome::SkippedDryRun`].
    async fn analyze_and_post(&self, candidate: &IssueCandidate, dry_run: bool) -> Outcome;
}
