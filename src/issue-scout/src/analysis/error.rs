//! Analysis error types.

use crate::llm::LlmError;
use crate::templates::TemplateError;
use thiserror::Error;

/// Errors while analyzing an issue or posting the comment.
///
/// These never abort a run; the commenter logs them and reports
/// [`Outcome::Failed`](crate::ledger::Outcome::Failed).
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// GitHub API error while reading or posting comments.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The LLM call failed.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The comment template failed to render.
    #[error(transparent)]
    Template(#[from] TemplateError),
}
