//! LLM error types.

use thiserror::Error;

/// Errors from resolving a model or running a completion.
#[derive(Debug, Error)]
pub enum LlmError {
    /// LLM model not configured.
    #[error("LLM model not configured; set ISSUE_SCOUT_LLM_MODEL or the [llm] table in config.toml")]
    MissingModel,

    /// LLM call timed out.
    #[error("LLM timed out after {0} seconds")]
    Timeout(u64),

    /// Model error.
    #[error("Model error: {0}")]
    Model(#[from] serdes_ai_models::ModelError),

    /// Agent run error.
    #[error("Agent run error: {0}")]
    AgentRun(#[from] serdes_ai::agent::AgentRunError),
}
