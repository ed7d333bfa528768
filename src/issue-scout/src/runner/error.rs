//! Runner error types.

/// Errors that abort a run.
///
/// Discovery and analysis failures are not here: they are absorbed per
/// repository and per issue and show up in the [`RunSummary`](crate::RunSummary).
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration, run context or repository list errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Ledger read or write errors.
    #[error(transparent)]
    Ledger(#[from] crate::ledger::LedgerError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),
}
