//! Configuration loading and the per-run context.
//!
//! `config.toml` holds the long-lived agent settings; [`RunContext`] is the
//! validated, immutable slice of them that one invocation runs with.

mod error;
mod run_context;
mod settings;

pub use error::ConfigError;
pub use run_context::{RunContext, DEFAULT_MAX_ISSUES_PER_RUN, DEFAULT_TARGET_LABELS};
pub use settings::{AgentConfig, CommentSettings, LedgerSettings, ScanSettings};
