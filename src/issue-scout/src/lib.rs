#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod ledger;
pub mod llm;
pub mod rate_limit;
pub mod repositories;
pub mod runner;
pub mod selection;
pub mod summary;
pub mod templates;

pub use analysis::{AnalysisError, AnalysisResponse, IssueAnalyzer, LlmCommenter};
pub use config::{AgentConfig, ConfigError, RunContext};
pub use discovery::{
    expand_entries, DiscoveryError, GitHubDiscovery, IssueCandidate, IssueDiscovery,
    OwnerRepositories, ScreeningRules, TOP_REPOSITORIES_PER_OWNER,
};
pub use ledger::{ActivityLog, Ledger, LedgerEntry, LedgerError, LedgerKey, Outcome};
pub use llm::{LlmConfig, LlmError};
pub use rate_limit::{
    check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo,
};
pub use repositories::{
    load_repository_list, parse_repository_list, RepositoryEntry, RepositoryId,
};
pub use runner::{run_pipeline, Runner, RunnerConfig, RunnerError};
pub use selection::{select, Selection, SelectionPipeline, SelectionStats};
pub use summary::{ProcessedIssue, RunSummary};
pub use templates::{CommentRenderer, TemplateError, DEFAULT_COMMENT_TEMPLATE};
