//! LLM-backed analyzer that posts the analysis as an issue comment.

use super::prompt::{build_prompt, IssueComment, SYSTEM_PROMPT};
use super::{AnalysisError, AnalysisResponse, IssueAnalyzer};
use crate::config::AgentConfig;
use crate::discovery::IssueCandidate;
use crate::ledger::Outcome;
use crate::llm::{self, LlmConfig};
use crate::rate_limit::ensure_core_rate_limit;
use crate::templates::{CommentData, CommentRenderer};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use octocrab::Octocrab;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Comments fetched per issue. Screening caps comment counts well below this.
const COMMENTS_PER_PAGE: u8 = 100;

/// Analyzes issues with an LLM and posts the result as a comment.
pub struct LlmCommenter {
    octocrab: Octocrab,
    login: String,
    llm: Option<LlmConfig>,
    renderer: CommentRenderer,
    request_assignment: bool,
    min_comment_interval: Duration,
}

impl LlmCommenter {
    /// Creates a commenter acting as `login`, the authenticated account.
    pub fn new(octocrab: Octocrab, login: impl Into<String>, config: &AgentConfig) -> Self {
        Self {
            octocrab,
            login: login.into(),
            llm: config.llm.clone(),
            renderer: CommentRenderer::new(config.comment.template.as_deref()),
            request_assignment: config.comment.request_assignment,
            min_comment_interval: Duration::hours(i64::from(
                config.scan.min_comment_interval_hours,
            )),
        }
    }

    async fn try_analyze_and_post(
        &self,
        candidate: &IssueCandidate,
        dry_run: bool,
    ) -> Result<Outcome, AnalysisError> {
        let comments = self.fetch_comments(candidate).await?;

        let since = Utc::now() - self.min_comment_interval;
        if has_recent_comment_by(&comments, &self.login, since) {
            info!("Already commented recently, skipping");
            return Ok(if dry_run {
                Outcome::SkippedDryRun
            } else {
                Outcome::Commented
            });
        }

        let prompt = build_prompt(candidate, &comments);
        let reply = llm::complete(self.llm.as_ref(), SYSTEM_PROMPT, prompt).await?;
        let response = AnalysisResponse::parse(&reply);
        let body = self.renderer.render(&CommentData::new(
            &response,
            candidate,
            self.request_assignment,
        ))?;

        if dry_run {
            info!("[dry run] Would post comment");
            info!("--- Comment preview ---\n{body}\n--- End preview ---");
            return Ok(Outcome::SkippedDryRun);
        }

        ensure_core_rate_limit(&self.octocrab).await?;
        self.octocrab
            .issues(&candidate.repository.owner, &candidate.repository.name)
            .create_comment(candidate.number, &body)
            .await?;
        info!(url = %candidate.url, "Posted comment");

        Ok(if self.request_assignment {
            Outcome::AssignmentRequested
        } else {
            Outcome::Commented
        })
    }

    async fn fetch_comments(
        &self,
        candidate: &IssueCandidate,
    ) -> Result<Vec<IssueComment>, AnalysisError> {
        if candidate.comments == 0 {
            return Ok(Vec::new());
        }

        ensure_core_rate_limit(&self.octocrab).await?;
        let page = self
            .octocrab
            .issues(&candidate.repository.owner, &candidate.repository.name)
            .list_comments(candidate.number)
            .per_page(COMMENTS_PER_PAGE)
            .send()
            .await?;
        debug!(count = page.items.len(), "Fetched comments");

        Ok(page
            .items
            .into_iter()
            .map(|c| IssueComment {
                author: c.user.login,
                body: c.body.unwrap_or_default(),
                created_at: c.created_at,
            })
            .collect())
    }
}

#[async_trait]
impl IssueAnalyzer for LlmCommenter {
    async fn analyze_and_post(&self, candidate: &IssueCandidate, dry_run: bool) -> Outcome {
        let span = info_span!(
            "analyze",
            repo = %candidate.repository,
            issue = candidate.number
        );

        async { outcome_for(self.try_analyze_and_post(candidate, dry_run).await, dry_run) }
            .instrument(span)
            .await
    }
}

/// Maps an analysis result onto the outcome recorded for the issue.
///
/// Dry runs never record a failure, so an issue that errored while
/// previewing stays eligible for the next live run.
fn outcome_for(result: Result<Outcome, AnalysisError>, dry_run: bool) -> Outcome {
    match result {
        Ok(outcome) => outcome,
        Err(e) if dry_run => {
            warn!(error = %e, "Analysis failed during dry run");
            Outcome::SkippedDryRun
        }
        Err(e) => {
            error!(error = %e, "Failed to analyze or comment");
            Outcome::Failed
        }
    }
}

/// Returns `true` if `login` commented after `since`.
fn has_recent_comment_by(comments: &[IssueComment], login: &str, since: DateTime<Utc>) -> bool {
    comments
        .iter()
        .any(|c| c.author.eq_ignore_ascii_case(login) && c.created_at > since)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use chrono::TimeZone;

    fn llm_failure() -> AnalysisError {
        AnalysisError::Llm(LlmError::Timeout(120))
    }

    #[test]
    fn dry_run_error_is_skipped_not_failed() {
        assert_eq!(outcome_for(Err(llm_failure()), true), Outcome::SkippedDryRun);
    }

    #[test]
    fn live_error_is_failed() {
        assert_eq!(outcome_for(Err(llm_failure()), false), Outcome::Failed);
        assert_eq!(
            outcome_for(Err(AnalysisError::Llm(LlmError::MissingModel)), false),
            Outcome::Failed
        );
    }

    #[test]
    fn success_passes_through() {
        assert_eq!(outcome_for(Ok(Outcome::Commented), false), Outcome::Commented);
        assert_eq!(
            outcome_for(Ok(Outcome::AssignmentRequested), false),
            Outcome::AssignmentRequested
        );
        assert_eq!(outcome_for(Ok(Outcome::SkippedDryRun), true), Outcome::SkippedDryRun);
    }

    fn comment(author: &str, day: u32) -> IssueComment {
        IssueComment {
            author: author.to_string(),
            body: "hello".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn detects_recent_comment_by_login() {
        let since = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let comments = vec![comment("someone", 12), comment("Scout-Bot", 11)];

        assert!(has_recent_comment_by(&comments, "scout-bot", since));
    }

    #[test]
    fn ignores_old_or_foreign_comments() {
        let since = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let comments = vec![comment("scout-bot", 2), comment("someone", 12)];

        assert!(!has_recent_comment_by(&comments, "scout-bot", since));
        assert!(!has_recent_comment_by(&[], "scout-bot", since));
    }
}
