//! Discovery-time screening of issues.

use super::IssueCandidate;
use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Rules that keep unsuitable issues from ever becoming candidates.
#[derive(Debug, Clone)]
pub struct ScreeningRules {
    /// Issues carrying any of these labels are skipped.
    pub exclude_labels: Vec<String>,

    /// Issues opened longer ago than this are skipped.
    pub max_issue_age_days: u32,

    /// Issues with a shorter (trimmed) body are skipped.
    pub min_body_length: usize,

    /// Issues with more comments than this are skipped.
    pub max_comments: u32,

    /// Issues whose title or body mention any of these are skipped.
    pub avoid_keywords: Vec<String>,
}

/// Why an issue was screened out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenReason {
    /// Carries an excluded label.
    ExcludedLabel(String),
    /// Older than the age limit.
    TooOld { age_days: i64 },
    /// Description too short or missing.
    BodyTooShort,
    /// Too much discussion already.
    TooManyComments(u32),
    /// Looks like a large change.
    AvoidKeyword(String),
}

impl fmt::Display for ScreenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExcludedLabel(label) => write!(f, "excluded label '{label}'"),
            Self::TooOld { age_days } => write!(f, "opened {age_days} days ago"),
            Self::BodyTooShort => f.write_str("description too short or missing"),
            Self::TooManyComments(count) => write!(f, "{count} comments, likely complex"),
            Self::AvoidKeyword(keyword) => write!(f, "mentions '{keyword}'"),
        }
    }
}

impl ScreeningRules {
    /// Returns the first reason `candidate` should be skipped, or `None` if it passes.
    pub fn check(&self, candidate: &IssueCandidate, now: DateTime<Utc>) -> Option<ScreenReason> {
        if let Some(label) = self
            .exclude_labels
            .iter()
            .find(|label| candidate.has_label(label))
        {
            return Some(ScreenReason::ExcludedLabel(label.clone()));
        }

        if self.is_too_old(candidate.created_at, now) {
            return Some(ScreenReason::TooOld {
                age_days: (now - candidate.created_at).num_days(),
            });
        }

        if candidate.body.trim().chars().count() < self.min_body_length {
            return Some(ScreenReason::BodyTooShort);
        }

        if candidate.comments > self.max_comments {
            return Some(ScreenReason::TooManyComments(candidate.comments));
        }

        let title = candidate.title.to_lowercase();
        let body = candidate.body.to_lowercase();
        self.avoid_keywords
            .iter()
            .find(|keyword| {
                let keyword = keyword.to_lowercase();
                title.contains(&keyword) || body.contains(&keyword)
            })
            .map(|keyword| ScreenReason::AvoidKeyword(keyword.clone()))
    }

    /// Returns `true` if an issue created at `created_at` is past the age limit.
    pub fn is_too_old(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - created_at > Duration::days(i64::from(self.max_issue_age_days))
    }
}
