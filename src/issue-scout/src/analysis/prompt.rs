//! Analysis prompt construction.

use crate::discovery::IssueCandidate;
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// System prompt sent with every analysis request.
pub(crate) const SYSTEM_PROMPT: &str = "You are an expert software engineer and open-source \
contributor. You analyze GitHub issues and provide clear, actionable solutions.";

const MAX_BODY_CHARS: usize = 2000;
const MAX_COMMENT_CHARS: usize = 500;
const MAX_PROMPT_COMMENTS: usize = 3;

/// A comment on an issue, as far as the prompt and the recent-comment check care.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueComment {
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Builds the user prompt asking for a JSON analysis of `candidate`.
///
/// Only the last few `comments` are included, each truncated.
pub(crate) fn build_prompt(candidate: &IssueCandidate, comments: &[IssueComment]) -> String {
    let mut comments_text = String::new();
    if !comments.is_empty() {
        comments_text.push_str("\n\n## Recent Comments:\n");
        let start = comments.len().saturating_sub(MAX_PROMPT_COMMENTS);
        for (i, comment) in comments[start..].iter().enumerate() {
            let _ = write!(
                comments_text,
                "\n**Comment {} by {}:**\n{}\n",
                i + 1,
                comment.author,
                truncate_chars(&comment.body, MAX_COMMENT_CHARS)
            );
        }
    }

    format!(
        "You are an experienced open-source contributor analyzing a GitHub issue to provide a helpful solution.

## Issue Details:
**Title:** {title}

**Labels:** {labels}

**Description:**
{body}
{comments_text}

## Your Task:
Analyze this issue and provide a structured response with:

1. **Problem Analysis**: Clearly explain what the issue is asking for (2-3 sentences)
2. **Proposed Solution**: Describe your recommended approach to solve this (3-4 sentences)
3. **Implementation Steps**: List 3-5 concrete steps to implement the solution

## Guidelines:
- Be specific and actionable
- Reference relevant parts of the issue description
- Keep it concise but helpful
- If the issue is unclear, mention what clarification would be helpful

Respond with a single JSON object with keys \"analysis\", \"solution\" and \"steps\" (array of strings).
",
        title = candidate.title,
        labels = candidate.labels.join(", "),
        body = truncate_chars(&candidate.body, MAX_BODY_CHARS),
    )
}

/// Returns at most the first `max` characters of `text`.
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
