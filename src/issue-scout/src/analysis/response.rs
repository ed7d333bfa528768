//! Parsing of the LLM's analysis reply.

use serde::Deserialize;
use tracing::warn;

const FALLBACK_ANALYSIS_CHARS: usize = 500;

/// Structured analysis returned by the LLM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalysisResponse {
    /// What the issue is asking for.
    pub analysis: String,
    /// Recommended approach.
    pub solution: String,
    /// Concrete implementation steps.
    pub steps: Vec<String>,
}

impl AnalysisResponse {
    /// Parses a model reply.
    ///
    /// Accepts a bare JSON object or one wrapped in a markdown code fence.
    /// Anything else becomes a generic response whose analysis is the start
    /// of the raw reply.
    pub fn parse(reply: &str) -> Self {
        match serde_json::from_str::<Self>(strip_code_fence(reply)) {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "LLM reply is not valid JSON, using fallback analysis");
                Self::fallback(reply)
            }
        }
    }

    fn fallback(reply: &str) -> Self {
        Self {
            analysis: super::prompt::truncate_chars(reply.trim(), FALLBACK_ANALYSIS_CHARS)
                .to_string(),
            solution: "See full analysis above".to_string(),
            steps: vec![
                "Review the issue details".to_string(),
                "Implement the suggested approach".to_string(),
                "Test thoroughly".to_string(),
            ],
        }
    }
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening fence line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
