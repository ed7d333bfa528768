//! Template renderer.

use super::{TemplateError, DEFAULT_COMMENT_TEMPLATE};
use crate::analysis::AnalysisResponse;
use crate::discovery::IssueCandidate;
use handlebars::{no_escape, Handlebars};
use serde::Serialize;

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (comments are markdown)
/// - Strict mode (a template naming an unknown variable fails to render)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs
}

/// Variables available to comment templates.
#[derive(Debug, Clone, Serialize)]
pub struct CommentData<'a> {
    pub analysis: &'a str,
    pub solution: &'a str,
    pub steps: &'a [String],
    pub issue_title: &'a str,
    pub issue_url: &'a str,
    /// Whether the comment should ask maintainers for assignment.
    pub request_assignment: bool,
}

impl<'a> CommentData<'a> {
    /// Collects template variables for `candidate` from an analysis.
    pub fn new(
        response: &'a AnalysisResponse,
        candidate: &'a IssueCandidate,
        request_assignment: bool,
    ) -> Self {
        Self {
            analysis: &response.analysis,
            solution: &response.solution,
            steps: &response.steps,
            issue_title: &candidate.title,
            issue_url: &candidate.url,
            request_assignment,
        }
    }
}

/// Renders issue comments from a configured or built-in template.
pub struct CommentRenderer {
    handlebars: Handlebars<'static>,
    template: String,
}

impl Default for CommentRenderer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl CommentRenderer {
    /// Creates a renderer using `template`, or the built-in one when `None`.
    #[must_use]
    pub fn new(template: Option<&str>) -> Self {
        Self {
            handlebars: create_handlebars_registry(),
            template: template.unwrap_or(DEFAULT_COMMENT_TEMPLATE).to_string(),
        }
    }

    /// Renders the comment body.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if the template is malformed or references
    /// a variable [`CommentData`] does not provide.
    pub fn render(&self, data: &CommentData<'_>) -> Result<String, TemplateError> {
        Ok(self.handlebars.render_template(&self.template, data)?)
    }
}
