//! Template error types.

use thiserror::Error;

/// Comment template rendering error.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Handlebars rendering error, including references to unknown variables.
    #[error("Template rendering error: {0}")]
    RenderError(#[from] handlebars::RenderError),
}
