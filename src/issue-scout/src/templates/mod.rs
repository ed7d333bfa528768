//! Comment rendering using Handlebars.
//!
//! The posted comment is a Handlebars template filled from the LLM's
//! analysis. Templates can be overridden via `[comment] template` in
//! `config.toml`; the variables available are those of [`CommentData`].

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, CommentData, CommentRenderer};

/// Comment posted when no template is configured.
pub const DEFAULT_COMMENT_TEMPLATE: &str = "\
Hi! I'd like to help with this issue.

**Analysis**

{{analysis}}

**Proposed solution**

{{solution}}

**Implementation steps**

{{#each steps}}
1. {{this}}
{{/each}}
{{#if request_assignment}}

If this approach sounds good, could you assign this issue to me? I'd be happy to open a pull request.
{{else}}

Happy to open a pull request if this approach sounds good.
{{/if}}
";
