//! LLM provider configuration.

use crate::llm::error::LlmError;
use serdes_ai_models::{build_model_with_config, infer_model, openrouter::OpenRouterModel, Model};
use std::sync::Arc;

/// The `[llm]` table of `config.toml`, selecting one provider.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(tag = "provider", rename_all = "kebab-case")]
pub enum LlmConfig {
    /// OpenAI, or any OpenAI-compatible endpoint via `base-url`.
    #[serde(rename = "openai", rename_all = "kebab-case")]
    OpenAi {
        /// Model name (e.g., "gpt-4o-mini").
        model: String,
        /// API key; falls back to `OPENAI_API_KEY`.
        api_key: Option<String>,
        base_url: Option<String>,
        timeout_secs: Option<u64>,
        /// Sampling temperature (0.0-2.0).
        temperature: Option<f64>,
    },

    /// OpenRouter.
    #[serde(rename = "openrouter", rename_all = "kebab-case")]
    OpenRouter {
        /// Model name (e.g., "anthropic/claude-3.5-haiku").
        model: String,
        /// API key; falls back to `OPENROUTER_API_KEY`.
        api_key: Option<String>,
        /// Sent as `HTTP-Referer` for OpenRouter attribution.
        http_referer: Option<String>,
        /// Sent as `X-Title` for OpenRouter attribution.
        app_title: Option<String>,
        /// Sampling temperature (0.0-2.0).
        temperature: Option<f64>,
    },

    /// Anthropic.
    #[serde(rename_all = "kebab-case")]
    Anthropic {
        model: String,
        /// API key; falls back to `ANTHROPIC_API_KEY`.
        api_key: Option<String>,
        base_url: Option<String>,
        timeout_secs: Option<u64>,
        temperature: Option<f64>,
    },

    /// Google Gemini.
    #[serde(rename_all = "kebab-case")]
    Gemini {
        model: String,
        /// API key; falls back to `GOOGLE_API_KEY`.
        api_key: Option<String>,
        base_url: Option<String>,
        timeout_secs: Option<u64>,
        temperature: Option<f64>,
    },
}

impl LlmConfig {
    /// Returns the configured temperature, if any.
    pub fn temperature(&self) -> Option<f64> {
        match self {
            Self::OpenAi { temperature, .. }
            | Self::OpenRouter { temperature, .. }
            | Self::Anthropic { temperature, .. }
            | Self::Gemini { temperature, .. } => *temperature,
        }
    }

    /// Builds a model from the configuration.
    pub(crate) fn build_model(&self) -> Result<Arc<dyn Model>, LlmError> {
        match self {
            Self::OpenRouter {
                model,
                api_key,
                http_referer,
                app_title,
                ..
            } => {
                if api_key.is_none() && http_referer.is_none() && app_title.is_none() {
                    return infer_model(&format!("openrouter:{model}")).map_err(LlmError::Model);
                }
                let mut model = match api_key {
                    Some(key) => OpenRouterModel::new(model, key),
                    None => OpenRouterModel::from_env(model).map_err(LlmError::Model)?,
                };
                if let Some(referer) = http_referer {
                    model = model.with_http_referer(referer);
                }
                if let Some(title) = app_title {
                    model = model.with_app_title(title);
                }
                Ok(Arc::new(model))
            }
            Self::OpenAi {
                model,
                api_key,
                base_url,
                timeout_secs,
                ..
            } => build_configured_model(
                "openai",
                model,
                api_key.as_deref(),
                base_url.as_deref(),
                *timeout_secs,
            ),
            Self::Anthropic {
                model,
                api_key,
                base_url,
                timeout_secs,
                ..
            } => build_configured_model(
                "anthropic",
                model,
                api_key.as_deref(),
                base_url.as_deref(),
                *timeout_secs,
            ),
            Self::Gemini {
                model,
                api_key,
                base_url,
                timeout_secs,
                ..
            } => build_configured_model(
                "gemini",
                model,
                api_key.as_deref(),
                base_url.as_deref(),
                *timeout_secs,
            ),
        }
    }
}

/// Builds a model for providers that share the generic constructor.
///
/// Without any overrides the model is inferred from `provider:model`, which
/// reads the provider's default API key variable.
fn build_configured_model(
    provider: &str,
    model: &str,
    api_key: Option<&str>,
    base_url: Option<&str>,
    timeout_secs: Option<u64>,
) -> Result<Arc<dyn Model>, LlmError> {
    let resolved_key = api_key.map(str::to_owned).or_else(|| env_api_key(provider));
    if resolved_key.is_none() && base_url.is_none() && timeout_secs.is_none() {
        return infer_model(&format!("{provider}:{model}")).map_err(LlmError::Model);
    }
    build_model_with_config(
        provider,
        model,
        resolved_key.as_deref(),
        base_url,
        timeout_secs.map(core::time::Duration::from_secs),
    )
    .map_err(LlmError::Model)
}

fn env_api_key(provider: &str) -> Option<String> {
    let var = match provider {
        "openai" => "OPENAI_API_KEY",
        "anthropic" => "ANTHROPIC_API_KEY",
        "gemini" => "GOOGLE_API_KEY",
        _ => return None,
    };
    std::env::var(var).ok()
}
