//! LLM provider resolution and the serdes-ai completion harness.

mod config;
mod error;

pub use config::LlmConfig;
pub use error::LlmError;

use serdes_ai::agent::{Agent, AgentBuilder};
use serdes_ai_models::Model;
use std::sync::Arc;
use tracing::warn;

const MODEL_ENV: &str = "ISSUE_SCOUT_LLM_MODEL";
const TEMPERATURE_ENV: &str = "ISSUE_SCOUT_LLM_TEMPERATURE";
const LLM_TIMEOUT_SECS: u64 = 120;
const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Runs a single-turn completion and returns the model's reply.
///
/// The model comes from `config` when present, otherwise from
/// `ISSUE_SCOUT_LLM_MODEL` (`provider:model`).
pub(crate) async fn complete(
    config: Option<&LlmConfig>,
    system_prompt: &str,
    prompt: String,
) -> Result<String, LlmError> {
    let model = resolve_model(config)?;
    let temperature = resolve_temperature(config).unwrap_or(DEFAULT_TEMPERATURE);
    let agent = build_agent(model, system_prompt, temperature);

    let result = tokio::time::timeout(
        tokio::time::Duration::from_secs(LLM_TIMEOUT_SECS),
        agent.run(prompt, ()),
    )
    .await
    .map_err(|_| LlmError::Timeout(LLM_TIMEOUT_SECS))??;

    Ok(result.output)
}

/// Resolves the LLM model from config or environment.
fn resolve_model(config: Option<&LlmConfig>) -> Result<Arc<dyn Model>, LlmError> {
    if let Some(config) = config {
        return config.build_model();
    }
    let model_spec = std::env::var(MODEL_ENV).map_err(|_| LlmError::MissingModel)?;
    serdes_ai_models::infer_model(&model_spec).map_err(LlmError::Model)
}

/// Validates that a temperature value is finite and within 0.0-2.0.
fn validate_temperature(value: f64, source: &str) -> Option<f64> {
    if !value.is_finite() || !(0.0..=2.0).contains(&value) {
        warn!("Invalid temperature {value} from {source}: must be finite and in range 0.0-2.0");
        return None;
    }
    Some(value)
}

/// Resolves the temperature; the environment variable wins over the config file.
fn resolve_temperature(config: Option<&LlmConfig>) -> Option<f64> {
    if let Ok(val) = std::env::var(TEMPERATURE_ENV) {
        if let Ok(temp) = val.parse::<f64>() {
            return validate_temperature(temp, "environment variable");
        }
    }
    config
        .and_then(LlmConfig::temperature)
        .and_then(|t| validate_temperature(t, "config file"))
}

fn build_agent(model: Arc<dyn Model>, system_prompt: &str, temperature: f64) -> Agent<(), String> {
    AgentBuilder::from_arc(model)
        .system_prompt(system_prompt.to_string())
        .temperature(temperature)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Wrapper {
        llm: LlmConfig,
    }

    fn parse(contents: &str) -> LlmConfig {
        toml::from_str::<Wrapper>(contents).unwrap().llm
    }

    fn openai(temperature: Option<f64>) -> LlmConfig {
        LlmConfig::OpenAi {
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: None,
            temperature,
        }
    }

    #[test]
    fn parses_openai() {
        let config = parse(
            r#"
[llm]
provider = "openai"
model = "gpt-4o-mini"
base-url = "https://api.openai.com/v1"
timeout-secs = 30
"#,
        );
        match config {
            LlmConfig::OpenAi {
                model,
                base_url,
                timeout_secs,
                ..
            } => {
                assert_eq!(model, "gpt-4o-mini");
                assert_eq!(base_url.as_deref(), Some("https://api.openai.com/v1"));
                assert_eq!(timeout_secs, Some(30));
            }
            other => panic!("expected openai, got {other:?}"),
        }
    }

    #[test]
    fn parses_openrouter() {
        let config = parse(
            r#"
[llm]
provider = "openrouter"
model = "anthropic/claude-3.5-haiku"
http-referer = "https://example.com"
app-title = "issue-scout"
"#,
        );
        match config {
            LlmConfig::OpenRouter {
                model,
                http_referer,
                app_title,
                ..
            } => {
                assert_eq!(model, "anthropic/claude-3.5-haiku");
                assert_eq!(http_referer.as_deref(), Some("https://example.com"));
                assert_eq!(app_title.as_deref(), Some("issue-scout"));
            }
            other => panic!("expected openrouter, got {other:?}"),
        }
    }

    #[test]
    fn parses_anthropic_and_gemini() {
        let config = parse("[llm]\nprovider = \"anthropic\"\nmodel = \"claude-3-5-haiku-latest\"\n");
        assert!(matches!(config, LlmConfig::Anthropic { .. }));

        let config = parse("[llm]\nprovider = \"gemini\"\nmodel = \"gemini-2.0-flash\"\n");
        assert!(matches!(config, LlmConfig::Gemini { .. }));
    }

    #[test]
    fn rejects_unknown_provider() {
        let result = toml::from_str::<Wrapper>("[llm]\nprovider = \"mystery\"\nmodel = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn parses_temperature() {
        let config = parse("[llm]\nprovider = \"openai\"\nmodel = \"gpt-4o\"\ntemperature = 0.5\n");
        assert_eq!(config.temperature(), Some(0.5));
    }

    #[test]
    fn resolve_temperature_returns_none_without_config_or_env() {
        temp_env::with_var_unset(TEMPERATURE_ENV, || {
            assert_eq!(resolve_temperature(None), None);
        });
    }

    #[test]
    fn resolve_temperature_uses_config_value() {
        temp_env::with_var_unset(TEMPERATURE_ENV, || {
            assert_eq!(resolve_temperature(Some(&openai(Some(0.3)))), Some(0.3));
        });
    }

    #[test]
    fn resolve_temperature_prefers_env_over_config() {
        temp_env::with_var(TEMPERATURE_ENV, Some("0.8"), || {
            assert_eq!(resolve_temperature(Some(&openai(Some(0.3)))), Some(0.8));
        });
    }

    #[test]
    fn resolve_temperature_rejects_out_of_range() {
        temp_env::with_var(TEMPERATURE_ENV, Some("3.5"), || {
            assert_eq!(resolve_temperature(None), None);
        });
        temp_env::with_var_unset(TEMPERATURE_ENV, || {
            assert_eq!(resolve_temperature(Some(&openai(Some(-1.0)))), None);
        });
    }

    #[test]
    fn resolve_model_requires_config_or_env() {
        temp_env::with_var_unset(MODEL_ENV, || {
            assert!(matches!(resolve_model(None), Err(LlmError::MissingModel)));
        });
    }
}
