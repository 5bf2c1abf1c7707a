//! Configuration types for plan generation and rendering.
//!
//! Everything about *how* a plan is produced lives in [`GenerationConfig`],
//! built via its [`GenerationConfigBuilder`]. *What* the plan is about lives
//! in [`crate::profile::ClientProfile`]. Visual styling is deliberately not
//! configurable at runtime; see [`crate::theme`].

use crate::error::PlanError;
use crate::progress::PlanProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default model used when neither the config nor the environment names one.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Default provider used when an explicit model is given without a provider.
pub const DEFAULT_PROVIDER: &str = "anthropic";

/// Configuration for one generate-and-render run.
///
/// Built via [`GenerationConfig::builder()`] or using
/// [`GenerationConfig::default()`].
///
/// # Example
/// ```rust
/// use nutriplan_pdf::GenerationConfig;
///
/// let config = GenerationConfig::builder()
///     .model("claude-sonnet-4-5-20250929")
///     .max_tokens(12_000)
///     .output_dir("plans")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GenerationConfig {
    /// LLM model identifier. If None, uses [`DEFAULT_MODEL`].
    pub model: Option<String>,

    /// LLM provider name (e.g. "anthropic", "openai", "ollama").
    /// If None along with `provider`, the provider is auto-detected.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature. None leaves the provider default. Default: None.
    pub temperature: Option<f32>,

    /// Maximum tokens the model may generate. Default: 16000.
    ///
    /// A seven-day plan with recipes and a shopping list routinely runs past
    /// 8 000 tokens; a low cap silently truncates the shopping list.
    pub max_tokens: usize,

    /// Custom system prompt. If None, the request is a single user turn.
    pub system_prompt: Option<String>,

    /// Directory receiving the `.txt` and `.pdf` artefacts. Default: ".".
    pub output_dir: PathBuf,

    /// Render the PDF after saving the text plan. Default: true.
    pub write_pdf: bool,

    /// Optional progress events for the caller (spinner, logs, UI).
    pub progress_callback: Option<Arc<dyn PlanProgressCallback>>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            temperature: None,
            max_tokens: 16_000,
            system_prompt: None,
            output_dir: PathBuf::from("."),
            write_pdf: true,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("system_prompt", &self.system_prompt.as_ref().map(|s| s.len()))
            .field("output_dir", &self.output_dir)
            .field("write_pdf", &self.write_pdf)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn PlanProgressCallback>"),
            )
            .finish()
    }
}

impl GenerationConfig {
    /// Create a new builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder {
            config: Self::default(),
        }
    }

    /// The model to request, falling back to [`DEFAULT_MODEL`].
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

/// Builder for [`GenerationConfig`].
#[derive(Debug)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = Some(t.clamp(0.0, 2.0));
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn write_pdf(mut self, v: bool) -> Self {
        self.config.write_pdf = v;
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn PlanProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GenerationConfig, PlanError> {
        let c = &self.config;
        if c.max_tokens < 1_000 {
            return Err(PlanError::InvalidConfig(format!(
                "max_tokens must be ≥ 1000 for a full plan, got {}",
                c.max_tokens
            )));
        }
        if let Some(ref m) = c.model {
            if m.trim().is_empty() {
                return Err(PlanError::InvalidConfig("model must not be empty".into()));
            }
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = GenerationConfig::default();
        assert_eq!(c.max_tokens, 16_000);
        assert!(c.write_pdf);
        assert_eq!(c.model_or_default(), DEFAULT_MODEL);
        assert_eq!(c.output_dir, PathBuf::from("."));
    }

    #[test]
    fn temperature_is_clamped() {
        let c = GenerationConfig::builder().temperature(5.0).build().unwrap();
        assert_eq!(c.temperature, Some(2.0));
    }

    #[test]
    fn tiny_token_budget_is_rejected() {
        let err = GenerationConfig::builder().max_tokens(10).build().unwrap_err();
        assert!(matches!(err, PlanError::InvalidConfig(_)));
    }

    #[test]
    fn debug_hides_provider() {
        let c = GenerationConfig::builder().model("gpt-4.1").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("gpt-4.1"));
    }
}
