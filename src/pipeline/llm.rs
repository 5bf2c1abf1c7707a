//! The content producer: one chat call that returns the plan text.
//!
//! The request is a single user turn carrying the prompt from
//! [`crate::prompts`]. A configured system prompt, if any, goes first.
//! There is exactly one attempt: a failed call surfaces as
//! [`PlanError::LlmApiError`] and the caller decides what to do.

use crate::config::GenerationConfig;
use crate::error::PlanError;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Raw model output plus usage figures.
#[derive(Debug, Clone)]
pub struct PlanResponse {
    /// Response text as returned; cleanup and the empty check happen in
    /// [`crate::generate`].
    pub content: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub duration_ms: u64,
}

/// Send the prompt once and return the model's answer.
pub async fn generate_plan_text(
    provider: &Arc<dyn LLMProvider>,
    prompt: &str,
    config: &GenerationConfig,
) -> Result<PlanResponse, PlanError> {
    let start = Instant::now();
    let messages = build_messages(prompt, config);
    let options = build_options(config);

    match provider.chat(&messages, Some(&options)).await {
        Ok(response) => {
            let duration = start.elapsed();
            debug!(
                "plan: {} input tokens, {} output tokens, {:?}",
                response.prompt_tokens, response.completion_tokens, duration
            );
            Ok(PlanResponse {
                content: response.content,
                input_tokens: response.prompt_tokens as u64,
                output_tokens: response.completion_tokens as u64,
                duration_ms: duration.as_millis() as u64,
            })
        }
        Err(e) => {
            warn!("plan request failed after {:?}: {}", start.elapsed(), e);
            Err(PlanError::LlmApiError {
                message: e.to_string(),
            })
        }
    }
}

fn build_messages(prompt: &str, config: &GenerationConfig) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = config.system_prompt.as_deref() {
        if !system.trim().is_empty() {
            messages.push(ChatMessage::system(system));
        }
    }
    messages.push(ChatMessage::user(prompt));
    messages
}

/// Build `CompletionOptions` from the generation config.
fn build_options(config: &GenerationConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: config.temperature,
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_options_defaults() {
        let config = GenerationConfig::default();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, None);
        assert_eq!(opts.max_tokens, Some(16_000));
    }

    #[test]
    fn build_options_carries_temperature() {
        let config = GenerationConfig::builder().temperature(0.4).build().unwrap();
        assert_eq!(build_options(&config).temperature, Some(0.4));
    }

    #[test]
    fn single_user_turn_by_default() {
        let messages = build_messages("plan please", &GenerationConfig::default());
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn system_prompt_goes_first() {
        let config = GenerationConfig::builder()
            .system_prompt("Be brief.")
            .build()
            .unwrap();
        assert_eq!(build_messages("plan please", &config).len(), 2);

        let blank = GenerationConfig::builder().system_prompt("  ").build().unwrap();
        assert_eq!(build_messages("plan please", &blank).len(), 1);
    }
}
