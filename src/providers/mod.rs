// src/providers/mod.rs

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{LlmConfig, ProviderKind};
use crate::errors::{EvalError, ProviderError};

pub mod ollama;
pub mod openai;

use ollama::OllamaProvider;
use openai::OpenAIProvider;

/// A text-in, text-out language model backend.
///
/// Implementations hold no per-call state, so a single instance is shared by
/// every request.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short label used in logs, e.g. `groq:llama-3.3-70b-versatile`.
    fn name(&self) -> String;

    /// Sends `prompt` as a single user turn and returns the reply text.
    ///
    /// An HTTP 429 must come back as `ProviderError::RateLimited` and an empty
    /// reply as `ProviderError::EmptyResponse`.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Builds the process-wide provider described by `config`.
pub fn build_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, EvalError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| EvalError::Config(format!("Failed to build HTTP client: {}", e)))?;

    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderKind::Groq | ProviderKind::OpenAI => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                EvalError::Config(format!("{:?} requires an API key", config.provider))
            })?;
            Arc::new(OpenAIProvider::new(
                client,
                config.provider,
                config.api_base(),
                api_key,
                config.model(),
                config.temperature,
            ))
        }
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(
            client,
            config.api_base(),
            config.model(),
            config.temperature,
        )),
    };

    log::info!("Using model provider {}", provider.name());
    Ok(provider)
}
