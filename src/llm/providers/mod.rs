pub mod base;
pub mod ollama;
pub mod openai;

use std::sync::Arc;

use crate::core::config::BairroConfig;
use crate::core::error::{BairroError, Result};

pub use base::{LlmProvider, LlmProviderError};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Build the configured chat provider.
pub fn create_provider(config: &BairroConfig) -> Result<Arc<dyn LlmProvider>> {
    match config.llm_provider.as_str() {
        "ollama" => Ok(Arc::new(OllamaProvider::new(
            &config.llm_url,
            &config.llm_model,
            config.llm_temperature,
        ))),
        "openai" | "groq" => {
            let api_key = config
                .llm_api_key
                .as_deref()
                .ok_or_else(|| BairroError::Config("LLM API key required".to_string()))?;
            Ok(Arc::new(OpenAiProvider::new(
                &config.llm_url,
                &config.llm_model,
                api_key,
                config.llm_temperature,
            )))
        }
        other => Err(BairroError::Config(format!(
            "Unsupported LLM provider: {}",
            other
        ))),
    }
}
