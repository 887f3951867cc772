use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Provider error: {0}")]
    Provider(String),
}

/// Chat-completion seam. The reasoning core never talks to a network
/// directly; it gets one of these injected and tests swap in a stub.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, LlmProviderError>;

    fn provider_name(&self) -> &str;

    fn model_name(&self) -> &str;
}

#[async_trait]
impl LlmProvider for Arc<dyn LlmProvider> {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, LlmProviderError> {
        (**self).generate(system_prompt, user_prompt).await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
