use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::reasoning::models::ContextBlock;
use super::prompt::{build_synthesis_prompt, SYNTHESIS_SYSTEM_PROMPT};
use super::providers::base::{LlmProvider, LlmProviderError};

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("Generation failed: {0}")]
    Generation(#[from] LlmProviderError),
}

/// Turns assembled evidence into prose. Injected into the pipeline so the
/// navigator/aggregator core stays free of network dependencies.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(
        &self,
        question: &str,
        blocks: &[ContextBlock],
    ) -> Result<String, SynthesisError>;
}

/// Default synthesizer: one chat-completion call over the configured
/// provider.
pub struct LlmSynthesizer {
    provider: Arc<dyn LlmProvider>,
}

impl LlmSynthesizer {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Synthesizer for LlmSynthesizer {
    async fn synthesize(
        &self,
        question: &str,
        blocks: &[ContextBlock],
    ) -> Result<String, SynthesisError> {
        let prompt = build_synthesis_prompt(question, blocks);
        debug!(
            "Synthesizing answer ({} blocks, provider={})",
            blocks.len(),
            self.provider.provider_name()
        );
        let answer = self
            .provider
            .generate(SYNTHESIS_SYSTEM_PROMPT, &prompt)
            .await?;
        Ok(answer.trim().to_string())
    }
}
