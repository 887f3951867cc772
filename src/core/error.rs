use thiserror::Error;

use crate::llm::embeddings::EmbeddingError;
use crate::llm::providers::base::LlmProviderError;

/// Crate-level error taxonomy.
///
/// Note what is deliberately *not* here: an empty navigation result and a
/// search stopped by the expansion budget are normal termination states
/// carried in [`crate::reasoning::Navigation`], not errors.
#[derive(Error, Debug)]
pub enum BairroError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("No seed candidates for question: {0}")]
    NoCandidates(String),

    #[error("Seed node not in snapshot: {0}")]
    InvalidSeed(String),

    #[error("Upstream collaborator unavailable: {0}")]
    Upstream(String),

    #[error("Embedding generation error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("LLM provider error: {0}")]
    LlmProvider(#[from] LlmProviderError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BairroError {
    /// Whether a single retry against the upstream collaborator is worth it.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Upstream(_) | Self::Embedding(_) | Self::LlmProvider(_)
        )
    }
}

/// Snapshot construction failures. Raised once, at load time; traversal
/// never sees a malformed graph.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("Edge references unknown node: {0}")]
    DanglingEdge(String),

    #[error("Node {0} missing required attribute '{1}'")]
    MissingAttribute(String, &'static str),
}

pub type Result<T> = std::result::Result<T, BairroError>;
