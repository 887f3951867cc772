pub mod embeddings;
pub mod prompt;
pub mod providers;
pub mod synthesizer;

pub use embeddings::{Embedder, EmbeddingError, EmbeddingGenerator};
pub use providers::{create_provider, LlmProvider, LlmProviderError};
pub use synthesizer::{LlmSynthesizer, SynthesisError, Synthesizer};
