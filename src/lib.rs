//! Question routing and multi-hop reasoning over an urban knowledge
//! graph of neighborhoods, places, roads, intersections and reviews.
//!
//! The graph itself is produced by an external ETL pipeline and handed in
//! as an immutable [`graph::GraphSnapshot`]; this crate decides whether a
//! question is a direct structured lookup or needs exploratory traversal,
//! runs the bounded best-first search, and fuses structured attributes
//! with review text into ranked context blocks.

pub mod core;
pub mod graph;
pub mod llm;
pub mod reasoning;
pub mod utils;

pub use utils::{safe_truncate, safe_truncate_ellipsis};

pub use crate::core::config::BairroConfig;
pub use crate::core::error::{BairroError, Result};
pub use graph::{GraphSnapshot, Node, NodeType};
pub use llm::embeddings::{Embedder, EmbeddingGenerator};
pub use reasoning::{ReasoningPipeline, RouteOutcome};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

pub const DEFAULT_LLM_MODEL: &str = "llama3.1:8b";

pub const DEFAULT_CACHE_SIZE: usize = 1000;

pub const DEFAULT_CACHE_TTL: u64 = 300;
