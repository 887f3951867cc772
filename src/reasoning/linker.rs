use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::core::error::{BairroError, Result};
use crate::graph::{GraphSnapshot, NodeType};
use super::models::{Question, SeedCandidate};
use super::patterns;

const EXACT_MATCH_CONFIDENCE: f64 = 0.95;

/// Per-type prior on seed quality. Containers make better traversal
/// starts than leaves of the spatial hierarchy; reviews are never seeds
/// (they carry no name).
fn type_prior(node_type: NodeType) -> f64 {
    match node_type {
        NodeType::Neighborhood => 1.0,
        NodeType::Place => 0.95,
        NodeType::Road => 0.85,
        NodeType::Intersection => 0.75,
        NodeType::Review => 0.0,
    }
}

/// Maps question mentions to candidate seed nodes by matching against
/// node `name` attributes. Read-only; no side effects.
pub struct EntityLinker {
    snapshot: Arc<GraphSnapshot>,
    min_similarity: f64,
    max_seeds: usize,
}

impl EntityLinker {
    pub fn new(snapshot: Arc<GraphSnapshot>) -> Self {
        Self {
            snapshot,
            min_similarity: 0.5,
            max_seeds: 5,
        }
    }

    pub fn with_min_similarity(mut self, min_similarity: f64) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    pub fn with_max_seeds(mut self, max_seeds: usize) -> Self {
        self.max_seeds = max_seeds;
        self
    }

    /// Ordered candidate seeds for a question. Fails with `NoCandidates`
    /// when nothing clears `min_similarity`; the router falls back to the
    /// direct path in that case.
    pub fn link(&self, question: &Question) -> Result<Vec<SeedCandidate>> {
        let text_lower = question.text.to_lowercase();
        let mut best: HashMap<String, SeedCandidate> = HashMap::new();

        for (node, name) in self.snapshot.named_nodes() {
            let prior = type_prior(node.node_type);
            if prior == 0.0 {
                continue;
            }

            let name_lower = name.to_lowercase();
            let similarity = if text_lower.contains(&name_lower) {
                EXACT_MATCH_CONFIDENCE
            } else {
                token_overlap(&name_lower, &question.tokens)
            };

            if similarity < self.min_similarity {
                continue;
            }

            let confidence = similarity * prior;
            debug!(
                "Linker hit: {} '{}' sim={:.2} conf={:.2}",
                node.node_type, name, similarity, confidence
            );

            let candidate = SeedCandidate {
                node_id: node.id.clone(),
                confidence,
                matched_name: name.to_string(),
            };
            match best.get(&node.id) {
                Some(existing) if existing.confidence >= confidence => {}
                _ => {
                    best.insert(node.id.clone(), candidate);
                }
            }
        }

        let mut candidates: Vec<SeedCandidate> = best.into_values().collect();
        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.node_id.cmp(&b.node_id))
        });
        candidates.truncate(self.max_seeds);

        if candidates.is_empty() {
            return Err(BairroError::NoCandidates(question.text.clone()));
        }

        info!(
            "Linked {} seed(s) for: {}",
            candidates.len(),
            crate::safe_truncate(&question.text, 60)
        );
        Ok(candidates)
    }
}

/// Share of a name's content tokens that appear in the question.
fn token_overlap(name_lower: &str, question_tokens: &[String]) -> f64 {
    let name_tokens: Vec<&str> = name_lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1 && !patterns::is_stopword(t))
        .collect();
    if name_tokens.is_empty() {
        return 0.0;
    }

    let hits = name_tokens
        .iter()
        .filter(|t| question_tokens.iter().any(|q| q == *t))
        .count();
    hits as f64 / name_tokens.len() as f64
}
