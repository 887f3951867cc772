use crate::core::config::ScorerConfig;
use crate::graph::{EdgeType, Node};
use super::models::QuestionIntent;

/// Fixed per-edge-type priors, biased by question intent: opinion
/// questions pull toward review edges, proximity questions toward the
/// spatial ones.
const OPINION_EDGE_WEIGHTS: &[(EdgeType, f64)] = &[
    (EdgeType::HasReview, 1.0),
    (EdgeType::Contains, 0.7),
    (EdgeType::Near, 0.4),
    (EdgeType::Road, 0.3),
];

const PROXIMITY_EDGE_WEIGHTS: &[(EdgeType, f64)] = &[
    (EdgeType::Near, 1.0),
    (EdgeType::Road, 0.9),
    (EdgeType::Contains, 0.6),
    (EdgeType::HasReview, 0.35),
];

const FACTUAL_EDGE_WEIGHTS: &[(EdgeType, f64)] = &[
    (EdgeType::Contains, 0.8),
    (EdgeType::HasReview, 0.5),
    (EdgeType::Near, 0.5),
    (EdgeType::Road, 0.4),
];

const GENERAL_EDGE_WEIGHTS: &[(EdgeType, f64)] = &[
    (EdgeType::Contains, 0.7),
    (EdgeType::HasReview, 0.6),
    (EdgeType::Near, 0.5),
    (EdgeType::Road, 0.5),
];

pub fn edge_prior(edge_type: EdgeType, intent: QuestionIntent) -> f64 {
    let table = match intent {
        QuestionIntent::Opinion => OPINION_EDGE_WEIGHTS,
        QuestionIntent::Proximity => PROXIMITY_EDGE_WEIGHTS,
        QuestionIntent::Factual => FACTUAL_EDGE_WEIGHTS,
        QuestionIntent::General => GENERAL_EDGE_WEIGHTS,
    };
    table
        .iter()
        .find(|(et, _)| *et == edge_type)
        .map(|(_, w)| *w)
        .unwrap_or(0.5)
}

/// Cosine similarity rescaled to [0, 1]. Mismatched or empty vectors
/// score 0 rather than erroring; embeddings come from outside and a bad
/// one should not sink the whole search.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|y| y * y).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    let similarity = f64::from(dot / (mag_a * mag_b));
    ((similarity + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Pure, deterministic candidate scoring: semantic similarity fused with
/// the edge-type prior, decayed by hop distance.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    config: ScorerConfig,
}

impl RelevanceScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    /// Score one candidate extension. `hop` is the depth of the candidate
    /// node (1 for the first hop off a seed). A node without an embedding
    /// degrades to edge-prior-only scoring instead of failing.
    pub fn score_candidate(
        &self,
        question_embedding: &[f32],
        node: &Node,
        edge_type: EdgeType,
        hop: usize,
        intent: QuestionIntent,
    ) -> f64 {
        let prior = edge_prior(edge_type, intent);
        let base = match &node.embedding {
            Some(embedding) => {
                let semantic = cosine_similarity(question_embedding, embedding);
                semantic * self.config.semantic_weight + prior * self.config.edge_weight
            }
            None => prior,
        };

        let decay = self.config.hop_decay.powi(hop as i32);
        (base * decay).clamp(0.0, 1.0)
    }

    /// Cumulative score of a path extended by a candidate: the parent
    /// carries a fixed share, the new evidence the rest.
    pub fn extend_path(&self, parent_score: f64, candidate_score: f64) -> f64 {
        let carry = self.config.path_carry;
        (parent_score * carry + candidate_score * (1.0 - carry)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeType;

    fn scorer() -> RelevanceScorer {
        RelevanceScorer::new(ScorerConfig::default())
    }

    #[test]
    fn test_cosine_identical() {
        let v = vec![0.6, 0.8, 0.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_maps_to_half() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!((sim - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_mismatched_lengths() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_opinion_favors_reviews() {
        assert!(
            edge_prior(EdgeType::HasReview, QuestionIntent::Opinion)
                > edge_prior(EdgeType::Near, QuestionIntent::Opinion)
        );
        assert!(
            edge_prior(EdgeType::Near, QuestionIntent::Proximity)
                > edge_prior(EdgeType::HasReview, QuestionIntent::Proximity)
        );
    }

    #[test]
    fn test_hop_decay_monotonic() {
        let node = Node::new("r1", NodeType::Review).with_embedding(vec![1.0, 0.0]);
        let q = vec![1.0, 0.0];
        let s = scorer();
        let at_1 = s.score_candidate(&q, &node, EdgeType::HasReview, 1, QuestionIntent::Opinion);
        let at_3 = s.score_candidate(&q, &node, EdgeType::HasReview, 3, QuestionIntent::Opinion);
        assert!(at_1 > at_3);
    }

    #[test]
    fn test_missing_embedding_degrades_to_prior() {
        let node = Node::new("p1", NodeType::Place).with_attr("name", "PetWorld");
        let s = scorer();
        let score = s.score_candidate(&[1.0, 0.0], &node, EdgeType::Contains, 1, QuestionIntent::Opinion);
        let expected = edge_prior(EdgeType::Contains, QuestionIntent::Opinion)
            * ScorerConfig::default().hop_decay;
        assert!((score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let node = Node::new("r1", NodeType::Review).with_embedding(vec![0.3, 0.7]);
        let q = vec![0.5, 0.5];
        let s = scorer();
        let a = s.score_candidate(&q, &node, EdgeType::HasReview, 2, QuestionIntent::Opinion);
        let b = s.score_candidate(&q, &node, EdgeType::HasReview, 2, QuestionIntent::Opinion);
        assert_eq!(a, b);
    }

    #[test]
    fn test_extend_path_blend() {
        let s = scorer();
        let extended = s.extend_path(1.0, 0.0);
        assert!((extended - ScorerConfig::default().path_carry).abs() < 1e-9);
        assert!(s.extend_path(0.9, 0.9) <= 1.0);
    }
}
