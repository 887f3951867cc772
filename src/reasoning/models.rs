use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::graph::EdgeType;

/// How a question should be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    /// Single-entity, single-attribute factual lookup; delegated to the
    /// structured-query collaborator.
    Direct,
    /// Needs multi-hop traversal and evidence fusion.
    Exploratory,
}

/// Coarse question intent, used to bias edge-type priors during scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionIntent {
    /// Opinions, quality, experience: reviews matter most.
    Opinion,
    /// Distance, routes, what's nearby: spatial edges matter most.
    Proximity,
    /// Plain factual phrasing.
    Factual,
    General,
}

/// A question plus what the classifier extracted from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub intent: QuestionIntent,
    /// Lowercased content tokens, used for mention matching.
    pub tokens: Vec<String>,
}

/// One linker hit: a node worth starting traversal from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCandidate {
    pub node_id: String,
    pub confidence: f64,
    pub matched_name: String,
}

/// One hop within a reasoning path. The seed step has no incoming edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathStep {
    pub node_id: String,
    pub incoming: Option<EdgeType>,
    pub score: f64,
}

/// An ordered walk through the snapshot with a cumulative score.
/// Invariant: no node id repeats (enforced by the visited set).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningPath {
    pub steps: Vec<PathStep>,
    pub score: f64,
    #[serde(skip)]
    pub visited: HashSet<String>,
}

impl ReasoningPath {
    pub fn seed(node_id: impl Into<String>, confidence: f64) -> Self {
        let node_id = node_id.into();
        let mut visited = HashSet::new();
        visited.insert(node_id.clone());
        Self {
            steps: vec![PathStep {
                node_id,
                incoming: None,
                score: confidence,
            }],
            score: confidence,
            visited,
        }
    }

    pub fn extended(&self, node_id: &str, edge_type: EdgeType, step_score: f64, path_score: f64) -> Self {
        let mut next = self.clone();
        next.steps.push(PathStep {
            node_id: node_id.to_string(),
            incoming: Some(edge_type),
            score: step_score,
        });
        next.visited.insert(node_id.to_string());
        next.score = path_score;
        next
    }

    pub fn terminal(&self) -> &PathStep {
        // A path always has at least its seed step.
        self.steps.last().expect("path has a seed step")
    }

    /// Edge traversals, i.e. steps beyond the seed.
    pub fn hops(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.node_id.as_str())
    }
}

/// Outcome of one navigation call. An empty `paths` and a tripped budget
/// are both normal states the caller must handle, not errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Navigation {
    pub paths: Vec<ReasoningPath>,
    pub nodes_expanded: usize,
    pub budget_exhausted: bool,
    pub timed_out: bool,
}

/// A unit of evidence tied to one node. At most one block per node id
/// survives aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextBlock {
    pub node_id: String,
    pub text: String,
    pub score: f64,
}

/// Answer from the structured-query collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredAnswer {
    pub text: String,
    #[serde(default)]
    pub source_ids: Vec<String>,
}

/// Closed result of routing and answering one question. Every call site
/// matches exhaustively; there is no duck-typed agent dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RouteOutcome {
    Direct {
        answer: StructuredAnswer,
    },
    Exploratory {
        answer: String,
        blocks: Vec<ContextBlock>,
        paths: Vec<ReasoningPath>,
    },
    /// Degraded but well-formed: nothing cleared the thresholds or an
    /// upstream collaborator stayed down after retry. Carries whatever
    /// partial trace exists, for observability.
    Insufficient {
        question: String,
        reason: String,
        partial_paths: Vec<ReasoningPath>,
    },
}

impl RouteOutcome {
    pub fn is_insufficient(&self) -> bool {
        matches!(self, Self::Insufficient { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_path_shape() {
        let path = ReasoningPath::seed("n1", 0.9);
        assert_eq!(path.hops(), 0);
        assert_eq!(path.terminal().node_id, "n1");
        assert!(path.terminal().incoming.is_none());
        assert!((path.score - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_extension_tracks_visited() {
        let path = ReasoningPath::seed("n1", 0.9);
        let extended = path.extended("p1", EdgeType::Contains, 0.7, 0.8);
        assert_eq!(extended.hops(), 1);
        assert!(extended.visited.contains("n1"));
        assert!(extended.visited.contains("p1"));
        // The original is untouched.
        assert_eq!(path.hops(), 0);
    }

    #[test]
    fn test_route_outcome_serde_tagging() {
        let outcome = RouteOutcome::Insufficient {
            question: "why?".into(),
            reason: "no evidence".into(),
            partial_paths: vec![],
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains(r#""kind":"insufficient""#));
    }
}
