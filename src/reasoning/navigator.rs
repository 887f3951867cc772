use std::cmp::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::core::config::NavigatorConfig;
use crate::core::error::{BairroError, Result};
use crate::graph::GraphSnapshot;
use super::models::{Navigation, QuestionIntent, ReasoningPath, SeedCandidate};
use super::scorer::RelevanceScorer;

/// Bounded best-first multi-hop search.
///
/// The frontier holds at most `beam_width` paths per depth, so the cost
/// is O(depth x beam_width x average degree) rather than exhaustive
/// enumeration. `max_nodes_expanded` and `max_depth` are the
/// deterministic cancellation budgets; the optional wall-clock timeout
/// sits on top and, when it fires, the best paths found so far are
/// returned rather than an error.
pub struct GraphNavigator {
    snapshot: Arc<GraphSnapshot>,
    scorer: RelevanceScorer,
    config: NavigatorConfig,
}

impl GraphNavigator {
    pub fn new(snapshot: Arc<GraphSnapshot>, scorer: RelevanceScorer, config: NavigatorConfig) -> Self {
        Self {
            snapshot,
            scorer,
            config,
        }
    }

    /// Expand from the given seeds and return ranked completed paths.
    ///
    /// A seed id absent from the snapshot is a caller contract violation
    /// (`InvalidSeed`, nothing partial returned). An empty path list is a
    /// valid "no qualifying evidence" outcome, not an error.
    pub fn navigate(
        &self,
        seeds: &[SeedCandidate],
        question_embedding: &[f32],
        intent: QuestionIntent,
    ) -> Result<Navigation> {
        for seed in seeds {
            if !self.snapshot.contains(&seed.node_id) {
                return Err(BairroError::InvalidSeed(seed.node_id.clone()));
            }
        }

        let started = Instant::now();
        let deadline = self.config.timeout_ms.map(Duration::from_millis);

        let mut frontier: Vec<ReasoningPath> = Vec::new();
        let mut completed: Vec<ReasoningPath> = Vec::new();
        for seed in seeds {
            let path = ReasoningPath::seed(&seed.node_id, seed.confidence);
            if self.is_leaf(&seed.node_id) {
                completed.push(path);
            } else {
                frontier.push(path);
            }
        }

        let mut nodes_expanded: usize = 0;
        let mut budget_exhausted = false;
        let mut timed_out = false;

        'search: for depth in 1..=self.config.max_depth {
            if frontier.is_empty() {
                break;
            }

            let mut extensions: Vec<ReasoningPath> = Vec::new();
            let mut stalled: Vec<ReasoningPath> = Vec::new();
            for path in &frontier {
                if let Some(limit) = deadline {
                    if started.elapsed() >= limit {
                        warn!("Navigation timed out at depth {}, returning best so far", depth);
                        timed_out = true;
                        break 'search;
                    }
                }

                let terminal = path.terminal().node_id.clone();
                let mut has_unvisited = false;
                for neighbor in self.snapshot.neighbors(&terminal) {
                    if path.visited.contains(neighbor.target) {
                        continue;
                    }
                    has_unvisited = true;
                    if nodes_expanded >= self.config.max_nodes_expanded {
                        warn!(
                            "Expansion budget {} exhausted at depth {}",
                            self.config.max_nodes_expanded, depth
                        );
                        budget_exhausted = true;
                        break 'search;
                    }
                    nodes_expanded += 1;

                    let Some(node) = self.snapshot.node(neighbor.target) else {
                        continue;
                    };
                    let step_score = self.scorer.score_candidate(
                        question_embedding,
                        node,
                        neighbor.edge_type,
                        depth,
                        intent,
                    );
                    let path_score = self.scorer.extend_path(path.score, step_score);
                    if path_score < self.config.min_score_threshold {
                        continue;
                    }
                    extensions.push(path.extended(
                        neighbor.target,
                        neighbor.edge_type,
                        step_score,
                        path_score,
                    ));
                }

                // A dead end (every neighbor already on the path) is still
                // scored evidence; it completes here instead of vanishing
                // with the rebuilt frontier. Paths whose extensions were all
                // pruned by the threshold are dropped as before.
                if !has_unvisited {
                    stalled.push(path.clone());
                }
            }
            completed.append(&mut stalled);

            extensions.sort_by(path_order);
            extensions.truncate(self.config.beam_width);
            debug!(
                "Depth {}: {} paths kept, {} nodes expanded",
                depth,
                extensions.len(),
                nodes_expanded
            );

            frontier = Vec::new();
            for path in extensions {
                if self.is_leaf(&path.terminal().node_id) {
                    completed.push(path);
                } else {
                    frontier.push(path);
                }
            }
        }

        // Whatever remained in flight when the search ended (depth cap,
        // budget, timeout) is still evidence; flush it into the results.
        completed.extend(frontier);
        completed.sort_by(path_order);

        info!(
            "Navigation done: {} paths, {} nodes expanded, budget_exhausted={}, {:?} elapsed",
            completed.len(),
            nodes_expanded,
            budget_exhausted,
            started.elapsed()
        );

        Ok(Navigation {
            paths: completed,
            nodes_expanded,
            budget_exhausted,
            timed_out,
        })
    }

    fn is_leaf(&self, node_id: &str) -> bool {
        self.snapshot
            .node(node_id)
            .map(|n| n.node_type.is_leaf())
            .unwrap_or(false)
    }
}

/// Ranking order: higher score first; ties broken by fewer hops, then
/// lexicographically lower terminal node id, so identical inputs always
/// produce an identical ranked list.
fn path_order(a: &ReasoningPath, b: &ReasoningPath) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.hops().cmp(&b.hops()))
        .then_with(|| a.terminal().node_id.cmp(&b.terminal().node_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ScorerConfig;
    use crate::graph::{Edge, EdgeType, Node, NodeType};

    fn petworld_snapshot() -> Arc<GraphSnapshot> {
        Arc::new(
            GraphSnapshot::new(
                vec![
                    Node::new("n1", NodeType::Neighborhood)
                        .with_attr("name", "Jardim")
                        .with_embedding(vec![0.2, 0.8]),
                    Node::new("p1", NodeType::Place)
                        .with_attr("name", "PetWorld")
                        .with_attr("category", "petshop")
                        .with_embedding(vec![0.9, 0.4]),
                    Node::new("r1", NodeType::Review)
                        .with_attr("text", "great grooming service")
                        .with_embedding(vec![1.0, 0.1]),
                    Node::new("i1", NodeType::Intersection).with_attr("name", "Rua A x Rua B"),
                    Node::new("i2", NodeType::Intersection).with_attr("name", "Rua B x Rua C"),
                ],
                vec![
                    Edge::new("n1", "p1", EdgeType::Contains),
                    Edge::new("p1", "r1", EdgeType::HasReview),
                    Edge::new("p1", "i1", EdgeType::Near),
                    Edge::new("i1", "i2", EdgeType::Road),
                ],
            )
            .unwrap(),
        )
    }

    fn navigator(snapshot: Arc<GraphSnapshot>, config: NavigatorConfig) -> GraphNavigator {
        GraphNavigator::new(snapshot, RelevanceScorer::new(ScorerConfig::default()), config)
    }

    fn seed(id: &str, confidence: f64) -> SeedCandidate {
        SeedCandidate {
            node_id: id.to_string(),
            confidence,
            matched_name: id.to_string(),
        }
    }

    // "grooming"-flavored question vector, close to r1's embedding.
    fn grooming_query() -> Vec<f32> {
        vec![1.0, 0.1]
    }

    #[test]
    fn test_review_path_ranks_first() {
        let nav = navigator(petworld_snapshot(), NavigatorConfig::default());
        let result = nav
            .navigate(&[seed("n1", 0.95)], &grooming_query(), QuestionIntent::Opinion)
            .unwrap();

        assert!(!result.paths.is_empty());
        let top = &result.paths[0];
        let ids: Vec<_> = top.node_ids().collect();
        assert_eq!(ids, vec!["n1", "p1", "r1"]);
        assert!(!result.budget_exhausted);
    }

    #[test]
    fn test_no_repeated_node_ids_in_any_path() {
        let nav = navigator(petworld_snapshot(), NavigatorConfig::from_mode("deep"));
        let result = nav
            .navigate(&[seed("n1", 0.95), seed("i2", 0.5)], &grooming_query(), QuestionIntent::Proximity)
            .unwrap();

        for path in &result.paths {
            let mut seen = std::collections::HashSet::new();
            for id in path.node_ids() {
                assert!(seen.insert(id.to_string()), "repeated node {} in path", id);
            }
        }
    }

    #[test]
    fn test_expansion_budget_is_respected() {
        let config = NavigatorConfig {
            max_nodes_expanded: 2,
            ..Default::default()
        };
        let nav = navigator(petworld_snapshot(), config);
        let result = nav
            .navigate(&[seed("n1", 0.95)], &grooming_query(), QuestionIntent::Opinion)
            .unwrap();

        assert!(result.nodes_expanded <= 2);
        assert!(result.budget_exhausted);
        // Best-effort: the frontier at the stop point is still returned.
        assert!(!result.paths.is_empty());
    }

    #[test]
    fn test_navigate_is_deterministic() {
        let snapshot = petworld_snapshot();
        let config = NavigatorConfig::default();
        let a = navigator(Arc::clone(&snapshot), config.clone())
            .navigate(&[seed("n1", 0.95)], &grooming_query(), QuestionIntent::Opinion)
            .unwrap();
        let b = navigator(snapshot, config)
            .navigate(&[seed("n1", 0.95)], &grooming_query(), QuestionIntent::Opinion)
            .unwrap();

        let ids_a: Vec<Vec<&str>> = a.paths.iter().map(|p| p.node_ids().collect()).collect();
        let ids_b: Vec<Vec<&str>> = b.paths.iter().map(|p| p.node_ids().collect()).collect();
        assert_eq!(ids_a, ids_b);
        assert_eq!(a.nodes_expanded, b.nodes_expanded);
    }

    #[test]
    fn test_invalid_seed_fails_without_partial_output() {
        let nav = navigator(petworld_snapshot(), NavigatorConfig::default());
        let result = nav.navigate(
            &[seed("n1", 0.95), seed("ghost", 0.9)],
            &grooming_query(),
            QuestionIntent::Opinion,
        );
        assert!(matches!(result, Err(BairroError::InvalidSeed(id)) if id == "ghost"));
    }

    #[test]
    fn test_threshold_above_everything_yields_empty() {
        let config = NavigatorConfig {
            min_score_threshold: 0.99,
            ..Default::default()
        };
        let nav = navigator(petworld_snapshot(), config);
        let result = nav
            .navigate(&[seed("n1", 0.95)], &grooming_query(), QuestionIntent::Opinion)
            .unwrap();
        assert!(result.paths.is_empty());
        assert!(!result.budget_exhausted);
    }

    #[test]
    fn test_max_depth_zero_returns_seed_paths_only() {
        let config = NavigatorConfig {
            max_depth: 0,
            ..Default::default()
        };
        let nav = navigator(petworld_snapshot(), config);
        let result = nav
            .navigate(&[seed("n1", 0.95), seed("p1", 0.8)], &grooming_query(), QuestionIntent::Opinion)
            .unwrap();

        assert_eq!(result.paths.len(), 2);
        assert!(result.paths.iter().all(|p| p.hops() == 0));
        assert_eq!(result.nodes_expanded, 0);
    }

    #[test]
    fn test_beam_width_caps_frontier() {
        // A star graph wider than the beam.
        let mut nodes = vec![Node::new("n1", NodeType::Neighborhood).with_attr("name", "Centro")];
        let mut edges = Vec::new();
        for i in 0..10 {
            let id = format!("p{}", i);
            nodes.push(
                Node::new(id.clone(), NodeType::Place)
                    .with_attr("name", format!("Place {}", i))
                    .with_embedding(vec![1.0, 0.0]),
            );
            edges.push(Edge::new("n1", id, EdgeType::Contains));
        }
        let snapshot = Arc::new(GraphSnapshot::new(nodes, edges).unwrap());
        let config = NavigatorConfig {
            max_depth: 1,
            beam_width: 3,
            ..Default::default()
        };
        let nav = navigator(snapshot, config);
        let result = nav
            .navigate(&[seed("n1", 0.9)], &[1.0, 0.0], QuestionIntent::General)
            .unwrap();

        assert_eq!(result.paths.len(), 3);
        // Equal scores everywhere: the lexicographic id tie-break decides.
        let terminals: Vec<_> = result.paths.iter().map(|p| p.terminal().node_id.clone()).collect();
        assert_eq!(terminals, vec!["p0", "p1", "p2"]);
    }

    #[test]
    fn test_dead_end_survives_deeper_search() {
        // A place with no reviews: the path stalls one hop in. A larger
        // depth budget must not lose evidence a smaller one finds.
        let snapshot = Arc::new(
            GraphSnapshot::new(
                vec![
                    Node::new("n1", NodeType::Neighborhood)
                        .with_attr("name", "Jardim")
                        .with_embedding(vec![0.2, 0.8]),
                    Node::new("p1", NodeType::Place)
                        .with_attr("name", "PetWorld")
                        .with_embedding(vec![0.9, 0.4]),
                ],
                vec![Edge::new("n1", "p1", EdgeType::Contains)],
            )
            .unwrap(),
        );

        let path_ids = |result: &Navigation| -> Vec<Vec<String>> {
            result
                .paths
                .iter()
                .map(|p| p.node_ids().map(str::to_string).collect())
                .collect()
        };

        let shallow_config = NavigatorConfig {
            max_depth: 1,
            ..Default::default()
        };
        let shallow = navigator(Arc::clone(&snapshot), shallow_config)
            .navigate(&[seed("n1", 0.95)], &grooming_query(), QuestionIntent::Opinion)
            .unwrap();
        assert_eq!(path_ids(&shallow), vec![vec!["n1".to_string(), "p1".to_string()]]);

        let deep = navigator(snapshot, NavigatorConfig::default())
            .navigate(&[seed("n1", 0.95)], &grooming_query(), QuestionIntent::Opinion)
            .unwrap();
        assert_eq!(path_ids(&deep), path_ids(&shallow));
    }

    #[test]
    fn test_ties_prefer_fewer_hops() {
        let a = ReasoningPath::seed("x", 0.5);
        let b = ReasoningPath::seed("w", 0.5).extended("y", EdgeType::Contains, 0.5, 0.5);
        assert_eq!(path_order(&a, &b), Ordering::Less);
    }
}
