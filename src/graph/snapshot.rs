use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::error::SnapshotError;
use super::models::{Edge, EdgeType, Node, NodeType};

/// One outgoing step from a node, as seen by traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor<'a> {
    pub target: &'a str,
    pub edge_type: EdgeType,
}

/// Immutable graph for the duration of a reasoning session.
///
/// The ETL collaborator produces a new snapshot on every load; nothing in
/// this crate ever mutates one, so concurrent traversals share it behind
/// an `Arc` without locking. Validation happens once here: after
/// construction, every edge endpoint is known to resolve and traversal
/// code can index without checking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SnapshotData", into = "SnapshotData")]
pub struct GraphSnapshot {
    nodes: HashMap<String, Node>,
    edges: Vec<Edge>,
    /// source id -> outgoing (target id, edge type). ROAD edges are
    /// indexed in both directions.
    adjacency: HashMap<String, Vec<(String, EdgeType)>>,
}

/// Wire format: the plain node/edge tables the ETL pipeline emits.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotData {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl TryFrom<SnapshotData> for GraphSnapshot {
    type Error = SnapshotError;

    fn try_from(data: SnapshotData) -> Result<Self, SnapshotError> {
        GraphSnapshot::new(data.nodes, data.edges)
    }
}

impl From<GraphSnapshot> for SnapshotData {
    fn from(snapshot: GraphSnapshot) -> Self {
        let mut nodes: Vec<Node> = snapshot.nodes.into_values().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            nodes,
            edges: snapshot.edges,
        }
    }
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, SnapshotError> {
        let mut node_map: HashMap<String, Node> = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if node_map.contains_key(&node.id) {
                return Err(SnapshotError::DuplicateNode(node.id));
            }
            if !node.node_type.is_leaf() && node.name().is_none() {
                return Err(SnapshotError::MissingAttribute(node.id, "name"));
            }
            node_map.insert(node.id.clone(), node);
        }

        let mut adjacency: HashMap<String, Vec<(String, EdgeType)>> = HashMap::new();
        for edge in &edges {
            if !node_map.contains_key(&edge.source) {
                return Err(SnapshotError::DanglingEdge(edge.source.clone()));
            }
            if !node_map.contains_key(&edge.target) {
                return Err(SnapshotError::DanglingEdge(edge.target.clone()));
            }
            adjacency
                .entry(edge.source.clone())
                .or_default()
                .push((edge.target.clone(), edge.edge_type));
            if edge.edge_type.is_undirected() {
                adjacency
                    .entry(edge.target.clone())
                    .or_default()
                    .push((edge.source.clone(), edge.edge_type));
            }
        }

        // Deterministic neighbor order regardless of input edge order.
        for targets in adjacency.values_mut() {
            targets.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.to_string().cmp(&b.1.to_string())));
        }

        info!(
            "Snapshot loaded: {} nodes, {} edges",
            node_map.len(),
            edges.len()
        );

        Ok(Self {
            nodes: node_map,
            edges,
            adjacency,
        })
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn neighbors(&self, id: &str) -> impl Iterator<Item = Neighbor<'_>> {
        self.adjacency
            .get(id)
            .into_iter()
            .flatten()
            .map(|(target, edge_type)| Neighbor {
                target: target.as_str(),
                edge_type: *edge_type,
            })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All nodes carrying a `name` attribute, for entity linking.
    pub fn named_nodes(&self) -> impl Iterator<Item = (&Node, &str)> {
        let mut named: Vec<(&Node, &str)> = self
            .nodes
            .values()
            .filter_map(|node| node.name().map(|name| (node, name)))
            .collect();
        named.sort_by(|a, b| a.0.id.cmp(&b.0.id));
        debug!("Named nodes in snapshot: {}", named.len());
        named.into_iter()
    }

    /// Count of nodes of one type, used by stats logging in the binary.
    pub fn count_by_type(&self, node_type: NodeType) -> usize {
        self.nodes
            .values()
            .filter(|n| n.node_type == node_type)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GraphSnapshot {
        GraphSnapshot::new(
            vec![
                Node::new("n1", NodeType::Neighborhood).with_attr("name", "Jardim"),
                Node::new("p1", NodeType::Place).with_attr("name", "PetWorld"),
                Node::new("i1", NodeType::Intersection).with_attr("name", "Rua A x Rua B"),
                Node::new("i2", NodeType::Intersection).with_attr("name", "Rua B x Rua C"),
                Node::new("r1", NodeType::Review).with_attr("text", "great grooming service"),
            ],
            vec![
                Edge::new("n1", "p1", EdgeType::Contains),
                Edge::new("p1", "r1", EdgeType::HasReview),
                Edge::new("i1", "i2", EdgeType::Road),
                Edge::new("p1", "i1", EdgeType::Near),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_and_counts() {
        let snapshot = sample();
        assert_eq!(snapshot.node_count(), 5);
        assert_eq!(snapshot.edge_count(), 4);
        assert!(snapshot.contains("p1"));
        assert!(!snapshot.contains("ghost"));
        assert_eq!(snapshot.count_by_type(NodeType::Intersection), 2);
    }

    #[test]
    fn test_directed_neighbors() {
        let snapshot = sample();
        let from_n1: Vec<_> = snapshot.neighbors("n1").collect();
        assert_eq!(from_n1.len(), 1);
        assert_eq!(from_n1[0].target, "p1");

        // CONTAINS is directed: nothing leads back from p1 to n1.
        let from_p1: Vec<_> = snapshot.neighbors("p1").map(|n| n.target.to_string()).collect();
        assert!(!from_p1.contains(&"n1".to_string()));
    }

    #[test]
    fn test_road_traverses_both_ways() {
        let snapshot = sample();
        let from_i2: Vec<_> = snapshot.neighbors("i2").collect();
        assert_eq!(from_i2.len(), 1);
        assert_eq!(from_i2[0].target, "i1");
        assert_eq!(from_i2[0].edge_type, EdgeType::Road);
    }

    #[test]
    fn test_neighbor_order_is_deterministic() {
        let nodes = vec![
            Node::new("n1", NodeType::Neighborhood).with_attr("name", "Centro"),
            Node::new("p1", NodeType::Place).with_attr("name", "A"),
            Node::new("p2", NodeType::Place).with_attr("name", "B"),
            Node::new("p3", NodeType::Place).with_attr("name", "C"),
        ];
        let edges = vec![
            Edge::new("n1", "p3", EdgeType::Contains),
            Edge::new("n1", "p1", EdgeType::Contains),
            Edge::new("n1", "p2", EdgeType::Contains),
        ];
        let snapshot = GraphSnapshot::new(nodes, edges).unwrap();
        let order: Vec<_> = snapshot.neighbors("n1").map(|n| n.target.to_string()).collect();
        assert_eq!(order, vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn test_dangling_edge_rejected() {
        let result = GraphSnapshot::new(
            vec![Node::new("n1", NodeType::Neighborhood).with_attr("name", "Jardim")],
            vec![Edge::new("n1", "missing", EdgeType::Contains)],
        );
        assert!(matches!(result, Err(SnapshotError::DanglingEdge(id)) if id == "missing"));
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let result = GraphSnapshot::new(
            vec![
                Node::new("n1", NodeType::Neighborhood).with_attr("name", "Jardim"),
                Node::new("n1", NodeType::Neighborhood).with_attr("name", "Centro"),
            ],
            vec![],
        );
        assert!(matches!(result, Err(SnapshotError::DuplicateNode(_))));
    }

    #[test]
    fn test_unnamed_non_review_rejected() {
        let result = GraphSnapshot::new(vec![Node::new("p1", NodeType::Place)], vec![]);
        assert!(matches!(result, Err(SnapshotError::MissingAttribute(_, "name"))));
    }

    #[test]
    fn test_json_round_trip_validates() {
        let json = r#"{
            "nodes": [
                {"id": "n1", "node_type": "neighborhood", "attrs": {"name": "Jardim"}},
                {"id": "p1", "node_type": "place", "attrs": {"name": "PetWorld", "rating": 4.5}}
            ],
            "edges": [
                {"source": "n1", "target": "p1", "edge_type": "contains"}
            ]
        }"#;
        let snapshot: GraphSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.node_count(), 2);
        assert_eq!(snapshot.neighbors("n1").count(), 1);

        let bad = r#"{"nodes": [], "edges": [{"source": "a", "target": "b", "edge_type": "near"}]}"#;
        assert!(serde_json::from_str::<GraphSnapshot>(bad).is_err());
    }
}
