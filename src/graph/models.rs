use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The five entity types loaded by the external ETL pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Neighborhood,
    Place,
    Road,
    Intersection,
    Review,
}

impl NodeType {
    /// Reviews are the domain-defined leaves: a path that reaches one is
    /// complete, there is nothing useful past the review text.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Review)
    }
}

/// Relationship types as written by the inserter pipeline
/// (`Neighborhood CONTAINS Place`, `Place NEAR Intersection`,
/// `Place HAS_REVIEW Review`, `Road` segments between intersections).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    Contains,
    Near,
    HasReview,
    Road,
}

impl EdgeType {
    /// ROAD segments carry no semantic direction; the other edge types do.
    pub fn is_undirected(&self) -> bool {
        matches!(self, Self::Road)
    }
}

/// Scalar attribute value. Nodes carry a declared attribute mapping rather
/// than an open property bag; the set of names is fixed per [`NodeType`]
/// by the ETL schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{}", s),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

/// A node in the read-only graph snapshot. The embedding is produced
/// offline by the ETL pipeline; nodes without one still traverse, they
/// just score on edge priors alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub node_type: NodeType,
    #[serde(default)]
    pub attrs: HashMap<String, AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            node_type,
            attrs: HashMap::new(),
            embedding: None,
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// The display name used by entity linking. Reviews have no name of
    /// their own (they are matched through their parent place).
    pub fn name(&self) -> Option<&str> {
        self.attrs.get("name").and_then(AttrValue::as_str)
    }
}

/// A directed relationship between two snapshot nodes. Traversal treats
/// ROAD edges as bidirectional; that choice lives in the adjacency index,
/// not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub edge_type: EdgeType,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_display() {
        assert_eq!(NodeType::Neighborhood.to_string(), "NEIGHBORHOOD");
        assert_eq!(EdgeType::HasReview.to_string(), "HAS_REVIEW");
    }

    #[test]
    fn test_leaf_types() {
        assert!(NodeType::Review.is_leaf());
        assert!(!NodeType::Place.is_leaf());
    }

    #[test]
    fn test_road_is_undirected() {
        assert!(EdgeType::Road.is_undirected());
        assert!(!EdgeType::Contains.is_undirected());
        assert!(!EdgeType::HasReview.is_undirected());
    }

    #[test]
    fn test_node_name_lookup() {
        let node = Node::new("p1", NodeType::Place).with_attr("name", "PetWorld");
        assert_eq!(node.name(), Some("PetWorld"));

        let unnamed = Node::new("r1", NodeType::Review).with_attr("text", "great");
        assert_eq!(unnamed.name(), None);
    }

    #[test]
    fn test_attr_value_serde_untagged() {
        let json = r#"{"name": "Jardim", "population": 18000, "area_km2": 3.4}"#;
        let attrs: std::collections::HashMap<String, AttrValue> =
            serde_json::from_str(json).unwrap();
        assert_eq!(attrs["name"], AttrValue::Str("Jardim".into()));
        assert_eq!(attrs["population"], AttrValue::Int(18000));
        assert_eq!(attrs["area_km2"], AttrValue::Float(3.4));
    }
}
