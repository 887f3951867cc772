pub mod models;
pub mod snapshot;

pub use models::{AttrValue, Edge, EdgeType, Node, NodeType};
pub use snapshot::{GraphSnapshot, Neighbor};
