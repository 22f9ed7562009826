//! Summary statistics for an undirected edge list.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: size of the graph.
//! - **density**: `2E / (N * (N - 1))`; 0.0 below two nodes.
//! - **component_count**: number of connected components.
//! - **largest_component**: node count of the biggest component.
//! - **isolated_node_count**: nodes with no edges.
//! - **max_degree**: highest node degree.
//! - **redundant_edge_count**: `E - N + C`, the number of edges outside any
//!   spanning forest. This is the most a pruning run can remove across all
//!   components.
//! - **content_hash**: BLAKE3 of the sorted edge list.

use serde::Serialize;

use crate::components::component_members;
use crate::graph::{Graph, Node};

/// Summary statistics for a [`Graph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub component_count: usize,
    pub largest_component: usize,
    pub isolated_node_count: usize,
    pub max_degree: usize,
    pub redundant_edge_count: usize,
    pub content_hash: String,
}

impl GraphStats {
    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        let node_count = graph.node_count();
        let edge_count = graph.edge_count();
        let members = component_members(graph);
        let component_count = members.len();

        Self {
            node_count,
            edge_count,
            density: graph.density(),
            component_count,
            largest_component: members.iter().map(Vec::len).max().unwrap_or(0),
            isolated_node_count: graph.node_list().filter(|n| n.degree() == 0).count(),
            max_degree: graph.node_list().map(Node::degree).max().unwrap_or(0),
            redundant_edge_count: edge_count + component_count - node_count,
            content_hash: graph.content_hash(),
        }
    }
}
