//! Undirected simple graph stored as an id-keyed node arena.
//!
//! # Overview
//!
//! A [`Graph`] maps node ids to [`Node`]s. Each node keeps the *ids* of its
//! neighbors, never references to them, so the structure has no ownership
//! cycles and a node can be moved between graphs wholesale (which is what the
//! component decomposer does).
//!
//! ## Invariants
//!
//! - **Symmetry**: `b ∈ adjacency(a)` iff `a ∈ adjacency(b)`. Every mutation
//!   in this module touches both directions; [`Graph::assert_symmetric`]
//!   checks the whole arena.
//! - **Simple**: no self-loops (rejected with [`GraphError::InvalidEdge`]) and
//!   no parallel edges (adding an edge twice is a no-op).
//!
//! Nodes are created on first reference and never deleted individually.
//! Removing an edge can leave an endpoint with empty adjacency; the node stays.
//!
//! ## Cache Invalidation
//!
//! [`Graph::content_hash`] is a BLAKE3 hash of the sorted edge set. Two runs
//! over the same edge list produce the same hash regardless of input order.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Identity of a node within one [`Graph`].
pub type NodeId = u64;

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// A canonical undirected edge.
///
/// The endpoints are stored in ascending order so `(a, b)` and `(b, a)`
/// compare, hash and order identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "(NodeId, NodeId)", try_from = "(NodeId, NodeId)")]
pub struct Edge {
    low: NodeId,
    high: NodeId,
}

impl Edge {
    /// Build the canonical edge between `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidEdge`] when `a == b`.
    pub fn new(a: NodeId, b: NodeId) -> Result<Self, GraphError> {
        if a == b {
            return Err(GraphError::InvalidEdge(a));
        }
        Ok(Self {
            low: a.min(b),
            high: a.max(b),
        })
    }

    /// The smaller endpoint.
    #[must_use]
    pub const fn low(self) -> NodeId {
        self.low
    }

    /// The larger endpoint.
    #[must_use]
    pub const fn high(self) -> NodeId {
        self.high
    }

    /// Both endpoints, smaller first.
    #[must_use]
    pub const fn endpoints(self) -> (NodeId, NodeId) {
        (self.low, self.high)
    }

    /// Returns `true` if `id` is one of the endpoints.
    #[must_use]
    pub const fn touches(self, id: NodeId) -> bool {
        self.low == id || self.high == id
    }

    /// The endpoint opposite `id`, or `None` if `id` is not an endpoint.
    #[must_use]
    pub const fn other(self, id: NodeId) -> Option<NodeId> {
        if self.low == id {
            Some(self.high)
        } else if self.high == id {
            Some(self.low)
        } else {
            None
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

impl From<Edge> for (NodeId, NodeId) {
    fn from(edge: Edge) -> Self {
        edge.endpoints()
    }
}

impl TryFrom<(NodeId, NodeId)> for Edge {
    type Error = GraphError;

    fn try_from((a, b): (NodeId, NodeId)) -> Result<Self, Self::Error> {
        Self::new(a, b)
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A node and the ids of its neighbors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    neighbors: HashSet<NodeId>,
}

impl Node {
    fn new(id: NodeId) -> Self {
        Self {
            id,
            neighbors: HashSet::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Neighbor ids, in unspecified order.
    pub fn neighbors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.neighbors.iter().copied()
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    #[must_use]
    pub fn is_adjacent(&self, other: NodeId) -> bool {
        self.neighbors.contains(&other)
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// An undirected simple graph keyed by node id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: HashMap<NodeId, Node>,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(from, to)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidEdge`] on the first self-loop pair.
    pub fn from_edges<I>(pairs: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut graph = Self::new();
        for (from, to) in pairs {
            graph.add_edge(from, to)?;
        }
        Ok(graph)
    }

    /// Insert the undirected edge between `from` and `to`, creating missing
    /// endpoints.
    ///
    /// Returns `true` if the edge was not already present. The graph is left
    /// untouched when the edge is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidEdge`] when `from == to`.
    ///
    /// # Panics
    ///
    /// If only one direction of the edge was already stored.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<bool, GraphError> {
        Edge::new(from, to)?;

        let forward = self.fetch(from).neighbors.insert(to);
        let backward = self.fetch(to).neighbors.insert(from);
        assert_eq!(
            forward, backward,
            "asymmetric adjacency between {from} and {to}"
        );

        Ok(forward)
    }

    /// Return the node for `id`, creating it with empty adjacency if absent.
    pub fn fetch(&mut self, id: NodeId) -> &mut Node {
        self.nodes.entry(id).or_insert_with(|| Node::new(id))
    }

    /// Look up a node without creating it.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All nodes, in unspecified order.
    pub fn node_list(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// All node ids, in unspecified order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Every undirected edge exactly once, in unspecified order.
    #[must_use]
    pub fn edge_list(&self) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.edge_count());
        for node in self.nodes.values() {
            for neighbor in node.neighbors() {
                // Report each edge from its smaller endpoint only.
                if node.id < neighbor {
                    edges.push(Edge {
                        low: node.id,
                        high: neighbor,
                    });
                }
            }
        }
        edges
    }

    /// Every undirected edge exactly once, in ascending order.
    #[must_use]
    pub fn sorted_edges(&self) -> Vec<Edge> {
        let mut edges = self.edge_list();
        edges.sort_unstable();
        edges
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(Node::degree).sum::<usize>() / 2
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains_edge(&self, edge: Edge) -> bool {
        self.nodes
            .get(&edge.low)
            .is_some_and(|node| node.is_adjacent(edge.high))
    }

    /// Remove both directed entries of `edge`. Endpoint nodes are kept.
    ///
    /// Returns `true` if the edge was present.
    ///
    /// # Panics
    ///
    /// If only one direction of the edge was stored.
    pub fn remove_edge(&mut self, edge: Edge) -> bool {
        let forward = self
            .nodes
            .get_mut(&edge.low)
            .is_some_and(|node| node.neighbors.remove(&edge.high));
        let backward = self
            .nodes
            .get_mut(&edge.high)
            .is_some_and(|node| node.neighbors.remove(&edge.low));
        assert_eq!(forward, backward, "asymmetric adjacency on edge {edge}");
        forward
    }

    /// Undirected edge density: `2E / (N * (N - 1))`, `0.0` below two nodes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn density(&self) -> f64 {
        let n = self.node_count();
        if n < 2 {
            return 0.0;
        }
        (2 * self.edge_count()) as f64 / (n * (n - 1)) as f64
    }

    /// BLAKE3 hash of the sorted edge list.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for edge in self.sorted_edges() {
            hasher.update(&edge.low.to_le_bytes());
            hasher.update(&edge.high.to_le_bytes());
        }
        format!("blake3:{}", hasher.finalize())
    }

    /// Panic if any adjacency entry lacks its mirror.
    ///
    /// # Panics
    ///
    /// On the first asymmetric pair or dangling neighbor id found.
    pub fn assert_symmetric(&self) {
        for node in self.nodes.values() {
            for neighbor in node.neighbors() {
                let mirrored = self
                    .nodes
                    .get(&neighbor)
                    .is_some_and(|other| other.is_adjacent(node.id));
                assert!(
                    mirrored,
                    "asymmetric adjacency: {} lists {neighbor} but not the reverse",
                    node.id
                );
            }
        }
    }

    pub(crate) fn into_nodes(self) -> HashMap<NodeId, Node> {
        self.nodes
    }

    pub(crate) fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id, node);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
