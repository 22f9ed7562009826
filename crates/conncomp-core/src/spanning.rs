//! Spanning trees over unweighted graphs.
//!
//! # Overview
//!
//! [`spanning_tree`] records the discovery edge of every node reached by a
//! breadth-first walk. With no weights in the model every spanning tree is
//! minimal, so the first one found is the one returned.
//!
//! The edges of the tree are the *protected* edges of the pruner: removing
//! any other edge can never disconnect the graph, because the tree alone
//! already connects it.
//!
//! # Disconnected input
//!
//! Walks restart from every node the previous walks did not reach, so a
//! disconnected graph gets a spanning forest: `n - c` edges for `n` nodes in
//! `c` components. For a connected graph that is the usual `n - 1`.
//!
//! # Verification
//!
//! [`verify_spanning_tree`] re-checks the guarantee with a
//! [`petgraph::unionfind::UnionFind`]: every edge must exist in the graph and
//! join two sets that were still separate when it was added.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use petgraph::unionfind::UnionFind;
use tracing::trace;

use crate::components::component_members;
use crate::graph::{Edge, Graph, NodeId};
use crate::traverse::breadth_first_ordered;

// ---------------------------------------------------------------------------
// SpanningTree
// ---------------------------------------------------------------------------

/// The set of discovery edges of a spanning tree (or forest).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanningTree {
    edges: HashSet<Edge>,
}

impl SpanningTree {
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns `true` if `edge` is protected by this tree.
    #[must_use]
    pub fn contains(&self, edge: Edge) -> bool {
        self.edges.contains(&edge)
    }

    pub fn iter(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }

    #[must_use]
    pub fn sorted_edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self.iter().collect();
        edges.sort_unstable();
        edges
    }
}

impl FromIterator<Edge> for SpanningTree {
    fn from_iter<T: IntoIterator<Item = Edge>>(iter: T) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}

/// Compute a spanning tree of `graph`.
///
/// Returns `n - 1` edges for a connected graph of `n ≥ 1` nodes, an empty
/// tree for an empty graph, and a spanning forest for a disconnected graph.
///
/// Roots are tried in ascending id order and neighbors are expanded in
/// ascending id order, so the tree depends only on the graph's edge set and
/// never on how its nodes happen to be hashed.
///
/// # Panics
///
/// If the traversal reports a node as its own parent.
#[must_use]
pub fn spanning_tree(graph: &Graph) -> SpanningTree {
    let n = graph.node_count();
    let mut index: HashSet<NodeId> = HashSet::with_capacity(n);
    let mut edges: HashSet<Edge> = HashSet::with_capacity(n.saturating_sub(1));

    let mut roots: Vec<NodeId> = graph.node_ids().collect();
    roots.sort_unstable();

    for root in roots {
        breadth_first_ordered(graph, root, &mut index, |visit| {
            let Some(parent) = visit.parent else {
                return;
            };
            let child = visit.node.id();
            let edge = Edge::new(parent, child)
                .unwrap_or_else(|err| panic!("traversal discovered {child} from itself: {err}"));
            edges.insert(edge);
        });
    }

    trace!(nodes = n, protected = edges.len(), "spanning tree built");
    SpanningTree { edges }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Ways a candidate edge set can fail to be a spanning tree of a graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpanningDefect {
    #[error("tree edge {0} is not present in the graph")]
    MissingEdge(Edge),

    #[error("tree edge {0} closes a cycle")]
    Cycle(Edge),

    #[error("tree has {actual} edges, expected {expected}")]
    EdgeCount { expected: usize, actual: usize },
}

/// Check that `tree` is a spanning tree (forest) of `graph`.
///
/// # Errors
///
/// Returns the first [`SpanningDefect`] found, checking edges in ascending
/// order.
pub fn verify_spanning_tree(graph: &Graph, tree: &SpanningTree) -> Result<(), SpanningDefect> {
    let dense: HashMap<NodeId, usize> = graph
        .node_ids()
        .enumerate()
        .map(|(i, id)| (id, i))
        .collect();
    let mut sets: UnionFind<usize> = UnionFind::new(dense.len());

    for edge in tree.sorted_edges() {
        if !graph.contains_edge(edge) {
            return Err(SpanningDefect::MissingEdge(edge));
        }
        let (Some(&a), Some(&b)) = (dense.get(&edge.low()), dense.get(&edge.high())) else {
            return Err(SpanningDefect::MissingEdge(edge));
        };
        if !sets.union(a, b) {
            return Err(SpanningDefect::Cycle(edge));
        }
    }

    let expected = graph.node_count() - component_members(graph).len();
    if tree.len() != expected {
        return Err(SpanningDefect::EdgeCount {
            expected,
            actual: tree.len(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
