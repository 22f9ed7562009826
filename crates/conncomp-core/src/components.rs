//! Connected-component decomposition.
//!
//! Drives [`breadth_first`] from every node not yet placed in a component,
//! sharing one visited index across the walks. The index lives only for the
//! duration of one decomposition call.
//!
//! [`connected_components`] consumes its input and moves each [`Node`] into
//! exactly one output graph. Because adjacency never crosses a component
//! boundary, moving a node carries exactly the edges whose both endpoints lie
//! in that component.
//!
//! [`Node`]: crate::graph::Node

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::graph::{Graph, NodeId};
use crate::traverse::{VisitIndex, breadth_first};

/// Node ids of each connected component, without moving anything.
///
/// Order of components, and of ids within a component, is unspecified.
#[must_use]
pub fn component_members(graph: &Graph) -> Vec<Vec<NodeId>> {
    let mut index: HashSet<NodeId> = HashSet::with_capacity(graph.node_count());
    let mut members = Vec::new();

    for id in graph.node_ids() {
        if index.visited(id) {
            continue;
        }
        let mut component = Vec::new();
        breadth_first(graph, id, &mut index, |visit| component.push(visit.node.id()));
        members.push(component);
    }

    members
}

/// Split `graph` into its connected components.
///
/// Every input node ends up in exactly one output graph; output graphs are
/// pairwise node-disjoint and each is connected. An empty input yields an
/// empty list. Component order is unspecified.
///
/// # Panics
///
/// If the traversal reports a node twice or misses one, which can only
/// happen when the graph's symmetry invariant was broken.
#[must_use]
#[instrument(skip_all, fields(nodes = graph.node_count()))]
pub fn connected_components(graph: Graph) -> Vec<Graph> {
    let members = component_members(&graph);
    let mut nodes = graph.into_nodes();

    let components: Vec<Graph> = members
        .into_iter()
        .map(|ids| {
            let mut component = Graph::new();
            for id in ids {
                let node = nodes
                    .remove(&id)
                    .unwrap_or_else(|| panic!("node {id} placed in two components"));
                component.insert_node(node);
            }
            component
        })
        .collect();

    assert!(
        nodes.is_empty(),
        "{} nodes were not reached by any traversal",
        nodes.len()
    );
    debug!(components = components.len(), "decomposed graph");

    components
}

/// Returns `true` if `graph` has at most one connected component.
///
/// The empty graph counts as connected.
#[must_use]
pub fn is_connected(graph: &Graph) -> bool {
    let Some(root) = graph.node_ids().next() else {
        return true;
    };
    let mut index: HashSet<NodeId> = HashSet::with_capacity(graph.node_count());
    breadth_first(graph, root, &mut index, |_| {}) == graph.node_count()
}
