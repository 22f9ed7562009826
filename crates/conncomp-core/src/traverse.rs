//! Breadth-first traversal over a [`Graph`].
//!
//! The walk is parameterized by a [`VisitIndex`] (the visit/visited hook pair)
//! and a callback invoked once per reached node. Callers that share one index
//! across several walks get the "skip everything already placed" behavior the
//! component decomposer relies on.
//!
//! Nodes are marked visited when they enter the frontier, so every reachable
//! node is reported exactly once, together with the node it was discovered
//! from. [`breadth_first`] follows adjacency-set iteration, so its tie order
//! is unspecified; [`breadth_first_ordered`] expands neighbors by ascending id
//! and is fully determined by the graph.

use std::collections::{HashSet, VecDeque};

use crate::graph::{Graph, Node, NodeId};

/// Visit/visited hooks consulted by [`breadth_first`].
pub trait VisitIndex {
    /// Mark `id` as visited.
    fn visit(&mut self, id: NodeId);

    /// Returns `true` if `id` was already marked.
    fn visited(&self, id: NodeId) -> bool;
}

impl VisitIndex for HashSet<NodeId> {
    fn visit(&mut self, id: NodeId) {
        self.insert(id);
    }

    fn visited(&self, id: NodeId) -> bool {
        self.contains(&id)
    }
}

/// One reached node and the node it was discovered from.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'g> {
    pub node: &'g Node,
    /// `None` for the root of the walk.
    pub parent: Option<NodeId>,
}

/// Walk every node reachable from `root` with a FIFO frontier.
///
/// `on_visit` runs exactly once per reachable node not already marked in
/// `index`. A root that is absent from `graph` or already visited yields no
/// visits. Returns the number of nodes visited.
///
/// # Panics
///
/// If an adjacency entry names a node missing from `graph`, which means the
/// graph's symmetry invariant was broken.
pub fn breadth_first<'g, I, F>(
    graph: &'g Graph,
    root: NodeId,
    index: &mut I,
    on_visit: F,
) -> usize
where
    I: VisitIndex + ?Sized,
    F: FnMut(Visit<'g>),
{
    frontier_walk(graph, root, index, on_visit, |node, out| out.extend(node.neighbors()))
}

/// [`breadth_first`] with each node's neighbors expanded in ascending id
/// order, so the visit sequence and every reported parent depend only on the
/// graph's contents.
///
/// # Panics
///
/// Same as [`breadth_first`].
pub fn breadth_first_ordered<'g, I, F>(
    graph: &'g Graph,
    root: NodeId,
    index: &mut I,
    on_visit: F,
) -> usize
where
    I: VisitIndex + ?Sized,
    F: FnMut(Visit<'g>),
{
    frontier_walk(graph, root, index, on_visit, |node, out| {
        out.extend(node.neighbors());
        out.sort_unstable();
    })
}

fn frontier_walk<'g, I, F, E>(
    graph: &'g Graph,
    root: NodeId,
    index: &mut I,
    mut on_visit: F,
    mut expand: E,
) -> usize
where
    I: VisitIndex + ?Sized,
    F: FnMut(Visit<'g>),
    E: FnMut(&Node, &mut Vec<NodeId>),
{
    let Some(root_node) = graph.node(root) else {
        return 0;
    };
    if index.visited(root) {
        return 0;
    }

    index.visit(root);
    let mut frontier: VecDeque<Visit<'g>> = VecDeque::new();
    frontier.push_back(Visit {
        node: root_node,
        parent: None,
    });

    let mut neighbors: Vec<NodeId> = Vec::new();
    let mut count = 0;
    while let Some(current) = frontier.pop_front() {
        on_visit(current);
        count += 1;

        let id = current.node.id();
        neighbors.clear();
        expand(current.node, &mut neighbors);
        for &neighbor in &neighbors {
            if index.visited(neighbor) {
                continue;
            }
            index.visit(neighbor);
            let node = graph
                .node(neighbor)
                .unwrap_or_else(|| panic!("dangling neighbor {neighbor} of node {id}"));
            frontier.push_back(Visit {
                node,
                parent: Some(id),
            });
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn graph(pairs: &[(NodeId, NodeId)]) -> Graph {
        Graph::from_edges(pairs.iter().copied()).expect("valid edges")
    }

    fn walk(g: &Graph, root: NodeId) -> Vec<(NodeId, Option<NodeId>)> {
        let mut index = HashSet::new();
        let mut seen = Vec::new();
        breadth_first(g, root, &mut index, |visit| {
            seen.push((visit.node.id(), visit.parent));
        });
        seen
    }

    #[test]
    fn visits_each_reachable_node_once_on_cycle() {
        let g = graph(&[(1, 2), (2, 3), (3, 4), (4, 1), (5, 6)]);
        let seen = walk(&g, 1);

        let mut ids: Vec<NodeId> = seen.iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn root_has_no_parent_and_others_do() {
        let g = graph(&[(1, 2), (1, 3), (2, 4)]);
        let seen = walk(&g, 1);

        assert_eq!(seen[0], (1, None));
        for (id, parent) in &seen[1..] {
            let parent = parent.expect("non-root visit has a parent");
            assert!(g.node(*id).expect("node").is_adjacent(parent));
        }
    }

    #[test]
    fn path_is_visited_in_order() {
        let g = graph(&[(1, 2), (2, 3), (3, 4)]);
        let order: Vec<NodeId> = walk(&g, 1).into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
    }

    #[test]
    fn depth_never_decreases() {
        // Two levels fan out from the root; BFS must finish level 1 first.
        let g = graph(&[(0, 1), (0, 2), (0, 3), (1, 4), (2, 5), (3, 6), (4, 7)]);
        let seen = walk(&g, 0);

        let mut depth: HashMap<NodeId, usize> = HashMap::new();
        let mut last = 0;
        for (id, parent) in seen {
            let d = parent.map_or(0, |p| depth[&p] + 1);
            assert!(d >= last, "node {id} at depth {d} after depth {last}");
            last = d;
            depth.insert(id, d);
        }
        assert_eq!(depth[&7], 3);
    }

    #[test]
    fn absent_root_visits_nothing() {
        let g = graph(&[(1, 2)]);
        assert!(walk(&g, 42).is_empty());
    }

    #[test]
    fn shared_index_skips_already_visited_nodes() {
        let g = graph(&[(1, 2), (3, 4)]);
        let mut index = HashSet::new();

        assert_eq!(breadth_first(&g, 1, &mut index, |_| {}), 2);
        assert_eq!(breadth_first(&g, 2, &mut index, |_| {}), 0);
        assert_eq!(breadth_first(&g, 3, &mut index, |_| {}), 2);
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn ordered_walk_expands_neighbors_ascending() {
        // Insert the hub's edges in descending order; the walk must not care.
        let g = graph(&[(0, 9), (0, 5), (0, 7), (0, 1), (5, 2), (1, 3)]);
        let mut index = HashSet::new();
        let mut seen = Vec::new();
        breadth_first_ordered(&g, 0, &mut index, |visit| {
            seen.push((visit.node.id(), visit.parent));
        });

        assert_eq!(
            seen,
            vec![
                (0, None),
                (1, Some(0)),
                (5, Some(0)),
                (7, Some(0)),
                (9, Some(0)),
                (3, Some(1)),
                (2, Some(5)),
            ]
        );
    }

    #[test]
    fn isolated_node_visits_only_itself() {
        let mut g = Graph::new();
        g.fetch(8);
        assert_eq!(walk(&g, 8), vec![(8, None)]);
    }
}
