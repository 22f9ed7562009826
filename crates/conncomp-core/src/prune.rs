//! Connectivity-preserving randomized edge removal.
//!
//! # Overview
//!
//! A [`Pruner`] deletes edges chosen uniformly at random, skipping any edge
//! of the spanning tree computed before the first removal. The tree itself is
//! never touched, so the graph stays connected after every single removal
//! without recomputing anything.
//!
//! # Bounded retry
//!
//! Sampling a protected edge counts as a *miss*. After
//! [`DEFAULT_MAX_MISSES`] consecutive misses the batch stops and returns what
//! it removed so far. That is a normal outcome, reported through
//! [`PruneOutcome::aborted`], not an error: it is how a request for more
//! edges than the graph can spare gets answered.
//!
//! # Randomness
//!
//! The pruner owns its generator. [`Pruner::seeded`] makes a run
//! reproducible: the protected tree is a function of the edge set and
//! candidates are drawn from the sorted edge list, so the same seed over the
//! same edges removes the same edges in the same order, however the graph
//! was built.

#![allow(clippy::module_name_repetitions)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, trace};

use crate::graph::{Edge, Graph};
use crate::spanning::{SpanningTree, spanning_tree, verify_spanning_tree};

/// Consecutive protected samples tolerated before a batch gives up.
pub const DEFAULT_MAX_MISSES: u32 = 10;

/// Result of one [`Pruner::remove_random_edges`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneOutcome {
    /// Number of removals asked for.
    pub requested: usize,
    /// Removed edges, in removal order.
    pub removed: Vec<Edge>,
    /// `true` when the batch stopped before reaching `requested`.
    pub aborted: bool,
    /// Number of candidates drawn, hits and misses together.
    pub samples: usize,
}

impl PruneOutcome {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.removed.len() == self.requested
    }
}

/// Randomized remover of non-tree edges.
#[derive(Debug, Clone)]
pub struct Pruner<R> {
    rng: R,
    max_misses: u32,
}

impl Pruner<StdRng> {
    /// A pruner with a reproducible generator.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// A pruner seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Pruner<R> {
    pub const fn new(rng: R) -> Self {
        Self {
            rng,
            max_misses: DEFAULT_MAX_MISSES,
        }
    }

    /// Override the miss threshold. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_misses(mut self, max_misses: u32) -> Self {
        self.max_misses = max_misses.max(1);
        self
    }

    #[must_use]
    pub const fn max_misses(&self) -> u32 {
        self.max_misses
    }

    /// Remove up to `n` edges of `graph` that lie outside its spanning tree.
    ///
    /// The tree is computed once, before any removal. `n == 0` is a no-op.
    pub fn remove_random_edges(&mut self, graph: &mut Graph, n: usize) -> PruneOutcome {
        if n == 0 {
            return PruneOutcome::default();
        }

        let protected = spanning_tree(graph);
        debug_assert_eq!(
            verify_spanning_tree(graph, &protected),
            Ok(()),
            "protected set is not a spanning tree"
        );

        self.prune_outside(graph, n, &protected)
    }

    /// Remove up to `n` edges of `graph` that are not in `protected`.
    ///
    /// Connectivity is preserved only if `protected` spans `graph`; callers
    /// that need the guarantee should use [`Self::remove_random_edges`].
    ///
    /// # Panics
    ///
    /// If a sampled candidate vanished from `graph`, which means the
    /// candidate list and the graph went out of sync.
    pub fn prune_outside(
        &mut self,
        graph: &mut Graph,
        n: usize,
        protected: &SpanningTree,
    ) -> PruneOutcome {
        let mut outcome = PruneOutcome {
            requested: n,
            ..PruneOutcome::default()
        };
        if n == 0 {
            return outcome;
        }

        let mut candidates = graph.sorted_edges();
        let mut misses = 0;

        while outcome.removed.len() < n {
            if candidates.is_empty() || misses >= self.max_misses {
                outcome.aborted = true;
                break;
            }

            let pick = self.rng.gen_range(0..candidates.len());
            let edge = candidates[pick];
            outcome.samples += 1;

            if protected.contains(edge) {
                misses += 1;
                trace!(%edge, misses, "sampled protected edge");
                continue;
            }

            assert!(graph.remove_edge(edge), "candidate {edge} missing from graph");
            candidates.swap_remove(pick);
            misses = 0;
            trace!(%edge, "removed edge");
            outcome.removed.push(edge);
        }

        debug!(
            requested = n,
            removed = outcome.removed.len(),
            samples = outcome.samples,
            aborted = outcome.aborted,
            "pruning finished"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::is_connected;
    use crate::graph::NodeId;

    fn graph(pairs: &[(NodeId, NodeId)]) -> Graph {
        Graph::from_edges(pairs.iter().copied()).expect("valid edges")
    }

    // Hitting the single non-tree edge of a 4-cycle takes a 1-in-4 draw; a
    // high threshold makes "eventually succeeds" certain for any seed.
    const PATIENT: u32 = 1_000;

    fn four_cycle() -> Graph {
        graph(&[(1, 2), (2, 3), (3, 4), (4, 1)])
    }

    #[test]
    fn zero_request_is_a_no_op() {
        let mut g = four_cycle();
        let before = g.clone();
        let outcome = Pruner::seeded(1).remove_random_edges(&mut g, 0);

        assert_eq!(outcome, PruneOutcome::default());
        assert!(outcome.is_complete());
        assert_eq!(g, before);
    }

    #[test]
    fn path_aborts_after_ten_misses() {
        let mut g = graph(&[(1, 2), (2, 3)]);
        let outcome = Pruner::seeded(7).remove_random_edges(&mut g, 1);

        assert!(outcome.removed.is_empty());
        assert!(outcome.aborted);
        assert_eq!(outcome.samples, DEFAULT_MAX_MISSES as usize);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn four_cycle_gives_up_exactly_one_edge() {
        let mut g = four_cycle();
        let outcome = Pruner::seeded(11)
            .with_max_misses(PATIENT)
            .remove_random_edges(&mut g, 1);

        assert_eq!(outcome.removed.len(), 1);
        assert!(!outcome.aborted);
        assert_eq!(g.edge_count(), 3);
        assert!(is_connected(&g));
        g.assert_symmetric();
    }

    #[test]
    fn four_cycle_partial_result_when_asking_for_two() {
        let mut g = four_cycle();
        let outcome = Pruner::seeded(3)
            .with_max_misses(PATIENT)
            .remove_random_edges(&mut g, 2);

        assert_eq!(outcome.removed.len(), 1);
        assert!(outcome.aborted);
        assert!(!outcome.is_complete());
        assert!(is_connected(&g));
    }

    #[test]
    fn edgeless_graph_aborts_without_sampling() {
        let mut g = Graph::new();
        g.fetch(1);
        let outcome = Pruner::seeded(0).remove_random_edges(&mut g, 3);

        assert!(outcome.removed.is_empty());
        assert!(outcome.aborted);
        assert_eq!(outcome.samples, 0);
    }

    #[test]
    fn same_seed_same_removals() {
        let pairs: Vec<(NodeId, NodeId)> = (0..12)
            .flat_map(|a| ((a + 1)..12).map(move |b| (a, b)))
            .collect();
        let mut reversed = pairs.clone();
        reversed.reverse();

        let mut reference = graph(&pairs);
        let expected = Pruner::seeded(99).remove_random_edges(&mut reference, 20);
        assert_eq!(expected.removed.len(), 20);

        // Every build hashes its nodes differently; the removals must not care.
        for round in 0..16 {
            let source = if round % 2 == 0 { &pairs } else { &reversed };
            let mut g = graph(source);
            let outcome = Pruner::seeded(99).remove_random_edges(&mut g, 20);
            assert_eq!(outcome.removed, expected.removed, "round {round}");
            assert_eq!(g, reference, "round {round}");
        }
    }

    #[test]
    fn never_removes_protected_edges() {
        let pairs: Vec<(NodeId, NodeId)> = (0..10)
            .flat_map(|a| ((a + 1)..10).map(move |b| (a, b)))
            .collect();
        let mut g = graph(&pairs);
        let protected = spanning_tree(&g);

        let outcome = Pruner::seeded(5).prune_outside(&mut g, usize::MAX, &protected);

        assert!(outcome.removed.iter().all(|e| !protected.contains(*e)));
        assert!(protected.iter().all(|e| g.contains_edge(e)));
        assert!(g.edge_count() >= protected.len());
        assert!(is_connected(&g));
    }

    #[test]
    fn miss_threshold_is_configurable() {
        let mut g = graph(&[(1, 2), (2, 3)]);
        let mut pruner = Pruner::seeded(2).with_max_misses(3);
        let outcome = pruner.remove_random_edges(&mut g, 5);
        assert_eq!(outcome.samples, 3);

        assert_eq!(Pruner::seeded(2).with_max_misses(0).max_misses(), 1);
    }
}
