//! Decompose-then-prune pipeline.
//!
//! ## Pipeline
//!
//! ```text
//! Graph
//!    ↓  components::connected_components()
//! [Graph; C]            ordered by smallest node id
//!    ↓  Pruner::remove_random_edges()   (per component)
//! [ComponentReport; C]
//!    ↓  RunSummary::new()
//! RunSummary            serializable totals for `--json`
//! ```
//!
//! Decomposition order is unspecified, so components are sorted by their
//! smallest node id before indexing. Artifact indexes are then a function of
//! the input alone, and with a seeded pruner so is every removed edge.

use std::path::PathBuf;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::components::{connected_components, is_connected};
use crate::graph::{Edge, Graph, NodeId};
use crate::prune::{PruneOutcome, Pruner};
use crate::stats::GraphStats;

/// One pruned component.
#[derive(Debug, Clone)]
pub struct ComponentReport {
    pub index: usize,
    /// The component after pruning.
    pub graph: Graph,
    pub edges_before: usize,
    pub outcome: PruneOutcome,
}

impl ComponentReport {
    /// Smallest node id, which is also the component's sort key.
    #[must_use]
    pub fn anchor(&self) -> Option<NodeId> {
        self.graph.node_ids().min()
    }
}

/// Split `graph` into components and prune up to `per_component` edges from
/// each.
///
/// # Panics
///
/// If a pruned component is no longer connected. That would mean a
/// protected edge was removed, which the pruner never does.
#[instrument(skip(graph, pruner), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn split_and_prune<R: Rng>(
    graph: Graph,
    per_component: usize,
    pruner: &mut Pruner<R>,
) -> Vec<ComponentReport> {
    let mut components = connected_components(graph);
    components.sort_by_key(|component| component.node_ids().min());

    components
        .into_iter()
        .enumerate()
        .map(|(index, mut component)| {
            let edges_before = component.edge_count();
            let outcome = pruner.remove_random_edges(&mut component, per_component);
            assert!(
                is_connected(&component),
                "component {index} disconnected by pruning"
            );
            debug!(
                index,
                nodes = component.node_count(),
                edges_before,
                removed = outcome.removed.len(),
                aborted = outcome.aborted,
                "component pruned"
            );
            ComponentReport {
                index,
                graph: component,
                edges_before,
                outcome,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Per-component entry of a [`RunSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentSummary {
    pub index: usize,
    pub nodes: usize,
    pub edges_before: usize,
    pub edges_after: usize,
    pub removed: Vec<Edge>,
    pub aborted: bool,
    pub samples: usize,
}

impl From<&ComponentReport> for ComponentSummary {
    fn from(report: &ComponentReport) -> Self {
        Self {
            index: report.index,
            nodes: report.graph.node_count(),
            edges_before: report.edges_before,
            edges_after: report.graph.edge_count(),
            removed: report.outcome.removed.clone(),
            aborted: report.outcome.aborted,
            samples: report.outcome.samples,
        }
    }
}

/// Machine-readable account of one `split` run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub input: GraphStats,
    pub requested_per_component: usize,
    pub removed_total: usize,
    pub seed: Option<u64>,
    pub components: Vec<ComponentSummary>,
    pub artifacts: Vec<PathBuf>,
}

impl RunSummary {
    #[must_use]
    pub fn new(
        input: GraphStats,
        requested_per_component: usize,
        seed: Option<u64>,
        reports: &[ComponentReport],
    ) -> Self {
        let components: Vec<ComponentSummary> =
            reports.iter().map(ComponentSummary::from).collect();
        Self {
            input,
            requested_per_component,
            removed_total: components.iter().map(|c| c.removed.len()).sum(),
            seed,
            components,
            artifacts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_artifacts(mut self, artifacts: Vec<PathBuf>) -> Self {
        self.artifacts = artifacts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(pairs: &[(NodeId, NodeId)]) -> Graph {
        Graph::from_edges(pairs.iter().copied()).expect("valid edges")
    }

    #[test]
    fn components_are_indexed_by_smallest_node() {
        let g = graph(&[(40, 41), (7, 8), (8, 9), (1, 50)]);
        let reports = split_and_prune(g, 0, &mut Pruner::seeded(1));

        let anchors: Vec<Option<NodeId>> = reports.iter().map(ComponentReport::anchor).collect();
        assert_eq!(anchors, vec![Some(1), Some(7), Some(40)]);
        let indexes: Vec<usize> = reports.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[test]
    fn zero_request_keeps_every_edge() {
        let g = graph(&[(1, 2), (2, 3), (3, 1)]);
        let reports = split_and_prune(g, 0, &mut Pruner::seeded(1));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].graph.edge_count(), 3);
        assert!(reports[0].outcome.removed.is_empty());
    }

    #[test]
    fn each_component_is_pruned_independently() {
        // Two triangles: one removable edge each.
        let g = graph(&[(1, 2), (2, 3), (3, 1), (10, 11), (11, 12), (12, 10)]);
        let reports = split_and_prune(g, 1, &mut Pruner::seeded(4).with_max_misses(1_000));

        assert_eq!(reports.len(), 2);
        for report in &reports {
            assert_eq!(report.edges_before, 3);
            assert_eq!(report.graph.edge_count(), 2);
            assert_eq!(report.outcome.removed.len(), 1);
        }
    }

    #[test]
    fn summary_totals_match_reports() {
        let g = graph(&[(1, 2), (2, 3), (3, 4), (4, 1), (5, 6)]);
        let stats = GraphStats::from_graph(&g);
        let reports = split_and_prune(g, 2, &mut Pruner::seeded(8).with_max_misses(1_000));
        let summary = RunSummary::new(stats, 2, Some(8), &reports)
            .with_artifacts(vec![PathBuf::from("p_0.csv"), PathBuf::from("p_1.csv")]);

        assert_eq!(summary.removed_total, 1);
        assert_eq!(summary.components.len(), 2);
        assert_eq!(summary.components[0].edges_after, 3);
        assert!(summary.components[0].aborted);

        let json = serde_json::to_value(&summary).expect("serialize");
        assert_eq!(json["removed_total"], 1);
        assert_eq!(json["seed"], 8);
        assert_eq!(json["input"]["component_count"], 2);
        assert_eq!(json["artifacts"][1], "p_1.csv");
    }
}
