//! `conncomp split`: decompose an edge list and prune every component.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use conncomp_core::config::{Overrides, load_config};
use conncomp_core::emit::write_components;
use conncomp_core::ingest::{InputSource, load_graph};
use conncomp_core::pipeline::{RunSummary, split_and_prune};
use conncomp_core::stats::GraphStats;
use conncomp_core::{Edge, Pruner};
use tracing::info;

use crate::output::{OutputMode, render};

/// Arguments for `conncomp split`.
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Edge list to read, `-` for stdin.
    #[arg(short, long, default_value = "-", value_name = "PATH")]
    pub graph: String,

    /// Edges to remove from each component.
    #[arg(short, long, default_value_t = 0, value_name = "N")]
    pub remove: usize,

    /// Artifact base name; component `i` goes to `<BASE>_<i>.csv`.
    #[arg(short = 'o', long = "output", value_name = "BASE")]
    pub output: Option<PathBuf>,

    /// Seed for a reproducible run.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Consecutive protected samples before a component gives up.
    #[arg(long, value_name = "M")]
    pub max_misses: Option<u32>,
}

impl SplitArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            max_misses: self.max_misses,
            seed: self.seed,
            base: self.output.clone(),
        }
    }
}

/// Execute `conncomp split`.
pub fn run_split(args: &SplitArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let config = load_config(project_root)?.with_overrides(&args.overrides());

    let source = InputSource::parse(&args.graph);
    let graph = source
        .open()
        .and_then(load_graph)
        .with_context(|| format!("loading {source}"))?;
    let input = GraphStats::from_graph(&graph);

    let seed = config.prune.seed;
    let mut pruner = seed
        .map_or_else(Pruner::from_entropy, Pruner::seeded)
        .with_max_misses(config.prune.max_misses);
    let reports = split_and_prune(graph, args.remove, &mut pruner);

    for report in reports.iter().filter(|r| r.outcome.aborted) {
        info!(
            index = report.index,
            removed = report.outcome.removed.len(),
            requested = args.remove,
            "component ran out of removable edges"
        );
    }

    let base = project_root.join(&config.output.base);
    let edge_lists: Vec<Vec<Edge>> = reports.iter().map(|r| r.graph.sorted_edges()).collect();
    let artifacts = write_components(&base, &edge_lists)?;
    info!(count = artifacts.len(), base = %base.display(), "artifacts written");

    // Human mode stays quiet on success; the artifacts are the result.
    let summary = RunSummary::new(input, args.remove, seed, &reports).with_artifacts(artifacts);
    render(output, &summary, |_, _| Ok(()))
}
