#![forbid(unsafe_code)]
//! conncomp-core library.
//!
//! Splits an undirected edge list into connected components and removes a
//! bounded number of non-tree edges from each, keeping every component
//! connected.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums at the library boundary, each mapping to
//!   an [`error::ErrorCode`]; `anyhow::Result` for config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).
//!
//! # Typical Usage
//!
//! ```rust,ignore
//! use conncomp_core::{ingest, pipeline, prune::Pruner};
//!
//! let graph = ingest::load_graph(std::io::stdin().lock())?;
//! let reports = pipeline::split_and_prune(graph, 3, &mut Pruner::seeded(42));
//! for report in &reports {
//!     println!("component {} lost {} edges", report.index, report.outcome.removed.len());
//! }
//! ```

pub mod components;
pub mod config;
pub mod emit;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod pipeline;
pub mod prune;
pub mod spanning;
pub mod stats;
pub mod traverse;

pub use components::{component_members, connected_components, is_connected};
pub use error::{ErrorCode, GraphError};
pub use graph::{Edge, Graph, Node, NodeId};
pub use prune::{PruneOutcome, Pruner};
pub use spanning::{SpanningTree, spanning_tree};
