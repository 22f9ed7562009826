//! Edge-list ingestion.
//!
//! # Format
//!
//! One edge per record, two comma-separated non-negative integers:
//!
//! ```text
//! 1,2
//!  2 , 3
//! 4,5
//! ```
//!
//! Whitespace around fields is insignificant and blank lines are skipped.
//! There is no header row. Any other shape fails the whole ingestion with
//! [`IngestError::MalformedRecord`], naming the raw record and its line, so a
//! run never proceeds on a partially read graph.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

use csv::{ByteRecord, ReaderBuilder, Trim};
use tracing::{info, instrument};

use crate::error::{ErrorCode, GraphError};
use crate::graph::{Graph, NodeId};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Wrong field count, non-integer field, or undecodable bytes.
    #[error("malformed record on line {line}: {record:?}: {reason}")]
    MalformedRecord {
        line: u64,
        record: String,
        reason: String,
    },

    /// A well-formed record naming a self-loop.
    #[error("line {line}: {source}")]
    InvalidEdge {
        line: u64,
        #[source]
        source: GraphError,
    },

    /// The input could not be opened.
    #[error("cannot open edge list {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input failed mid-read.
    #[error("edge list read error: {0}")]
    Io(#[from] io::Error),
}

impl IngestError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedRecord { .. } => ErrorCode::MalformedRecord,
            Self::InvalidEdge { .. } => ErrorCode::InvalidEdge,
            Self::Open { .. } | Self::Io(_) => ErrorCode::InputUnreadable,
        }
    }
}

// ---------------------------------------------------------------------------
// Input source
// ---------------------------------------------------------------------------

/// Where the edge list comes from. `-` means standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    Path(PathBuf),
}

impl InputSource {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == "-" {
            Self::Stdin
        } else {
            Self::Path(PathBuf::from(raw))
        }
    }

    /// Open the source for reading.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Open`] if the file cannot be opened.
    pub fn open(&self) -> Result<Box<dyn Read>, IngestError> {
        match self {
            Self::Stdin => Ok(Box::new(io::stdin().lock())),
            Self::Path(path) => {
                let file = File::open(path).map_err(|source| IngestError::Open {
                    path: path.clone(),
                    source,
                })?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }
}

impl From<&str> for InputSource {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => write!(f, "<stdin>"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// One parsed record and the input line it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
    pub line: u64,
    pub from: NodeId,
    pub to: NodeId,
}

/// Parse every record of `reader`.
///
/// Self-loops are *not* rejected here; that happens at the graph boundary in
/// [`load_graph`].
///
/// # Errors
///
/// Returns [`IngestError::MalformedRecord`] on the first bad record, or
/// [`IngestError::Io`] if the reader fails.
pub fn read_edges<R: Read>(reader: R) -> Result<Vec<EdgeRecord>, IngestError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut raw = ByteRecord::new();
    loop {
        match rdr.read_byte_record(&mut raw) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => return Err(from_csv(err)),
        }
        let line = raw.position().map_or(0, csv::Position::line);
        records.push(parse_record(&raw, line)?);
    }

    Ok(records)
}

/// Parse `reader` and build a [`Graph`] from its records.
///
/// # Errors
///
/// Everything [`read_edges`] returns, plus [`IngestError::InvalidEdge`] for
/// a self-loop record.
#[instrument(skip_all)]
pub fn load_graph<R: Read>(reader: R) -> Result<Graph, IngestError> {
    let records = read_edges(reader)?;
    let mut graph = Graph::new();
    for record in &records {
        graph
            .add_edge(record.from, record.to)
            .map_err(|source| IngestError::InvalidEdge {
                line: record.line,
                source,
            })?;
    }

    info!(
        records = records.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "edge list loaded"
    );
    Ok(graph)
}

fn parse_record(raw: &ByteRecord, line: u64) -> Result<EdgeRecord, IngestError> {
    let malformed = |reason: String| IngestError::MalformedRecord {
        line,
        record: render_raw(raw),
        reason,
    };

    if raw.len() != 2 {
        return Err(malformed(format!("expected 2 fields, found {}", raw.len())));
    }

    let mut ids = [0; 2];
    for (slot, field) in ids.iter_mut().zip(raw.iter()) {
        let text = std::str::from_utf8(field)
            .map_err(|_| malformed("field is not valid UTF-8".to_string()))?;
        *slot = text.trim().parse::<NodeId>().map_err(|_| {
            malformed(format!("field {text:?} is not a non-negative integer"))
        })?;
    }

    Ok(EdgeRecord {
        line,
        from: ids[0],
        to: ids[1],
    })
}

fn render_raw(raw: &ByteRecord) -> String {
    raw.iter()
        .map(String::from_utf8_lossy)
        .collect::<Vec<_>>()
        .join(",")
}

fn from_csv(err: csv::Error) -> IngestError {
    let line = err.position().map_or(0, csv::Position::line);
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => IngestError::Io(source),
        _ => IngestError::MalformedRecord {
            line,
            record: String::new(),
            reason,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
