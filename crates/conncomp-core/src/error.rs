use std::fmt;

use crate::graph::NodeId;

/// Errors raised at the graph model boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An edge whose endpoints coincide. The graph model only stores simple
    /// undirected graphs.
    #[error("invalid edge: self-loop on node {0}")]
    InvalidEdge(NodeId),
}

impl GraphError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidEdge(_) => ErrorCode::InvalidEdge,
        }
    }
}

/// Machine-readable error codes surfaced by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    MalformedRecord,
    InvalidEdge,
    ConfigParseError,
    InputUnreadable,
    ArtifactWriteFailed,
    GatherInputSkipped,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MalformedRecord => "E1001",
            Self::InvalidEdge => "E1002",
            Self::ConfigParseError => "E2001",
            Self::InputUnreadable => "E5001",
            Self::ArtifactWriteFailed => "E5002",
            Self::GatherInputSkipped => "E5003",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MalformedRecord => "Malformed edge record",
            Self::InvalidEdge => "Self-loop edge rejected",
            Self::ConfigParseError => "Config file parse error",
            Self::InputUnreadable => "Input could not be read",
            Self::ArtifactWriteFailed => "Component artifact write failed",
            Self::GatherInputSkipped => "Gather input skipped",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::MalformedRecord => {
                Some("Each record must be two comma-separated non-negative integers: `from,to`.")
            }
            Self::InvalidEdge => Some("Remove records whose two endpoints are the same node."),
            Self::ConfigParseError => Some("Fix syntax in conncomp.toml and retry."),
            Self::InputUnreadable => Some("Check the input path, or pass `-` to read stdin."),
            Self::ArtifactWriteFailed => Some("Check disk space and write permissions."),
            Self::GatherInputSkipped => Some("Check that every input file exists and is readable."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, GraphError};
    use std::collections::HashSet;

    const ALL: [ErrorCode; 7] = [
        ErrorCode::MalformedRecord,
        ErrorCode::InvalidEdge,
        ErrorCode::ConfigParseError,
        ErrorCode::InputUnreadable,
        ErrorCode::ArtifactWriteFailed,
        ErrorCode::GatherInputSkipped,
        ErrorCode::InternalUnexpected,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let s = code.code();
            assert_eq!(s.len(), 5);
            assert!(s.starts_with('E'));
            assert!(s.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn self_loop_maps_to_invalid_edge_code() {
        let err = GraphError::InvalidEdge(5);
        assert_eq!(err.code(), ErrorCode::InvalidEdge);
        assert_eq!(err.to_string(), "invalid edge: self-loop on node 5");
    }
}
