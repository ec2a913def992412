use thiserror::Error;

use crate::graph::NodeId;

/// Convenient result alias for the paretopath library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a graph description contains a malformed or inconsistent record.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Raised when a graph description declares zero nodes.
    #[error("graph declares no nodes")]
    EmptyGraph,

    /// Raised when a node identifier is outside `0..node_count`.
    #[error("node {node} is out of range for a graph of {node_count} nodes")]
    NodeOutOfRange { node: NodeId, node_count: usize },

    /// Raised when a cost vector does not have one value per criterion.
    #[error("cost vector has {found} values but the graph declares {expected} criteria")]
    CostWidthMismatch { expected: usize, found: usize },

    /// Raised when a source row of the path table is written a second time.
    #[error("path table row for source {origin} has already been written")]
    DuplicateWrite { origin: NodeId },

    /// Raised when a single-source search exceeds its label expansion cap.
    #[error("search from source {origin} exceeded the expansion limit of {limit}")]
    ExpansionLimit { origin: NodeId, limit: usize },

    /// Raised when a search is abandoned through its cancellation flag.
    #[error("search from source {origin} was cancelled")]
    Cancelled { origin: NodeId },

    /// Raised when a configuration value is rejected.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Raised when an export file cannot be read back.
    #[error("malformed export on line {line}: {message}")]
    MalformedExport { line: usize, message: String },

    /// Raised when the export sink refuses bytes.
    #[error("failed to write export: {0}")]
    SinkWrite(#[source] std::io::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }

    /// Whether the error aborts the whole run rather than a single source.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::ExpansionLimit { .. } | Error::Cancelled { .. })
    }
}
