//! Error types shared by every stage of the alignment pipeline.

use thiserror::Error;

/// Result type alias for alignment operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or querying alignment structures.
///
/// All of these are local and recoverable: nothing here indicates a corrupted
/// structure, and construction is deterministic so retrying with unchanged
/// inputs will fail the same way.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller supplied a bad budget, an unknown root/start node, a malformed DAG, etc.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Lookup of a node or hyperedge that is not in the hypergraph.
    #[error("not found: {what}")]
    NotFound { what: String },

    /// Re-insertion of an existing key into a strict hypergraph.
    #[error("duplicate key: {what}")]
    DuplicateKey { what: String },

    /// The derivation enumerator has nothing left to yield.
    #[error("no more derivations")]
    Exhausted,

    /// Hypergraph (de)serialization failed.
    #[cfg(feature = "serde")]
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error while persisting a hypergraph.
    #[cfg(feature = "serde")]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound { what: what.into() }
    }

    pub(crate) fn duplicate(what: impl Into<String>) -> Self {
        Error::DuplicateKey { what: what.into() }
    }

    /// True for the normal end-of-sequence signal of an enumerator.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Error::Exhausted)
    }
}
