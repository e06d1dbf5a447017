//! # Catalog Error Types
//!
//! All errors that can occur while building or querying a catalog.

use thiserror::Error;

/// Errors that can occur in the catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A strict lookup found no entity with this name.
    #[error("not found: {0}")]
    NotFound(String),

    /// Two entries of the same kind share a name.
    #[error("duplicate {kind} name: {name}")]
    DuplicateName {
        /// The kind of entry (resource, craftable, tool, ...).
        kind: &'static str,
        /// The clashing name.
        name: String,
    },

    /// An entry carries values that make crafting arithmetic meaningless.
    #[error("malformed entry {name}: {reason}")]
    MalformedEntry {
        /// The offending entry.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The recipe graph contains a cycle (an item requires itself).
    #[error("recipe cycle detected: {}", .0.join(" -> "))]
    CycleDetected(Vec<String>),

    /// A catalog document could not be parsed.
    #[error("invalid catalog document: {0}")]
    Parse(String),

    /// A catalog document could not be read.
    #[error("cannot read {path}: {message}")]
    Io {
        /// The file path.
        path: String,
        /// The underlying IO error message.
        message: String,
    },
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
