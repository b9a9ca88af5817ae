//! Error types for the repository contract

use crate::value::ScalarKind;

/// Result type for repository reads and value conversions
pub type RepoResult<T> = Result<T, RepositoryError>;

/// Repository error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepositoryError {
    /// Path is not absolute or cannot be normalised
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Stored value cannot be converted to the requested kind
    #[error("Cannot convert '{value}' to {target}")]
    Conversion {
        /// Rendered source value
        value: String,
        /// Requested kind
        target: ScalarKind,
    },
}
