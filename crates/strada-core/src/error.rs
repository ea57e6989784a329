//! Engine error types

use thiserror::Error;

use crate::repository::RepositoryError;

/// Errors surfaced by the autocomplete engine.
///
/// Validation problems (query too short, limit out of range) are recovered
/// locally, returning an empty or clamped result instead of an error, so
/// callers can distinguish "no matches" from "service degraded".
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// No index generation has been published yet, or the last rebuild
    /// failed before publishing one.
    #[error("no index generation available")]
    IndexUnavailable,

    /// The address repository failed while a rebuild was pulling data.
    /// The previously published generation, if any, stays in service.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// The caller cancelled the query during candidate retrieval.
    #[error("query cancelled")]
    Cancelled,
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
