//! Error taxonomy surfaced to adapter callers.

use std::fmt;

/// Result alias used by every adapter operation.
pub type DabResult<T> = Result<T, DabError>;

/// Error type for adapter operations.
///
/// Backend faults pass through unchanged except for two normalized cases:
/// a missing-document fault becomes `NotFound`, and the existence check
/// before `create` short-circuits into `Exists` without writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DabError {
    /// No document with the requested id.
    NotFound,
    /// A document with the client-supplied id already exists.
    Exists,
    /// Malformed input, rejected before any backend call.
    InvalidInput(&'static str),
    /// Opaque passthrough of the underlying client's fault.
    Backend(BackendFault),
}

impl fmt::Display for DabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DabError::NotFound => write!(f, "Not found"),
            DabError::Exists => write!(f, "Exists"),
            DabError::InvalidInput(msg) => write!(f, "{}", msg),
            DabError::Backend(fault) => write!(f, "backend error: {}", fault),
        }
    }
}

impl std::error::Error for DabError {}

impl From<BackendFault> for DabError {
    fn from(fault: BackendFault) -> Self {
        DabError::Backend(fault)
    }
}

/// Fault surface of the underlying backend client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendFault {
    /// The backend reported no document at the requested id.
    Missing,
    /// A write collided with an existing document id or version.
    Conflict,
    /// The backend could not be reached.
    Unavailable(String),
    /// The backend rejected the request as malformed.
    Rejected(String),
}

impl fmt::Display for BackendFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendFault::Missing => write!(f, "document missing"),
            BackendFault::Conflict => write!(f, "write conflict"),
            BackendFault::Unavailable(msg) => write!(f, "backend unavailable: {}", msg),
            BackendFault::Rejected(msg) => write!(f, "request rejected: {}", msg),
        }
    }
}

impl std::error::Error for BackendFault {}
