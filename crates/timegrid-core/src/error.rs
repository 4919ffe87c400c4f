//! Error types for timegrid

use thiserror::Error;

/// Main error type for timegrid operations
#[derive(Debug, Error)]
pub enum TimetableError {
    /// A lesson references a fact index that does not exist.
    #[error("lesson {lesson}: {field} index {index} out of range ({len} known)")]
    DanglingReference {
        lesson: String,
        field: &'static str,
        index: usize,
        len: usize,
    },

    /// Error in the domain model definition (broken lesson invariants,
    /// inconsistent facts).
    #[error("domain model error: {0}")]
    DomainModel(String),

    /// Invalid operation for the current solver state
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Result type alias for timegrid operations
pub type Result<T> = std::result::Result<T, TimetableError>;
