//! Shared error type across metaperf crates.

use thiserror::Error;

/// Stable error classification, independent of the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Call-order violation by the embedding runtime.
    ProgrammingError,
    /// The counter registry ran out of slots.
    ResourceExhausted,
    /// Invalid configuration input.
    BadConfig,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs and tests.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ProgrammingError => "PROGRAMMING_ERROR",
            ErrorKind::ResourceExhausted => "RESOURCE_EXHAUSTED",
            ErrorKind::BadConfig => "BAD_CONFIG",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetaperfError>;

/// Unified error type used by core and counters.
#[derive(Debug, Error)]
pub enum MetaperfError {
    #[error("counters for namespace `{0}` are already initialized")]
    AlreadyInitialized(String),
    #[error("counters for namespace `{0}` are not initialized")]
    NotInitialized(String),
    #[error("perf data registry exhausted ({capacity} entries) while creating `{name}`")]
    RegistryExhausted { name: String, capacity: usize },
    #[error("perf counter `{0}` already exists")]
    DuplicateCounter(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl MetaperfError {
    /// Map the error to its stable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MetaperfError::AlreadyInitialized(_)
            | MetaperfError::NotInitialized(_)
            | MetaperfError::DuplicateCounter(_) => ErrorKind::ProgrammingError,
            MetaperfError::RegistryExhausted { .. } => ErrorKind::ResourceExhausted,
            MetaperfError::BadConfig(_) | MetaperfError::UnsupportedVersion => ErrorKind::BadConfig,
            MetaperfError::Internal(_) => ErrorKind::Internal,
        }
    }
}
