use thiserror::Error;

use crate::status::Status;

/// The crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The crate-wide error type.
///
/// The taxonomy is flat on purpose: every failure is terminal at the call site and maps onto one
/// of the host-facing [`Status`] codes. This is kept separate from `anyhow` so downstream
/// libraries aren't forced to adopt `anyhow` in their own public APIs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// An operation that needs an active decoder ran before a successful initialization.
    #[error("decoder is not initialized")]
    NotInitialized,

    /// A configuration value fell outside its legal set, or a buffer did not match the
    /// decoder's frame geometry.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The engine's working memory could not be allocated.
    #[error("failed to allocate {bytes} bytes of decoder memory")]
    Memory { bytes: usize },

    /// The codec engine rejected construction or returned an invalid result.
    #[error("codec engine error: {0}")]
    Internal(String),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameters(message.into())
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// The host-facing status code for this error.
    pub fn status(&self) -> Status {
        match self {
            Self::NotInitialized => Status::NotInitialized,
            Self::InvalidParameters(_) => Status::InvalidParameters,
            Self::Memory { .. } => Status::MemoryError,
            Self::Internal(_) => Status::InternalError,
        }
    }
}
