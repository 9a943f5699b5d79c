//! Error taxonomy shared by the validator, the orchestrator and the HTTP layer.
//!
//! [`ServiceError`] is a closed set of failure kinds. Each kind has a stable
//! machine-readable [`code`](ServiceError::code) and a fixed human-readable
//! message. Messages are `&'static str` on purpose: nothing in this enum can
//! carry text from an underlying `io::Error` or decoder failure, so detail
//! from the filesystem or the resize engine cannot leak to a client. Those
//! details are logged with `tracing` at the point where they are mapped into
//! a taxonomy value.
//!
//! | Kind | Code | Produced by |
//! |---|---|---|
//! | [`InvalidFilename`](ServiceError::InvalidFilename) | `INVALID_FILENAME` | validator |
//! | [`InvalidDimensions`](ServiceError::InvalidDimensions) | `INVALID_DIMENSIONS` | validator |
//! | [`FileNotFound`](ServiceError::FileNotFound) | `FILE_NOT_FOUND` | orchestrator (source missing) |
//! | [`ReadError`](ServiceError::ReadError) | `READ_ERROR` | orchestrator (cached entry unreadable) |
//! | [`ProcessingError`](ServiceError::ProcessingError) | `PROCESSING_ERROR` | orchestrator (resize or persist failed) |
//! | [`Internal`](ServiceError::Internal) | `INTERNAL_ERROR` | anything else |

use thiserror::Error;

/// Result alias used by the validator and the orchestrator.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidFilename(&'static str),
    #[error("{0}")]
    InvalidDimensions(&'static str),
    #[error("Original file not found")]
    FileNotFound,
    #[error("Error reading cached thumbnail")]
    ReadError,
    #[error("Image processing failed")]
    ProcessingError,
    #[error("Internal server error")]
    Internal,
}

impl ServiceError {
    /// Stable identifier of the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFilename(_) => "INVALID_FILENAME",
            Self::InvalidDimensions(_) => "INVALID_DIMENSIONS",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::ReadError => "READ_ERROR",
            Self::ProcessingError => "PROCESSING_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// True for failures detected before any I/O took place.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidFilename(_) | Self::InvalidDimensions(_))
    }
}
