//! Shared error type across cutline crates.

use thiserror::Error;

/// Stable error codes, suitable for asserting in tests and tagging logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Action without a string `type`, or an envelope without an action payload.
    MalformedAction,
    /// Configuration failed to parse or validate.
    BadConfig,
    /// Unsupported configuration version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MalformedAction => "MALFORMED_ACTION",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CutError>;

/// Unified error type used by core and gate.
#[derive(Debug, Error)]
pub enum CutError {
    #[error("malformed action: {0}")]
    MalformedAction(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl CutError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            CutError::MalformedAction(_) => ErrorCode::MalformedAction,
            CutError::BadConfig(_) => ErrorCode::BadConfig,
            CutError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            CutError::Internal(_) => ErrorCode::Internal,
        }
    }
}
