//! Error types for gridjson.

use thiserror::Error;

/// Result type for gridjson operations.
pub type GridResult<T> = Result<T, GridError>;

/// Request-level failures, one variant per error kind reported to callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GridError {
    /// Missing or malformed input.
    #[error("{0}")]
    BadRequest(String),

    /// Missing or incorrect API key.
    #[error("{0}")]
    Unauthorized(String),

    /// An upstream fetch or file parse failed.
    #[error("{0}")]
    ConversionFailed(String),

    /// Request body over the configured size limit.
    #[error("{0}")]
    PayloadTooLarge(String),
}

impl GridError {
    /// Create a bad-request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Create a conversion-failed error.
    pub fn conversion_failed(message: impl Into<String>) -> Self {
        Self::ConversionFailed(message.into())
    }

    /// Create a payload-too-large error.
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::PayloadTooLarge(message.into())
    }

    /// Machine-readable kind, as used in the `error` field of responses.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Unauthorized(_) => "unauthorized",
            Self::ConversionFailed(_) => "conversion_failed",
            Self::PayloadTooLarge(_) => "payload_too_large",
        }
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(m)
            | Self::Unauthorized(m)
            | Self::ConversionFailed(m)
            | Self::PayloadTooLarge(m) => m,
        }
    }
}

/// Failures reported by an upstream spreadsheet service.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Upstream answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Upstream answered with a body we could not read.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<SourceError> for GridError {
    fn from(err: SourceError) -> Self {
        GridError::ConversionFailed(err.to_string())
    }
}

impl From<gridjson_sheet::SheetError> for GridError {
    fn from(err: gridjson_sheet::SheetError) -> Self {
        GridError::ConversionFailed(err.to_string())
    }
}
