// src/error.rs
//! Application error types with structured error handling.
//!
//! Each variant names a failure a caller can act on. Transient conditions
//! inside the retry loop never surface here; they are absorbed by the
//! fetcher and show up as an empty snapshot instead.

use crate::types::BlockId;
use std::fmt;
use thiserror::Error;

/// Error codes reported by the private API, as a typed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// Too many requests; back off and retry
    RateLimited,
    /// The session cookie is missing, invalid or expired
    Unauthorized,
    /// The session lacks permission for this block
    Forbidden,
    /// Request body failed the service's validation
    ValidationFailed,
    /// Internal server error
    InternalError,
    /// The service is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// A `name` this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse the `name` field of an error body into the typed vocabulary.
    pub fn from_api_response(name: &str) -> Self {
        match name {
            "RateLimitedError" | "rate_limited" => Self::RateLimited,
            "UnauthorizedError" | "unauthorized" => Self::Unauthorized,
            "ForbiddenError" | "restricted_resource" => Self::Forbidden,
            "ValidationError" | "validation_error" => Self::ValidationFailed,
            "InternalServerError" | "internal_server_error" => Self::InternalError,
            "ServiceUnavailableError" | "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            429 => Self::RateLimited,
            500 => Self::InternalError,
            502..=504 => Self::ServiceUnavailable,
            other => Self::HttpStatus(other),
        }
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServiceUnavailable | Self::InternalError
        ) || matches!(self, Self::HttpStatus(status) if *status == 408 || *status >= 500)
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),

    #[error("The URL or ID passed to get_page must be that of a Page Block: {id} is a '{actual_type}' block")]
    NotAPage { id: BlockId, actual_type: String },

    #[error("Block {id} is unavailable after {attempts} attempts")]
    Unavailable { id: BlockId, attempts: u32 },

    #[error("Block {id} is missing from the record map returned by the service")]
    MissingRecord { id: BlockId },

    #[error("Fetching block {id} was cancelled")]
    Cancelled { id: BlockId },

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion returned an error ({code}, HTTP {status}): {message}")]
    NotionService {
        code: NotionErrorCode,
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AppError {
    /// Whether the failure is worth another attempt inside the retry loop.
    ///
    /// Identifier and page-type violations are caller mistakes and are never
    /// retried.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::NetworkFailure(_) | AppError::MalformedResponse(_) => true,
            AppError::NotionService { code, .. } => code.is_retryable(),
            _ => false,
        }
    }

    /// True when the caller supplied something that is not a block id or URL.
    pub fn is_invalid_identifier(&self) -> bool {
        matches!(
            self,
            AppError::Validation(crate::types::ValidationError::InvalidIdentifier { .. })
        )
    }
}

// Allow converting from anyhow::Error, preserving error chain
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError {
            message: err.to_string(),
            source: Some(err.into()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
