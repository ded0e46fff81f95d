// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! Each error variant tells the story of what went wrong and where,
//! enabling composable recovery strategies.

use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

/// Confluence API error conditions as a typed vocabulary.
///
/// Instead of matching against raw status codes at every call site,
/// the domain vocabulary is encoded in the type system. Each variant
/// tells you exactly what the Confluence API reported and enables
/// pattern-based recovery without stringly-typed dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfluenceErrorCode {
    /// Request body failed Confluence's validation
    BadRequest,
    /// Credentials are invalid or expired
    Unauthorized,
    /// Credentials lack permission for this resource
    Forbidden,
    /// The requested content does not exist or is inaccessible
    NotFound,
    /// Version conflict with the current state of the content
    Conflict,
    /// API rate limit exceeded
    RateLimited,
    /// Confluence internal server error
    InternalError,
    /// Confluence is temporarily unavailable
    ServiceUnavailable,
    /// Any other HTTP status
    HttpStatus(u16),
}

impl ConfluenceErrorCode {
    /// Classify an HTTP status code into the typed vocabulary.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            429 => Self::RateLimited,
            500 => Self::InternalError,
            503 => Self::ServiceUnavailable,
            other => Self::HttpStatus(other),
        }
    }

    /// Whether this error is transient and worth retrying.
    #[allow(dead_code)]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServiceUnavailable | Self::InternalError
        )
    }

    /// Whether this error means the resource simply doesn't exist.
    #[allow(dead_code)]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl fmt::Display for ConfluenceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest => write!(f, "bad_request"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::RateLimited => write!(f, "rate_limited"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Confluence API returned an error ({code}): {body_preview}")]
    ConfluenceService {
        code: ConfluenceErrorCode,
        status: reqwest::StatusCode,
        body_preview: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("JSON parse error for {path}: {source}")]
    JsonParseError {
        path: std::path::PathBuf,
        source: serde_json::Error,
    },

    #[error("Publishing failed for {} document(s): {}", failures.len(), failures.join(", "))]
    PublishFailed { failures: Vec<String> },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Build a service error from a raw status code and response body.
    ///
    /// The body is truncated so a multi-kilobyte HTML error page never
    /// floods logs or terminal output.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let preview: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        AppError::ConfluenceService {
            code: ConfluenceErrorCode::from_http_status(status.as_u16()),
            status,
            body_preview: preview,
        }
    }
}

// Allow converting from anyhow::Error, preserving error chain
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError {
            message: err.to_string(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// The message Confluence Data Center emits when an attachment create
/// collides with an existing filename. The phrasing is an upstream
/// contract not owned by this crate — the match is best-effort, and an
/// unmatched body simply means no retry is attempted.
static DUPLICATE_ATTACHMENT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"same file name as an existing attachment:\s*(?P<name>[^\r\n\\\x22]+)")
        .expect("duplicate-attachment pattern is valid")
});

/// Extracts the conflicting filename from a duplicate-attachment error body.
///
/// Returns `None` when the body does not describe a duplicate-filename
/// conflict. Works on both raw and JSON-wrapped message bodies since the
/// pattern matches the message substring wherever it appears.
pub fn duplicate_attachment_filename(body: &str) -> Option<String> {
    DUPLICATE_ATTACHMENT_PATTERN
        .captures(body)
        .map(|caps| caps["name"].trim().to_string())
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
