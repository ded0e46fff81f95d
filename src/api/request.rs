// src/api/request.rs
//! Transport-level request and response types.
//!
//! One logical API call is one [`ApiRequest`] in and one [`ApiResponse`]
//! out. Requests are plain data and cheap to clone, which is what lets
//! the interceptor re-send an upload during conflict recovery and what
//! makes the adapter testable without a network.

use serde_json::Value;

/// HTTP method of a logical API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// Multipart binary upload for attachment endpoints.
    Attachment(AttachmentUpload),
}

/// One file destined for an attachment endpoint.
///
/// The raw bytes live here rather than in a consumed multipart form so
/// the same upload can be re-sent against a different endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub comment: Option<String>,
}

/// One logical API request: method, site-relative path, payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: RequestBody::Empty,
        }
    }

    pub fn post(path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            body,
        }
    }

    pub fn put(path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: HttpMethod::Put,
            path: path.into(),
            body,
        }
    }
}

/// One logical API response: status plus the raw body text.
///
/// The body stays unparsed at this layer; each consumer knows which
/// shape it expects and parses on demand.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: reqwest::StatusCode,
    pub body: String,
}

impl ApiResponse {
    /// Parses the body as JSON, mapping failure to a malformed-response error.
    #[allow(dead_code)] // exercised via the library surface
    pub fn json(&self) -> Result<Value, crate::error::AppError> {
        serde_json::from_str(&self.body).map_err(|e| {
            crate::error::AppError::MalformedResponse(format!(
                "expected JSON response body: {}",
                e
            ))
        })
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
