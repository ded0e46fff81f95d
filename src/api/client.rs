// src/api/client.rs
//! Pure HTTP client wrapper for the Confluence REST API.
//!
//! This module provides a thin wrapper around reqwest for executing
//! logical API requests. It handles authentication and body encoding
//! (JSON or multipart) without parsing or business logic — everything
//! interesting happens in the interceptor that wraps it.

use super::request::{ApiRequest, ApiResponse, HttpMethod, RequestBody};
use super::RequestExecutor;
use crate::error::AppError;
use crate::types::ApiKey;
use reqwest::{header, multipart, Client};

/// A thin wrapper around a reqwest Client for Confluence API requests.
#[derive(Clone)]
pub struct ConfluenceHttpClient {
    client: Client,
    base_url: String,
    email: String,
    api_key: ApiKey,
}

impl ConfluenceHttpClient {
    /// Creates a new HTTP client for the given site.
    ///
    /// `base_url` is the site root including any Cloud `/wiki` suffix;
    /// credentials are the account email plus API token (Cloud) or a
    /// personal access token with an empty email (Data Center).
    pub fn new(
        base_url: impl Into<String>,
        email: impl Into<String>,
        api_key: ApiKey,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers())
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            email: email.into(),
            api_key,
        })
    }

    fn create_headers() -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl RequestExecutor for ConfluenceHttpClient {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, AppError> {
        let url = self.url_for(&request.path);
        log::debug!("{} {}", request.method, url);

        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        // Cloud authenticates with email + API token over basic auth;
        // an empty email means a personal access token, sent as a bearer.
        let mut builder = if self.email.is_empty() {
            self.client
                .request(method, &url)
                .bearer_auth(self.api_key.as_str())
        } else {
            self.client
                .request(method, &url)
                .basic_auth(&self.email, Some(self.api_key.as_str()))
        };

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(payload) => builder.json(payload),
            RequestBody::Attachment(upload) => {
                let mut part = multipart::Part::bytes(upload.bytes.clone())
                    .file_name(upload.file_name.clone());
                part = part.mime_str(&upload.content_type).map_err(|e| {
                    AppError::Validation(format!(
                        "invalid content type {:?}: {}",
                        upload.content_type, e
                    ))
                })?;

                let mut form = multipart::Form::new().part("file", part);
                if let Some(comment) = &upload.comment {
                    form = form.text("comment", comment.clone());
                }
                form = form.text("minorEdit", "true");

                // Attachment endpoints reject requests without the
                // XSRF opt-out header.
                builder
                    .header("X-Atlassian-Token", "nocheck")
                    .multipart(form)
            }
        };

        let response = builder.send().await.map_err(|e| {
            log::warn!("{} {} transport failure: {}", request.method, request.path, e);
            AppError::NetworkFailure(e)
        })?;

        let status = response.status();
        let body = response.text().await?;
        log::debug!("{} {} -> {}", request.method, request.path, status);

        Ok(ApiResponse { status, body })
    }
}
