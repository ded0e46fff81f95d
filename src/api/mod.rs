// src/api/mod.rs
//! Confluence API interaction — transport, interception, and endpoints.
//!
//! The module is layered: [`client::ConfluenceHttpClient`] executes one
//! request with no business logic; [`interceptor::PublishingClient`]
//! wraps any executor and applies the publish-time rewriting rules;
//! [`endpoints`] builds the requests both of them carry. Business logic
//! depends on the [`RequestExecutor`] trait, never on HTTP details.

pub mod client;
pub mod endpoints;
pub mod interceptor;
pub mod request;

use crate::error::AppError;
pub use request::{ApiRequest, ApiResponse};

/// The ability to execute one logical API request.
///
/// This is the composition seam between the transport adapter and the
/// underlying HTTP machinery: the adapter holds a value of this trait
/// instead of subclassing a client.
#[async_trait::async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, AppError>;
}

// Re-export the public interface
pub use client::ConfluenceHttpClient;
pub use interceptor::PublishingClient;
pub use request::{AttachmentUpload, HttpMethod, RequestBody};
