// src/lib.rs
//! adf2confluence library — converts ADF document trees into Confluence
//! storage format and publishes them through a variant-aware transport.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `AppError`, `ConfluenceErrorCode`, `ValidationError`
//! - **Configuration** — `PublishConfig`, `DeploymentVariant`
//! - **Domain model** — `AdfNode`, `Mark`, `MediaNode`, `parse_document`
//! - **Domain types** — `ContentId`, `AttachmentId`, `ApiKey`, `SpaceKey`
//! - **Storage codec** — `render_document`, `MacroBuilder`
//! - **Transport** — `ConfluenceHttpClient`, `PublishingClient`,
//!   `RequestExecutor`, endpoint builders
//! - **Publishing** — `publish_all`, `PublishDocument`, `PublishOutcome`

// Internal modules — must match what's in main.rs
mod api;
mod attachments;
mod config;
mod constants;
mod error;
mod model;
mod pipeline;
mod storage;
mod types;

// --- Error Handling ---
pub use crate::error::{duplicate_attachment_filename, AppError, ConfluenceErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, DeploymentVariant, PublishConfig};

// --- Domain Model ---
pub use crate::model::{parse_document, AdfNode, CellAttrs, Mark, MediaNode};

// --- Domain Types ---
pub use crate::types::{ApiKey, AttachmentId, ContentId, SpaceId, SpaceKey};

// --- Attachment Names ---
pub use crate::attachments::AttachmentNames;

// --- Storage Codec ---
pub use crate::storage::{escape_text, plain_text_body, render_document, MacroBuilder};

// --- Transport ---
pub use crate::api::{
    endpoints, ApiRequest, ApiResponse, AttachmentUpload, ConfluenceHttpClient, HttpMethod,
    PublishingClient, RequestBody, RequestExecutor,
};

// --- Publishing ---
pub use crate::pipeline::{publish_all, PublishDocument, PublishOutcome};
