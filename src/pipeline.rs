// src/pipeline.rs
//! Publish driver — the orchestrator boundary.
//!
//! Walks a prepared list of documents sequentially and reports one
//! outcome per document. Deciding *what* to publish and building the ADF
//! trees happens upstream; this loop only carries each document through
//! the transport and keeps one failure from aborting the rest.

use crate::api::{endpoints, AttachmentUpload, PublishingClient, RequestExecutor};
use crate::error::AppError;
use crate::types::{ContentId, SpaceKey};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// One document ready to publish: target content, version, ADF tree,
/// and any local files to attach first.
#[derive(Debug, Deserialize)]
pub struct PublishDocument {
    /// Source path, echoed in outcomes for operator-readable reporting.
    #[serde(default)]
    pub source: String,
    pub content_id: String,
    pub title: String,
    /// The version number this update writes (current + 1).
    pub version: u64,
    /// Optional parent to file the page under (hosted variant only).
    #[serde(default)]
    pub ancestor: Option<String>,
    /// Files uploaded as attachments before the content write.
    #[serde(default)]
    pub attachments: Vec<PathBuf>,
    /// The ADF tree produced by the authoring side.
    pub body: Value,
}

/// The result of publishing one document.
#[derive(Debug)]
pub struct PublishOutcome {
    pub source: String,
    pub error: Option<String>,
}

impl PublishOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Publishes every document, sequentially, against one adapter instance.
///
/// Failures are collected per document; the loop always runs to the end.
pub async fn publish_all<E: RequestExecutor>(
    client: &mut PublishingClient<E>,
    space: &SpaceKey,
    documents: Vec<PublishDocument>,
) -> Vec<PublishOutcome> {
    let mut outcomes = Vec::with_capacity(documents.len());
    for document in documents {
        let source = document.source.clone();
        let outcome = match publish_one(client, space, document).await {
            Ok(()) => PublishOutcome {
                source,
                error: None,
            },
            Err(e) => {
                log::warn!("Publishing {:?} failed: {}", source, e);
                PublishOutcome {
                    source,
                    error: Some(e.to_string()),
                }
            }
        };
        outcomes.push(outcome);
    }
    outcomes
}

async fn publish_one<E: RequestExecutor>(
    client: &mut PublishingClient<E>,
    space: &SpaceKey,
    document: PublishDocument,
) -> Result<(), AppError> {
    let content_id = ContentId::parse(&document.content_id)?;
    let ancestor = document
        .ancestor
        .as_deref()
        .map(ContentId::parse)
        .transpose()?;

    // Attachments go first so the content write can resolve their names
    // from the upload responses.
    for path in &document.attachments {
        upload_attachment_file(client, &content_id, path).await?;
    }

    let payload = endpoints::content_update_payload(
        &content_id,
        &document.title,
        space,
        document.version,
        ancestor.as_ref(),
        &document.body,
    );
    client
        .send(endpoints::update_content(&content_id, payload))
        .await?;

    log::info!(
        "Published {:?} to content {} (version {})",
        document.title,
        content_id,
        document.version
    );
    Ok(())
}

async fn upload_attachment_file<E: RequestExecutor>(
    client: &mut PublishingClient<E>,
    parent: &ContentId,
    path: &Path,
) -> Result<(), AppError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            AppError::Validation(format!("attachment path has no file name: {:?}", path))
        })?
        .to_string();
    let content_type = content_type_for(&file_name);

    let upload = AttachmentUpload {
        file_name: file_name.clone(),
        content_type: content_type.to_string(),
        bytes,
        comment: None,
    };
    client
        .send(endpoints::upload_attachment(parent, upload))
        .await?;
    log::debug!("Uploaded attachment {:?} to content {}", file_name, parent);
    Ok(())
}

/// Minimal content-type mapping for the attachment kinds documents carry.
fn content_type_for(file_name: &str) -> &'static str {
    match Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_common_attachment_content_types() {
        assert_eq!(content_type_for("diagram.PNG"), "image/png");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("archive.tar.gz"), "application/octet-stream");
        assert_eq!(content_type_for("noextension"), "application/octet-stream");
    }
}
