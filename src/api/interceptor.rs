// src/api/interceptor.rs
//! The publishing transport adapter.
//!
//! Sits between endpoint builders and the raw executor, and turns one
//! logical write into whatever the target deployment actually accepts:
//! substitutes storage markup for the embedded ADF tree, normalizes
//! Data Center method/payload differences, records attachment names from
//! every response, and recovers duplicate-filename upload conflicts with
//! a single bounded retry.

use super::endpoints::CONTENT_PATH;
use super::request::{ApiRequest, ApiResponse, HttpMethod, RequestBody};
use super::RequestExecutor;
use crate::attachments::AttachmentNames;
use crate::config::DeploymentVariant;
use crate::constants::ATTACHMENT_LIST_PAGE_SIZE;
use crate::error::{duplicate_attachment_filename, AppError};
use crate::model::parse_document;
use crate::storage::render_document;
use serde_json::{json, Value};

/// Variant-aware publishing client over any request executor.
///
/// Owns the attachment-name cache for the life of one publish session:
/// the cache is written only while handling responses and read only
/// while rewriting outbound writes, so sequential use is all the
/// synchronization it needs.
pub struct PublishingClient<E> {
    executor: E,
    variant: DeploymentVariant,
    site_base: String,
    names: AttachmentNames,
}

impl<E: RequestExecutor> PublishingClient<E> {
    pub fn new(executor: E, variant: DeploymentVariant, site_base: impl Into<String>) -> Self {
        Self {
            executor,
            variant,
            site_base: site_base.into().trim_end_matches('/').to_string(),
            names: AttachmentNames::new(),
        }
    }

    /// The names observed so far this session.
    #[allow(dead_code)] // exercised via the library surface
    pub fn attachment_names(&self) -> &AttachmentNames {
        &self.names
    }

    /// Sends one logical request through the full rewrite/retry pipeline.
    pub async fn send(&mut self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let request = self.substitute_write_payload(request);
        let (request, upload_rewritten) = self.normalize_attachment_upload(request);

        let response = self.dispatch(&request).await?;

        if upload_rewritten && response.status.is_client_error() {
            if let Some(file_name) = duplicate_attachment_filename(&response.body) {
                log::info!(
                    "Attachment upload to {} conflicted with existing {:?}, retrying against its data endpoint",
                    request.path,
                    file_name
                );
                return self.retry_against_existing(&request, &file_name, response).await;
            }
        }

        Self::into_result(&request, response)
    }

    /// Executes a request and records any attachment descriptors the
    /// response carries. All traffic goes through here so the name cache
    /// sees every listing and upload result, whichever path produced it.
    async fn dispatch(&mut self, request: &ApiRequest) -> Result<ApiResponse, AppError> {
        let response = self.executor.execute(request).await?;
        self.names.record_response_body(&response.body);
        Ok(response)
    }

    fn into_result(
        request: &ApiRequest,
        response: ApiResponse,
    ) -> Result<ApiResponse, AppError> {
        if response.is_success() {
            Ok(response)
        } else {
            log::warn!(
                "{} {} failed with status {}",
                request.method,
                request.path,
                response.status
            );
            Err(AppError::from_response(response.status, &response.body))
        }
    }

    /// Outbound step 1 and 2: storage-markup substitution plus
    /// Data Center write normalization.
    fn substitute_write_payload(&self, mut request: ApiRequest) -> ApiRequest {
        let is_content_write =
            request.method == HttpMethod::Put && request.path.starts_with(CONTENT_PATH);
        let RequestBody::Json(payload) = &mut request.body else {
            return request;
        };

        // Data Center must not move pages implicitly; the relocation
        // instruction is dropped whether or not conversion succeeds.
        if is_content_write
            && self.variant.is_data_center()
            && payload.get("ancestors").is_some()
        {
            log::debug!(
                "Removing ancestors from {} for the data-center variant",
                request.path
            );
            if let Some(obj) = payload.as_object_mut() {
                obj.remove("ancestors");
            }
        }

        let Some(tree_text) = payload
            .pointer("/body/atlas_doc_format/value")
            .and_then(Value::as_str)
        else {
            return request;
        };

        match self.convert_tree(tree_text) {
            Ok(markup) => {
                let markup = if self.variant.is_data_center() {
                    rewrite_wiki_links(&markup, &self.site_base)
                } else {
                    markup
                };
                log::debug!(
                    "Substituted storage markup ({} chars) for ADF payload on {}",
                    markup.len(),
                    request.path
                );
                payload["body"] = json!({
                    "storage": {
                        "value": markup,
                        "representation": "storage"
                    }
                });
            }
            Err(e) => {
                // Graceful degradation: the original tree payload is
                // still a valid write on Cloud.
                log::warn!(
                    "ADF conversion failed ({}), sending the original tree payload for {}",
                    e,
                    request.path
                );
            }
        }

        request
    }

    fn convert_tree(&self, tree_text: &str) -> Result<String, AppError> {
        let tree: Value = serde_json::from_str(tree_text)?;
        let document = parse_document(&tree)?;
        Ok(render_document(&document, &self.names))
    }

    /// Outbound step 3: Data Center does not accept create-or-update
    /// PUTs on attachment endpoints. Remembers the rewrite — it is the
    /// precondition for conflict recovery.
    fn normalize_attachment_upload(&self, mut request: ApiRequest) -> (ApiRequest, bool) {
        let is_upload = request.method == HttpMethod::Put
            && request.path.ends_with("/child/attachment")
            && matches!(request.body, RequestBody::Attachment(_));

        if is_upload && self.variant.is_data_center() {
            log::debug!(
                "Rewriting attachment upload {} from PUT to POST for the data-center variant",
                request.path
            );
            request.method = HttpMethod::Post;
            (request, true)
        } else {
            (request, false)
        }
    }

    /// The single conflict-recovery hop: find the attachment whose title
    /// matches the conflicting filename and re-send the upload to its
    /// data endpoint. Anything short of full success propagates the
    /// original conflict error.
    async fn retry_against_existing(
        &mut self,
        upload: &ApiRequest,
        file_name: &str,
        conflict: ApiResponse,
    ) -> Result<ApiResponse, AppError> {
        let original_error = AppError::from_response(conflict.status, &conflict.body);

        let listing = ApiRequest::get(format!(
            "{}?limit={}",
            upload.path, ATTACHMENT_LIST_PAGE_SIZE
        ));
        let listing_response = self.dispatch(&listing).await?;

        let existing_id = listing_response
            .is_success()
            .then(|| find_attachment_id_by_title(&listing_response.body, file_name))
            .flatten();

        let Some(existing_id) = existing_id else {
            log::warn!(
                "No existing attachment titled {:?} found under {}, surfacing the original conflict",
                file_name,
                upload.path
            );
            return Err(original_error);
        };

        let retry = ApiRequest::post(
            format!("{}/{}/data", upload.path, existing_id),
            upload.body.clone(),
        );
        let retry_response = self.dispatch(&retry).await?;

        if retry_response.is_success() {
            log::info!(
                "Replaced binary data of attachment {} for {:?}",
                existing_id,
                file_name
            );
            Ok(retry_response)
        } else {
            log::warn!(
                "Data replacement for attachment {} failed with status {}, surfacing the original conflict",
                existing_id,
                retry_response.status
            );
            Err(original_error)
        }
    }
}

/// Finds the id of the attachment whose title equals `file_name` in an
/// attachment-listing body.
fn find_attachment_id_by_title(body: &str, file_name: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("results")?
        .as_array()?
        .iter()
        .find(|entry| entry.get("title").and_then(Value::as_str) == Some(file_name))
        .and_then(|entry| entry.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Rewrites Cloud-style `/wiki/` hyperlink prefixes to the Data Center
/// URL scheme, for both absolute links into this site and site-relative
/// ones. Links to other hosts are left alone.
fn rewrite_wiki_links(markup: &str, site_base: &str) -> String {
    let absolute_from = format!("href=\"{}/wiki/", site_base);
    let absolute_to = format!("href=\"{}/", site_base);
    markup
        .replace(&absolute_from, &absolute_to)
        .replace("href=\"/wiki/", "href=\"/")
}
