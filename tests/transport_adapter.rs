//! Behavioral tests for the publishing transport adapter.
//!
//! Every test drives a `PublishingClient` over a scripted executor: the
//! script supplies canned responses in order, and the recorded requests
//! show exactly what would have gone over the wire.

use adf2confluence::{
    endpoints, publish_all, ApiRequest, ApiResponse, AppError, AttachmentUpload, ContentId,
    DeploymentVariant, HttpMethod, PublishDocument, PublishingClient, RequestBody,
    RequestExecutor, SpaceKey,
};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const SITE: &str = "https://example.atlassian.net";

/// Executor that replays a scripted response sequence and records every
/// request it is asked to carry.
#[derive(Clone, Default)]
struct ScriptedExecutor {
    responses: Arc<Mutex<VecDeque<ApiResponse>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl ScriptedExecutor {
    fn new(responses: Vec<(u16, &str)>) -> Self {
        let executor = Self::default();
        let mut queue = executor.responses.lock().unwrap();
        for (status, body) in responses {
            queue.push_back(ApiResponse {
                status: StatusCode::from_u16(status).unwrap(),
                body: body.to_string(),
            });
        }
        drop(queue);
        executor
    }

    fn recorded(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RequestExecutor for ScriptedExecutor {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("script ran out of responses"))
    }
}

fn content_id() -> ContentId {
    ContentId::parse("65537").unwrap()
}

fn update_request_with_tree(adf: &Value, ancestor: Option<&str>) -> ApiRequest {
    let id = content_id();
    let space = SpaceKey::new("DOCS").unwrap();
    let ancestor = ancestor.map(|a| ContentId::parse(a).unwrap());
    let payload =
        endpoints::content_update_payload(&id, "Page", &space, 2, ancestor.as_ref(), adf);
    endpoints::update_content(&id, payload)
}

fn upload_request() -> ApiRequest {
    endpoints::upload_attachment(
        &content_id(),
        AttachmentUpload {
            file_name: "diagram.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
            comment: None,
        },
    )
}

fn sent_json(request: &ApiRequest) -> Value {
    match &request.body {
        RequestBody::Json(payload) => payload.clone(),
        other => panic!("expected JSON body, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Write substitution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn content_write_substitutes_storage_markup_for_tree() {
    let executor = ScriptedExecutor::new(vec![(200, "{}")]);
    let mut client =
        PublishingClient::new(executor.clone(), DeploymentVariant::Cloud, SITE);

    let adf = json!({
        "type": "doc",
        "content": [{"type": "paragraph", "content": [
            {"type": "text", "text": "hello", "marks": [{"type": "strong"}]}
        ]}]
    });
    client
        .send(update_request_with_tree(&adf, None))
        .await
        .unwrap();

    let sent = sent_json(&executor.recorded()[0]);
    assert_eq!(
        sent["body"]["storage"]["value"],
        "<p><strong>hello</strong></p>"
    );
    assert_eq!(sent["body"]["storage"]["representation"], "storage");
    assert!(sent["body"].get("atlas_doc_format").is_none());
}

#[tokio::test]
async fn unparseable_tree_leaves_payload_untouched() {
    let executor = ScriptedExecutor::new(vec![(200, "{}")]);
    let mut client =
        PublishingClient::new(executor.clone(), DeploymentVariant::Cloud, SITE);

    let id = content_id();
    let payload = json!({
        "id": "65537",
        "version": {"number": 2},
        "body": {"atlas_doc_format": {"value": "not valid json{", "representation": "atlas_doc_format"}}
    });
    let result = client.send(endpoints::update_content(&id, payload.clone())).await;

    assert!(result.is_ok());
    assert_eq!(sent_json(&executor.recorded()[0]), payload);
}

#[tokio::test]
async fn non_write_requests_pass_through_unchanged() {
    let executor = ScriptedExecutor::new(vec![(200, "{}")]);
    let mut client =
        PublishingClient::new(executor.clone(), DeploymentVariant::DataCenter, SITE);

    let request = endpoints::get_content(&content_id());
    client.send(request.clone()).await.unwrap();

    assert_eq!(executor.recorded(), vec![request]);
}

// ---------------------------------------------------------------------------
// Deployment-variant normalization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn data_center_strips_ancestors_from_page_updates() {
    let executor = ScriptedExecutor::new(vec![(200, "{}")]);
    let mut client =
        PublishingClient::new(executor.clone(), DeploymentVariant::DataCenter, SITE);

    let adf = json!({"type": "doc", "content": []});
    client
        .send(update_request_with_tree(&adf, Some("99")))
        .await
        .unwrap();

    let sent = sent_json(&executor.recorded()[0]);
    assert!(sent.get("ancestors").is_none());
}

#[tokio::test]
async fn cloud_preserves_ancestors_on_page_updates() {
    let executor = ScriptedExecutor::new(vec![(200, "{}")]);
    let mut client =
        PublishingClient::new(executor.clone(), DeploymentVariant::Cloud, SITE);

    let adf = json!({"type": "doc", "content": []});
    client
        .send(update_request_with_tree(&adf, Some("99")))
        .await
        .unwrap();

    let sent = sent_json(&executor.recorded()[0]);
    assert_eq!(sent["ancestors"][0]["id"], "99");
}

#[tokio::test]
async fn data_center_rewrites_wiki_link_prefixes_in_markup() {
    let executor = ScriptedExecutor::new(vec![(200, "{}")]);
    let mut client =
        PublishingClient::new(executor.clone(), DeploymentVariant::DataCenter, SITE);

    let adf = json!({
        "type": "doc",
        "content": [{"type": "paragraph", "content": [{
            "type": "text",
            "text": "see page",
            "marks": [{"type": "link", "attrs": {
                "href": format!("{}/wiki/spaces/DOCS/pages/1", SITE)
            }}]
        }]}]
    });
    client
        .send(update_request_with_tree(&adf, None))
        .await
        .unwrap();

    let sent = sent_json(&executor.recorded()[0]);
    let markup = sent["body"]["storage"]["value"].as_str().unwrap();
    assert!(markup.contains(&format!("href=\"{}/spaces/DOCS/pages/1\"", SITE)));
    assert!(!markup.contains("/wiki/"));
}

#[tokio::test]
async fn data_center_rewrites_attachment_upload_to_post() {
    let executor = ScriptedExecutor::new(vec![(200, r#"{"results": []}"#)]);
    let mut client =
        PublishingClient::new(executor.clone(), DeploymentVariant::DataCenter, SITE);

    client.send(upload_request()).await.unwrap();

    let recorded = executor.recorded();
    assert_eq!(recorded[0].method, HttpMethod::Post);
    assert!(recorded[0].path.ends_with("/child/attachment"));
}

#[tokio::test]
async fn cloud_keeps_put_for_attachment_upload() {
    let executor = ScriptedExecutor::new(vec![(200, r#"{"results": []}"#)]);
    let mut client =
        PublishingClient::new(executor.clone(), DeploymentVariant::Cloud, SITE);

    client.send(upload_request()).await.unwrap();

    assert_eq!(executor.recorded()[0].method, HttpMethod::Put);
}

// ---------------------------------------------------------------------------
// Attachment name cache
// ---------------------------------------------------------------------------

#[tokio::test]
async fn responses_populate_the_attachment_name_cache() {
    let executor = ScriptedExecutor::new(vec![(
        200,
        r#"{"results": [
            {"id": "att123", "title": "diagram.png", "extensions": {"fileId": "f9e8"}},
            {"id": "att456", "title": "notes.txt"}
        ]}"#,
    )]);
    let mut client =
        PublishingClient::new(executor.clone(), DeploymentVariant::Cloud, SITE);

    client
        .send(endpoints::list_attachments(&content_id()))
        .await
        .unwrap();

    let names = client.attachment_names();
    assert_eq!(names.get("att123"), Some("diagram.png"));
    assert_eq!(names.get("f9e8"), Some("diagram.png"));
    assert_eq!(names.get("att456"), Some("notes.txt"));
}

#[tokio::test]
async fn cached_names_resolve_media_in_later_writes() {
    let executor = ScriptedExecutor::new(vec![
        (
            200,
            r#"{"results": [{"id": "att123", "title": "diagram.png"}]}"#,
        ),
        (200, "{}"),
    ]);
    let mut client =
        PublishingClient::new(executor.clone(), DeploymentVariant::Cloud, SITE);

    client.send(upload_request()).await.unwrap();

    let adf = json!({
        "type": "doc",
        "content": [{"type": "mediaSingle", "content": [{
            "type": "media",
            "attrs": {"type": "file", "id": "att123", "collection": "contentId-65537"}
        }]}]
    });
    client
        .send(update_request_with_tree(&adf, None))
        .await
        .unwrap();

    let sent = sent_json(&executor.recorded()[1]);
    let markup = sent["body"]["storage"]["value"].as_str().unwrap();
    assert_eq!(
        markup,
        "<ac:image><ri:attachment ri:filename=\"diagram.png\"/></ac:image>"
    );
}

// ---------------------------------------------------------------------------
// Duplicate-name conflict retry
// ---------------------------------------------------------------------------

const DUPLICATE_BODY: &str = r#"{"statusCode":400,"message":"Cannot add a new attachment with same file name as an existing attachment: diagram.png"}"#;

#[tokio::test]
async fn duplicate_conflict_retries_against_existing_attachment() {
    let executor = ScriptedExecutor::new(vec![
        (400, DUPLICATE_BODY),
        (
            200,
            r#"{"results": [
                {"id": "998", "title": "other.png"},
                {"id": "999", "title": "diagram.png"}
            ]}"#,
        ),
        (200, r#"{"id": "999", "title": "diagram.png"}"#),
    ]);
    let mut client =
        PublishingClient::new(executor.clone(), DeploymentVariant::DataCenter, SITE);

    let response = client.send(upload_request()).await.unwrap();
    assert!(response.is_success());

    let recorded = executor.recorded();
    assert_eq!(recorded.len(), 3);

    assert_eq!(recorded[0].method, HttpMethod::Post);
    assert_eq!(recorded[0].path, "/rest/api/content/65537/child/attachment");

    assert_eq!(recorded[1].method, HttpMethod::Get);
    assert!(recorded[1]
        .path
        .starts_with("/rest/api/content/65537/child/attachment?limit="));

    assert_eq!(recorded[2].method, HttpMethod::Post);
    assert_eq!(
        recorded[2].path,
        "/rest/api/content/65537/child/attachment/999/data"
    );
    // The retry re-sends the same multipart payload.
    assert_eq!(recorded[2].body, recorded[0].body);
}

#[tokio::test]
async fn conflict_without_matching_attachment_surfaces_original_error() {
    let executor = ScriptedExecutor::new(vec![
        (400, DUPLICATE_BODY),
        (200, r#"{"results": [{"id": "998", "title": "other.png"}]}"#),
    ]);
    let mut client =
        PublishingClient::new(executor.clone(), DeploymentVariant::DataCenter, SITE);

    let error = client.send(upload_request()).await.unwrap_err();
    match error {
        AppError::ConfluenceService { status, .. } => {
            assert_eq!(status, StatusCode::BAD_REQUEST)
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // Upload, listing — and no further attempts.
    assert_eq!(executor.recorded().len(), 2);
}

#[tokio::test]
async fn failed_retry_surfaces_original_conflict_exactly_once() {
    let executor = ScriptedExecutor::new(vec![
        (400, DUPLICATE_BODY),
        (
            200,
            r#"{"results": [{"id": "999", "title": "diagram.png"}]}"#,
        ),
        (500, "upstream exploded"),
    ]);
    let mut client =
        PublishingClient::new(executor.clone(), DeploymentVariant::DataCenter, SITE);

    let error = client.send(upload_request()).await.unwrap_err();
    match error {
        AppError::ConfluenceService { status, .. } => {
            assert_eq!(status, StatusCode::BAD_REQUEST)
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(executor.recorded().len(), 3);
}

#[tokio::test]
async fn cloud_duplicate_conflict_is_not_retried() {
    let executor = ScriptedExecutor::new(vec![(400, DUPLICATE_BODY)]);
    let mut client =
        PublishingClient::new(executor.clone(), DeploymentVariant::Cloud, SITE);

    let error = client.send(upload_request()).await.unwrap_err();
    assert!(matches!(error, AppError::ConfluenceService { .. }));
    assert_eq!(executor.recorded().len(), 1);
}

// ---------------------------------------------------------------------------
// Error surfacing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn one_failing_document_does_not_abort_the_rest() {
    let executor = ScriptedExecutor::new(vec![
        (404, "no such content"),
        (200, "{}"),
    ]);
    let mut client =
        PublishingClient::new(executor.clone(), DeploymentVariant::Cloud, SITE);
    let space = SpaceKey::new("DOCS").unwrap();

    let documents = vec![
        PublishDocument {
            source: "notes/missing.md".to_string(),
            content_id: "404404".to_string(),
            title: "Missing".to_string(),
            version: 2,
            ancestor: None,
            attachments: Vec::new(),
            body: json!({"type": "doc", "content": []}),
        },
        PublishDocument {
            source: "notes/ok.md".to_string(),
            content_id: "65537".to_string(),
            title: "Fine".to_string(),
            version: 3,
            ancestor: None,
            attachments: Vec::new(),
            body: json!({"type": "doc", "content": []}),
        },
    ];

    let outcomes = publish_all(&mut client, &space, documents).await;

    assert_eq!(outcomes.len(), 2);
    assert!(!outcomes[0].succeeded());
    assert_eq!(outcomes[0].source, "notes/missing.md");
    assert!(outcomes[0].error.as_deref().unwrap().contains("not_found"));
    assert!(outcomes[1].succeeded());
    assert_eq!(executor.recorded().len(), 2);
}

#[tokio::test]
async fn non_retryable_http_errors_carry_status_and_body_preview() {
    let executor = ScriptedExecutor::new(vec![(404, "no such content")]);
    let mut client =
        PublishingClient::new(executor.clone(), DeploymentVariant::Cloud, SITE);

    let error = client
        .send(endpoints::get_content(&content_id()))
        .await
        .unwrap_err();
    match error {
        AppError::ConfluenceService {
            status,
            body_preview,
            ..
        } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body_preview, "no such content");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
