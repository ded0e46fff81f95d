// src/attachments.rs
//! Attachment name lookup built from observed API responses.
//!
//! Media nodes frequently reference an attachment by identifier without
//! embedding a filename. Confluence's storage format, however, addresses
//! attachments by filename. The gap is bridged here: every attachment
//! descriptor that passes through the transport is recorded, and the
//! codec consults the resulting map when it needs a name.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Monotonic map from attachment identifier to display filename.
///
/// Keyed by the primary attachment id and, when present and different,
/// the alternate media-services file id. Entries are only ever added —
/// the map lives for one publish session and a stale name is still the
/// name Confluence serves.
#[derive(Debug, Default)]
pub struct AttachmentNames {
    names: HashMap<String, String>,
}

/// One attachment descriptor as it appears in list/upload response bodies.
#[derive(Debug, Deserialize)]
struct AttachmentDescriptor {
    id: String,
    title: String,
    #[serde(default)]
    extensions: DescriptorExtensions,
}

#[derive(Debug, Default, Deserialize)]
struct DescriptorExtensions {
    #[serde(rename = "fileId")]
    file_id: Option<String>,
}

impl AttachmentNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a filename by attachment id or alternate file id.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Record one id → filename pair.
    #[allow(dead_code)] // exercised via the library surface
    pub fn insert(&mut self, id: impl Into<String>, title: impl Into<String>) {
        self.names.insert(id.into(), title.into());
    }

    /// Scan a response body for an attachment-descriptor sequence and
    /// record every id → title pair found.
    ///
    /// Bodies that are not attachment listings are ignored; this is called
    /// on every inbound response, so it must stay cheap and silent on
    /// mismatch. Returns the number of descriptors recorded.
    pub fn record_response_body(&mut self, body: &str) -> usize {
        let Ok(value) = serde_json::from_str::<Value>(body) else {
            return 0;
        };
        let Some(results) = value.get("results").and_then(Value::as_array) else {
            return 0;
        };

        let mut recorded = 0;
        // One malformed descriptor must not discard the rest of the listing.
        for descriptor in results
            .iter()
            .filter_map(|entry| AttachmentDescriptor::deserialize(entry).ok())
        {
            log::debug!(
                "Recorded attachment name {} -> {:?}",
                descriptor.id,
                descriptor.title
            );
            if let Some(file_id) = descriptor.extensions.file_id {
                if file_id != descriptor.id {
                    self.names.insert(file_id, descriptor.title.clone());
                }
            }
            self.names.insert(descriptor.id, descriptor.title);
            recorded += 1;
        }
        recorded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_ids_and_alternate_file_ids() {
        let mut names = AttachmentNames::new();
        let body = r#"{
            "results": [
                {"id": "att123", "title": "diagram.png",
                 "extensions": {"fileId": "f9e8d7c6"}},
                {"id": "att456", "title": "notes.txt"}
            ],
            "size": 2
        }"#;

        assert_eq!(names.record_response_body(body), 2);
        assert_eq!(names.get("att123"), Some("diagram.png"));
        assert_eq!(names.get("f9e8d7c6"), Some("diagram.png"));
        assert_eq!(names.get("att456"), Some("notes.txt"));
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn ignores_non_attachment_bodies() {
        let mut names = AttachmentNames::new();
        assert_eq!(names.record_response_body("not json"), 0);
        assert_eq!(names.record_response_body(r#"{"id": "65537"}"#), 0);
        assert_eq!(
            names.record_response_body(r#"{"results": [{"id": "x"}]}"#),
            0
        );
        assert!(names.is_empty());
    }

    #[test]
    fn entries_are_never_replaced_by_unrelated_scans() {
        let mut names = AttachmentNames::new();
        names.insert("att123", "diagram.png");
        names.record_response_body(r#"{"results": []}"#);
        assert_eq!(names.get("att123"), Some("diagram.png"));
    }
}
