// src/model/parse.rs
//! Conversion from raw ADF JSON to the domain node tree.
//!
//! The parser is total over object-shaped input: an unrecognized node
//! type never fails the conversion, it becomes [`AdfNode::Unknown`] with
//! its children parsed as usual. Only a non-object root is an error.

use super::node::{AdfNode, CellAttrs, Mark, MediaNode};
use crate::error::AppError;
use serde_json::Value;

/// Parses a serialized ADF tree into the domain model.
pub fn parse_document(value: &Value) -> Result<AdfNode, AppError> {
    let obj = value.as_object().ok_or_else(|| {
        AppError::MalformedResponse("ADF root must be a JSON object".to_string())
    })?;
    Ok(parse_node(obj))
}

fn parse_node(obj: &serde_json::Map<String, Value>) -> AdfNode {
    let node_type = obj.get("type").and_then(Value::as_str).unwrap_or_default();
    let content = parse_children(obj);

    match node_type {
        "doc" => AdfNode::Doc { content },
        "paragraph" => AdfNode::Paragraph { content },
        "heading" => AdfNode::Heading {
            level: attr_u64(obj, "level").map(|l| l as u8).unwrap_or(1),
            content,
        },
        "text" => AdfNode::Text {
            text: obj
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            marks: parse_marks(obj),
        },
        "hardBreak" => AdfNode::HardBreak,
        "rule" => AdfNode::Rule,
        "bulletList" => AdfNode::BulletList { content },
        "orderedList" => AdfNode::OrderedList { content },
        "listItem" => AdfNode::ListItem { content },
        "blockquote" => AdfNode::Blockquote { content },
        "codeBlock" => AdfNode::CodeBlock {
            language: attr_str(obj, "language"),
            content,
        },
        "table" => AdfNode::Table {
            width: attr_u64(obj, "width").map(|w| w as u32),
            layout: attr_str(obj, "layout"),
            content,
        },
        "tableRow" => AdfNode::TableRow { content },
        "tableHeader" => AdfNode::TableHeader {
            cell: parse_cell_attrs(obj),
            content,
        },
        "tableCell" => AdfNode::TableCell {
            cell: parse_cell_attrs(obj),
            content,
        },
        "mediaGroup" => AdfNode::MediaGroup { content },
        "mediaSingle" => AdfNode::MediaSingle { content },
        "media" => AdfNode::Media(parse_media(obj)),
        "panel" => AdfNode::Panel {
            panel_type: attr_str(obj, "panelType"),
            content,
        },
        "expand" | "nestedExpand" => AdfNode::Expand {
            title: attr_str(obj, "title"),
            content,
        },
        "status" => AdfNode::Status {
            text: attr_str(obj, "text").unwrap_or_default(),
            color: attr_str(obj, "color"),
        },
        "taskList" => AdfNode::TaskList { content },
        "taskItem" => AdfNode::TaskItem {
            state: attr_str(obj, "state"),
            content,
        },
        "inlineCard" => AdfNode::InlineCard {
            url: attr_str(obj, "url").unwrap_or_default(),
        },
        "emoji" => AdfNode::Emoji {
            text: attr_str(obj, "text"),
            short_name: attr_str(obj, "shortName").unwrap_or_default(),
        },
        "mention" => AdfNode::Mention {
            id: attr_str(obj, "id").unwrap_or_default(),
            text: attr_str(obj, "text"),
        },
        other => {
            log::debug!("Unrecognized ADF node type {:?}, keeping children only", other);
            AdfNode::Unknown {
                node_type: other.to_string(),
                content,
            }
        }
    }
}

fn parse_children(obj: &serde_json::Map<String, Value>) -> Vec<AdfNode> {
    let Some(items) = obj.get("content").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item.as_object() {
            Some(child) => Some(parse_node(child)),
            None => {
                log::debug!("Skipping non-object entry in ADF content array");
                None
            }
        })
        .collect()
}

fn parse_marks(obj: &serde_json::Map<String, Value>) -> Vec<Mark> {
    let Some(marks) = obj.get("marks").and_then(Value::as_array) else {
        return Vec::new();
    };
    marks
        .iter()
        .filter_map(Value::as_object)
        .map(|mark| {
            let attrs = mark.get("attrs").and_then(Value::as_object);
            let attr = |key: &str| {
                attrs
                    .and_then(|a| a.get(key))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            };
            match mark.get("type").and_then(Value::as_str).unwrap_or_default() {
                "strong" => Mark::Strong,
                "em" => Mark::Em,
                "code" => Mark::Code,
                "strike" => Mark::Strike,
                "underline" => Mark::Underline,
                "subsup" => Mark::SubSup(attr("type").unwrap_or_else(|| "sub".to_string())),
                "textColor" => Mark::TextColor(attr("color").unwrap_or_default()),
                "link" => Mark::Link(attr("href").unwrap_or_default()),
                other => Mark::Unknown(other.to_string()),
            }
        })
        .collect()
}

fn parse_cell_attrs(obj: &serde_json::Map<String, Value>) -> CellAttrs {
    CellAttrs {
        colspan: attr_u64(obj, "colspan").map(|v| v as u32),
        rowspan: attr_u64(obj, "rowspan").map(|v| v as u32),
        background: attr_str(obj, "background"),
    }
}

fn parse_media(obj: &serde_json::Map<String, Value>) -> MediaNode {
    let width = attr_u64(obj, "width").map(|w| w as u32);
    match attr_str(obj, "type").as_deref() {
        Some("external") => MediaNode::External {
            url: attr_str(obj, "url").unwrap_or_default(),
            width,
        },
        // "file" addressing is the default; "link" media carry the same
        // attachment-style attributes.
        _ => MediaNode::File {
            id: attr_str(obj, "id"),
            file_id: attr_str(obj, "fileId"),
            collection: attr_str(obj, "collection"),
            filename: attr_str(obj, "filename"),
            alt: attr_str(obj, "alt"),
            width,
        },
    }
}

fn attrs<'a>(
    obj: &'a serde_json::Map<String, Value>,
) -> Option<&'a serde_json::Map<String, Value>> {
    obj.get("attrs").and_then(Value::as_object)
}

fn attr_str(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    attrs(obj)?
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn attr_u64(obj: &serde_json::Map<String, Value>, key: &str) -> Option<u64> {
    let value = attrs(obj)?.get(key)?;
    // Authoring tools emit widths both as integers and as floats.
    value
        .as_u64()
        .or_else(|| value.as_f64().map(|f| f.max(0.0) as u64))
}
