// src/storage/render.rs
//! Recursive storage-format rendering engine.
//!
//! One rule per node kind, dispatched over the closed [`AdfNode`] union.
//! The renderer is total: it never fails, and a node it does not
//! recognize contributes its children's markup with no wrapping element.

use super::escape::escape_text;
use super::macros::MacroBuilder;
use crate::attachments::AttachmentNames;
use crate::constants::{
    CHARS_PER_NODE_ESTIMATE, HEADING_LEVEL_RANGE, OUTPUT_STRING_INITIAL_CAPACITY,
    TASK_STATE_DONE,
};
use crate::model::{AdfNode, CellAttrs, Mark, MediaNode};
use std::fmt::Write;

/// Converts an ADF tree to storage-format markup.
///
/// Pure over its inputs: re-running on the same tree and the same name
/// lookup yields byte-identical output. Media nodes whose filename cannot
/// be resolved through `names` are omitted rather than emitted as broken
/// references.
pub fn render_document(node: &AdfNode, names: &AttachmentNames) -> String {
    let renderer = StorageRenderer { names };
    let mut out = String::with_capacity(
        OUTPUT_STRING_INITIAL_CAPACITY + node.children().len() * CHARS_PER_NODE_ESTIMATE,
    );
    renderer.render(node, &mut out);
    out
}

struct StorageRenderer<'a> {
    names: &'a AttachmentNames,
}

impl StorageRenderer<'_> {
    fn render(&self, node: &AdfNode, out: &mut String) {
        match node {
            AdfNode::Doc { content } => self.render_children(content, out),

            AdfNode::Paragraph { content } => self.render_wrapped("p", content, out),

            AdfNode::Heading { level, content } => {
                let level = (*level).clamp(*HEADING_LEVEL_RANGE.start(), *HEADING_LEVEL_RANGE.end());
                let tag = format!("h{}", level);
                self.render_wrapped(&tag, content, out);
            }

            AdfNode::Text { text, marks } => {
                out.push_str(&apply_marks(&escape_text(text), marks));
            }

            AdfNode::HardBreak => out.push_str("<br/>"),
            AdfNode::Rule => out.push_str("<hr/>"),

            AdfNode::BulletList { content } => self.render_wrapped("ul", content, out),
            AdfNode::OrderedList { content } => self.render_wrapped("ol", content, out),
            AdfNode::ListItem { content } => self.render_wrapped("li", content, out),
            AdfNode::Blockquote { content } => self.render_wrapped("blockquote", content, out),

            AdfNode::CodeBlock { language, content } => {
                out.push_str(
                    &MacroBuilder::new("code")
                        .optional_parameter("language", language.as_deref())
                        .plain_text_body(literal_text(content))
                        .build(),
                );
            }

            AdfNode::Table {
                width,
                layout,
                content,
            } => {
                out.push_str("<table");
                if let Some(width) = width {
                    let _ = write!(out, " style=\"width: {}px;\"", width);
                }
                if let Some(layout) = layout {
                    let _ = write!(out, " class=\"{}\"", escape_text(layout));
                }
                out.push_str("><tbody>");
                self.render_children(content, out);
                out.push_str("</tbody></table>");
            }

            AdfNode::TableRow { content } => self.render_wrapped("tr", content, out),

            AdfNode::TableHeader { cell, content } => self.render_cell("th", cell, content, out),
            AdfNode::TableCell { cell, content } => self.render_cell("td", cell, content, out),

            // Media wrappers carry layout hints the storage format does not
            // express; only their children matter.
            AdfNode::MediaGroup { content } | AdfNode::MediaSingle { content } => {
                self.render_children(content, out)
            }

            AdfNode::Media(media) => self.render_media(media, out),

            AdfNode::Panel {
                panel_type,
                content,
            } => {
                out.push_str(
                    &MacroBuilder::new("panel")
                        .parameter("type", panel_type.as_deref().unwrap_or("info"))
                        .rich_text_body(self.render_to_string(content))
                        .build(),
                );
            }

            AdfNode::Expand { title, content } => {
                out.push_str(
                    &MacroBuilder::new("expand")
                        .parameter("title", title.as_deref().unwrap_or(""))
                        .rich_text_body(self.render_to_string(content))
                        .build(),
                );
            }

            AdfNode::Status { text, color } => {
                out.push_str(
                    &MacroBuilder::new("status")
                        .parameter("title", text.as_str())
                        .parameter("colour", color.as_deref().unwrap_or("neutral"))
                        .build(),
                );
            }

            AdfNode::TaskList { content } => {
                out.push_str("<ul class=\"inline-task-list\">");
                self.render_children(content, out);
                out.push_str("</ul>");
            }

            AdfNode::TaskItem { state, content } => {
                let status = if state.as_deref() == Some(TASK_STATE_DONE) {
                    "complete"
                } else {
                    "incomplete"
                };
                out.push_str("<li><ac:task><ac:task-status>");
                out.push_str(status);
                out.push_str("</ac:task-status><ac:task-body>");
                self.render_children(content, out);
                out.push_str("</ac:task-body></ac:task></li>");
            }

            AdfNode::InlineCard { url } => {
                let escaped = escape_text(url);
                let _ = write!(out, "<a href=\"{}\">{}</a>", escaped, escaped);
            }

            AdfNode::Emoji { text, short_name } => match text {
                Some(text) => out.push_str(&escape_text(text)),
                None if !short_name.is_empty() => {
                    let _ = write!(out, ":{}:", escape_text(short_name));
                }
                None => {}
            },

            AdfNode::Mention { id, text: _ } => {
                let _ = write!(
                    out,
                    "<ac:link><ri:user ri:account-id=\"{}\"/></ac:link>",
                    escape_text(id)
                );
            }

            AdfNode::Unknown { node_type, content } => {
                log::debug!(
                    "No storage rule for node type {:?}, rendering {} child(ren) only",
                    node_type,
                    content.len()
                );
                self.render_children(content, out);
            }
        }
    }

    fn render_children(&self, children: &[AdfNode], out: &mut String) {
        for child in children {
            self.render(child, out);
        }
    }

    fn render_to_string(&self, children: &[AdfNode]) -> String {
        let mut out = String::with_capacity(children.len() * CHARS_PER_NODE_ESTIMATE);
        self.render_children(children, &mut out);
        out
    }

    fn render_wrapped(&self, tag: &str, children: &[AdfNode], out: &mut String) {
        let _ = write!(out, "<{}>", tag);
        self.render_children(children, out);
        let _ = write!(out, "</{}>", tag);
    }

    fn render_cell(&self, tag: &str, cell: &CellAttrs, children: &[AdfNode], out: &mut String) {
        let _ = write!(out, "<{}", tag);
        // Span attributes are only meaningful above 1; Confluence treats
        // an explicit "1" and an absent attribute differently in diffs.
        if let Some(colspan) = cell.colspan.filter(|span| *span > 1) {
            let _ = write!(out, " colspan=\"{}\"", colspan);
        }
        if let Some(rowspan) = cell.rowspan.filter(|span| *span > 1) {
            let _ = write!(out, " rowspan=\"{}\"", rowspan);
        }
        if let Some(background) = &cell.background {
            let _ = write!(
                out,
                " style=\"background-color: {};\"",
                escape_text(background)
            );
        }
        out.push('>');
        self.render_children(children, out);
        let _ = write!(out, "</{}>", tag);
    }

    fn render_media(&self, media: &MediaNode, out: &mut String) {
        match media {
            MediaNode::External { url, width } => {
                out.push_str("<ac:image");
                if let Some(width) = width {
                    let _ = write!(out, " ac:width=\"{}\"", width);
                }
                let _ = write!(out, "><ri:url ri:value=\"{}\"/></ac:image>", escape_text(url));
            }
            MediaNode::File {
                id,
                file_id,
                collection: _,
                filename,
                alt,
                width,
            } => {
                // Resolution order: embedded filename, alt text, then the
                // observed-name lookup by primary and alternate id.
                let resolved = filename
                    .as_deref()
                    .or(alt.as_deref())
                    .or_else(|| id.as_deref().and_then(|id| self.names.get(id)))
                    .or_else(|| file_id.as_deref().and_then(|id| self.names.get(id)));

                let Some(resolved) = resolved else {
                    // A broken reference macro must never reach the page.
                    log::debug!(
                        "Dropping media node with unresolvable attachment reference (id: {:?})",
                        id
                    );
                    return;
                };

                out.push_str("<ac:image");
                if let Some(width) = width {
                    let _ = write!(out, " ac:width=\"{}\"", width);
                }
                let _ = write!(
                    out,
                    "><ri:attachment ri:filename=\"{}\"/></ac:image>",
                    escape_text(resolved)
                );
            }
        }
    }
}

/// Applies marks innermost-first in reverse declaration order, so the
/// first declared mark ends up outermost.
fn apply_marks(escaped_text: &str, marks: &[Mark]) -> String {
    let mut result = escaped_text.to_string();
    for mark in marks.iter().rev() {
        result = match mark {
            Mark::Strong => format!("<strong>{}</strong>", result),
            Mark::Em => format!("<em>{}</em>", result),
            Mark::Code => format!("<code>{}</code>", result),
            Mark::Strike => format!("<s>{}</s>", result),
            Mark::Underline => format!("<u>{}</u>", result),
            Mark::SubSup(kind) => format!("<{0}>{1}</{0}>", kind, result),
            Mark::TextColor(color) => format!(
                "<span style=\"color: {};\">{}</span>",
                escape_text(color),
                result
            ),
            Mark::Link(href) => {
                format!("<a href=\"{}\">{}</a>", escape_text(href), result)
            }
            Mark::Unknown(kind) => {
                log::debug!("No storage rule for mark type {:?}, leaving text unwrapped", kind);
                result
            }
        };
    }
    result
}

/// The literal concatenated text of a subtree's text leaves.
///
/// Code-block bodies carry raw text; marks and non-text children do not
/// survive into the literal body.
fn literal_text(children: &[AdfNode]) -> String {
    fn collect(nodes: &[AdfNode], out: &mut String) {
        for node in nodes {
            match node {
                AdfNode::Text { text, .. } => out.push_str(text),
                other => collect(other.children(), out),
            }
        }
    }
    let mut text = String::new();
    collect(children, &mut text);
    text
}
