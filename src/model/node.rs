use serde::{Deserialize, Serialize};

/// One node of an Atlassian Document Format tree.
///
/// Every variant except `Text` is defined by its kind plus an ordered
/// children sequence; child order is render order. A node whose type is
/// not in this vocabulary parses to `Unknown` and renders children only —
/// conversion never aborts on unrecognized input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AdfNode {
    Doc {
        content: Vec<AdfNode>,
    },
    Paragraph {
        content: Vec<AdfNode>,
    },
    Heading {
        level: u8,
        content: Vec<AdfNode>,
    },
    Text {
        text: String,
        marks: Vec<Mark>,
    },
    HardBreak,
    Rule,
    BulletList {
        content: Vec<AdfNode>,
    },
    OrderedList {
        content: Vec<AdfNode>,
    },
    ListItem {
        content: Vec<AdfNode>,
    },
    Blockquote {
        content: Vec<AdfNode>,
    },
    CodeBlock {
        language: Option<String>,
        content: Vec<AdfNode>,
    },
    Table {
        /// Table width in pixels, when the author resized it.
        width: Option<u32>,
        /// Layout class ("wide", "full-width", ...).
        layout: Option<String>,
        content: Vec<AdfNode>,
    },
    TableRow {
        content: Vec<AdfNode>,
    },
    TableHeader {
        cell: CellAttrs,
        content: Vec<AdfNode>,
    },
    TableCell {
        cell: CellAttrs,
        content: Vec<AdfNode>,
    },
    MediaGroup {
        content: Vec<AdfNode>,
    },
    MediaSingle {
        content: Vec<AdfNode>,
    },
    Media(MediaNode),
    Panel {
        panel_type: Option<String>,
        content: Vec<AdfNode>,
    },
    /// Covers both top-level and nested expands; they render identically.
    Expand {
        title: Option<String>,
        content: Vec<AdfNode>,
    },
    Status {
        text: String,
        color: Option<String>,
    },
    TaskList {
        content: Vec<AdfNode>,
    },
    TaskItem {
        state: Option<String>,
        content: Vec<AdfNode>,
    },
    InlineCard {
        url: String,
    },
    Emoji {
        text: Option<String>,
        short_name: String,
    },
    Mention {
        id: String,
        text: Option<String>,
    },
    Unknown {
        node_type: String,
        content: Vec<AdfNode>,
    },
}

/// A text-level formatting annotation attached to a text node.
///
/// Marks apply outside-in relative to declaration order: the first mark
/// in the sequence becomes the outermost wrapping element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mark {
    Strong,
    Em,
    Code,
    Strike,
    Underline,
    /// Subscript/superscript, selected by the mark's type attribute.
    /// Unknown subtypes pass through unchanged.
    SubSup(String),
    TextColor(String),
    Link(String),
    Unknown(String),
}

/// A media leaf — either URL-addressed or attachment-addressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaNode {
    External {
        url: String,
        width: Option<u32>,
    },
    File {
        /// Primary attachment identifier.
        id: Option<String>,
        /// Alternate file identifier (media-services UUID).
        file_id: Option<String>,
        collection: Option<String>,
        /// Explicit filename, when the authoring tool embedded one.
        filename: Option<String>,
        alt: Option<String>,
        width: Option<u32>,
    },
}

/// Span and styling attributes of a table cell.
///
/// `colspan`/`rowspan` are emitted only when greater than 1.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CellAttrs {
    pub colspan: Option<u32>,
    pub rowspan: Option<u32>,
    pub background: Option<String>,
}

impl AdfNode {
    /// The node's children, empty for leaves.
    pub fn children(&self) -> &[AdfNode] {
        match self {
            AdfNode::Doc { content }
            | AdfNode::Paragraph { content }
            | AdfNode::Heading { content, .. }
            | AdfNode::BulletList { content }
            | AdfNode::OrderedList { content }
            | AdfNode::ListItem { content }
            | AdfNode::Blockquote { content }
            | AdfNode::CodeBlock { content, .. }
            | AdfNode::Table { content, .. }
            | AdfNode::TableRow { content }
            | AdfNode::TableHeader { content, .. }
            | AdfNode::TableCell { content, .. }
            | AdfNode::MediaGroup { content }
            | AdfNode::MediaSingle { content }
            | AdfNode::Panel { content, .. }
            | AdfNode::Expand { content, .. }
            | AdfNode::TaskList { content }
            | AdfNode::TaskItem { content, .. }
            | AdfNode::Unknown { content, .. } => content,
            AdfNode::Text { .. }
            | AdfNode::HardBreak
            | AdfNode::Rule
            | AdfNode::Media(_)
            | AdfNode::Status { .. }
            | AdfNode::InlineCard { .. }
            | AdfNode::Emoji { .. }
            | AdfNode::Mention { .. } => &[],
        }
    }

    /// The wire name of this node's kind.
    #[allow(dead_code)]
    pub fn node_type(&self) -> &str {
        match self {
            AdfNode::Doc { .. } => "doc",
            AdfNode::Paragraph { .. } => "paragraph",
            AdfNode::Heading { .. } => "heading",
            AdfNode::Text { .. } => "text",
            AdfNode::HardBreak => "hardBreak",
            AdfNode::Rule => "rule",
            AdfNode::BulletList { .. } => "bulletList",
            AdfNode::OrderedList { .. } => "orderedList",
            AdfNode::ListItem { .. } => "listItem",
            AdfNode::Blockquote { .. } => "blockquote",
            AdfNode::CodeBlock { .. } => "codeBlock",
            AdfNode::Table { .. } => "table",
            AdfNode::TableRow { .. } => "tableRow",
            AdfNode::TableHeader { .. } => "tableHeader",
            AdfNode::TableCell { .. } => "tableCell",
            AdfNode::MediaGroup { .. } => "mediaGroup",
            AdfNode::MediaSingle { .. } => "mediaSingle",
            AdfNode::Media(_) => "media",
            AdfNode::Panel { .. } => "panel",
            AdfNode::Expand { .. } => "expand",
            AdfNode::Status { .. } => "status",
            AdfNode::TaskList { .. } => "taskList",
            AdfNode::TaskItem { .. } => "taskItem",
            AdfNode::InlineCard { .. } => "inlineCard",
            AdfNode::Emoji { .. } => "emoji",
            AdfNode::Mention { .. } => "mention",
            AdfNode::Unknown { node_type, .. } => node_type,
        }
    }
}
