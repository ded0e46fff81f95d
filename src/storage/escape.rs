// src/storage/escape.rs
//! The two escaping regimes of storage format.
//!
//! Plain text and attribute values are entity-escaped; code bodies travel
//! inside CDATA sections and must NOT be re-escaped. Mixing the two up is
//! the dominant source of subtle corruption in storage markup, so both
//! regimes live here and nowhere else.

/// Entity-escapes literal text for element content and attribute values.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wraps literal text in a CDATA section without entity-escaping it.
///
/// A `]]>` inside the text would terminate the section early; the
/// sequence is split across two adjacent sections so the parsed content
/// is byte-identical to the input.
pub fn plain_text_body(text: &str) -> String {
    let mut body = String::with_capacity(text.len() + 24);
    body.push_str("<![CDATA[");
    body.push_str(&text.replace("]]>", "]]]]><![CDATA[>"));
    body.push_str("]]>");
    body
}
