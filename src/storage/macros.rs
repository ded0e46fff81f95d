// src/storage/macros.rs
//! Builder for Confluence structured macros.
//!
//! A structured macro is a named, parameterized `ac:` element with an
//! optional rich-text or plain-text body. The builder owns the shape so
//! every macro the codec emits is well-formed and self-contained: name
//! and parameter values escaped, body tags balanced, nothing left open.

use super::escape::{escape_text, plain_text_body};
use indexmap::IndexMap;

/// One structured macro under construction.
///
/// Parameters keep their insertion order so repeated conversion emits
/// byte-identical markup.
pub struct MacroBuilder {
    name: String,
    parameters: IndexMap<String, String>,
    body: MacroBody,
}

enum MacroBody {
    None,
    /// Nested storage markup, already escaped by the renderer.
    RichText(String),
    /// Literal text, wrapped in CDATA and never entity-escaped.
    PlainText(String),
}

impl MacroBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: IndexMap::new(),
            body: MacroBody::None,
        }
    }

    /// Adds a named parameter. The value is entity-escaped on render.
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Adds a parameter only when a value is present.
    pub fn optional_parameter(
        self,
        name: impl Into<String>,
        value: Option<impl Into<String>>,
    ) -> Self {
        match value {
            Some(value) => self.parameter(name, value),
            None => self,
        }
    }

    /// Sets a rich-text body of already-rendered storage markup.
    pub fn rich_text_body(mut self, markup: impl Into<String>) -> Self {
        self.body = MacroBody::RichText(markup.into());
        self
    }

    /// Sets a literal plain-text body, carried in a CDATA section.
    pub fn plain_text_body(mut self, text: impl Into<String>) -> Self {
        self.body = MacroBody::PlainText(text.into());
        self
    }

    /// Renders the macro element.
    pub fn build(self) -> String {
        let mut out = String::with_capacity(64);
        out.push_str("<ac:structured-macro ac:name=\"");
        out.push_str(&escape_text(&self.name));
        out.push_str("\">");

        for (name, value) in &self.parameters {
            out.push_str("<ac:parameter ac:name=\"");
            out.push_str(&escape_text(name));
            out.push_str("\">");
            out.push_str(&escape_text(value));
            out.push_str("</ac:parameter>");
        }

        match self.body {
            MacroBody::None => {}
            MacroBody::RichText(markup) => {
                out.push_str("<ac:rich-text-body>");
                out.push_str(&markup);
                out.push_str("</ac:rich-text-body>");
            }
            MacroBody::PlainText(text) => {
                out.push_str("<ac:plain-text-body>");
                out.push_str(&plain_text_body(&text));
                out.push_str("</ac:plain-text-body>");
            }
        }

        out.push_str("</ac:structured-macro>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_parameterized_macro_with_rich_body() {
        let markup = MacroBuilder::new("panel")
            .parameter("type", "info")
            .rich_text_body("<p>hello</p>")
            .build();
        assert_eq!(
            markup,
            "<ac:structured-macro ac:name=\"panel\">\
             <ac:parameter ac:name=\"type\">info</ac:parameter>\
             <ac:rich-text-body><p>hello</p></ac:rich-text-body>\
             </ac:structured-macro>"
        );
    }

    #[test]
    fn plain_text_body_is_cdata_wrapped() {
        let markup = MacroBuilder::new("code")
            .plain_text_body("let x = a < b;")
            .build();
        assert!(markup.contains("<ac:plain-text-body><![CDATA[let x = a < b;]]></ac:plain-text-body>"));
    }

    #[test]
    fn parameter_values_are_escaped() {
        let markup = MacroBuilder::new("status")
            .parameter("title", "R&D \"phase\"")
            .build();
        assert!(markup.contains("R&amp;D &quot;phase&quot;"));
    }

    #[test]
    fn optional_parameter_is_skipped_when_absent() {
        let markup = MacroBuilder::new("code")
            .optional_parameter("language", None::<String>)
            .plain_text_body("x")
            .build();
        assert!(!markup.contains("ac:parameter"));
    }
}
