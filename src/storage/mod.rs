// src/storage/mod.rs
//! Conversion from ADF trees to Confluence storage format.
//!
//! Storage format is an XHTML dialect extended with `ac:` structured
//! macros. The renderer is pure: no I/O, no mutable shared state beyond
//! the attachment-name lookup passed in by the caller.

mod escape;
mod macros;
mod render;

pub use escape::{escape_text, plain_text_body};
pub use macros::MacroBuilder;
pub use render::render_document;
