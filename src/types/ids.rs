use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Strong typing for IDs with phantom types.
///
/// Confluence hands out opaque identifiers for several resource kinds
/// (content, attachments, spaces). The phantom marker keeps a page id from
/// ever being passed where an attachment id is expected, at zero runtime
/// cost.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: String,
    _phantom: PhantomData<T>,
}

/// Marker types for different ID kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceMarker;

/// Type aliases for specific ID types
pub type ContentId = Id<ContentMarker>;
#[allow(dead_code)]
pub type AttachmentId = Id<AttachmentMarker>;
#[allow(dead_code)]
pub type SpaceId = Id<SpaceMarker>;

impl<T> Id<T> {
    /// Parse an identifier, rejecting empty or whitespace-bearing input.
    ///
    /// Confluence ids are opaque strings ("65537" for content,
    /// "att65541" for attachments) — no structural validation beyond
    /// non-emptiness is safe to apply.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidId(
                "identifier cannot be empty".to_string(),
            ));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidId(format!(
                "identifier cannot contain whitespace: {:?}",
                input
            )));
        }
        Ok(Self {
            value: trimmed.to_string(),
            _phantom: PhantomData,
        })
    }

    /// Get the ID as a string reference
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Id::parse(&s).map_err(serde::de::Error::custom)
    }
}
