// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use std::fmt;

/// API token for Confluence authentication.
///
/// Paired with the account email for basic authentication against Cloud
/// sites, or used as a personal access token on Data Center installs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new API token with validation
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();

        if key.trim().is_empty() {
            return Err(ValidationError::InvalidApiToken {
                reason: "API token cannot be empty".to_string(),
            });
        }

        if key.len() < 8 {
            return Err(ValidationError::InvalidApiToken {
                reason: "API token is too short".to_string(),
            });
        }

        Ok(Self(key))
    }

    /// Get the API token as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact the token in display output
        write!(f, "{}...", &self.0[..4.min(self.0.len())])
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tokens must never leak through Debug-formatted logs
        write!(f, "ApiKey(\"{}...\")", &self.0[..4.min(self.0.len())])
    }
}

/// A Confluence space key ("DOCS", "ENG", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpaceKey(String);

impl SpaceKey {
    /// Create a validated space key.
    ///
    /// Space keys are short alphanumeric identifiers chosen at space
    /// creation; Confluence itself rejects anything else.
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();

        if key.is_empty() {
            return Err(ValidationError::EmptyField("space key"));
        }

        if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '~') {
            return Err(ValidationError::InvalidSpaceKey {
                key: key.clone(),
                reason: "space keys are alphanumeric (personal spaces start with '~')"
                    .to_string(),
            });
        }

        Ok(Self(key))
    }

    /// Get the space key as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
