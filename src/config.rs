// src/config.rs
use crate::constants::CLOUD_PATH_SUFFIX;
use crate::error::AppError;
use crate::types::{ApiKey, SpaceKey};
use clap::Parser;
use std::path::PathBuf;
use url::Url;

/// The two backend flavors of Confluence this crate publishes to.
///
/// They expose the same REST resources but differ in supported HTTP
/// verbs and URL structure; the interceptor consults this value at every
/// rewrite decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentVariant {
    /// Hosted (`*.atlassian.net/wiki`) — accepts create-or-update
    /// attachment PUTs and implicit page moves via ancestors.
    Cloud,
    /// Self-hosted Server/Data Center — attachment create is POST-only
    /// and pages must not be moved implicitly.
    DataCenter,
}

impl DeploymentVariant {
    /// Detects the variant from the configured site URL.
    ///
    /// The `/wiki` path suffix is the configured signal for a Cloud site;
    /// everything else is treated as self-hosted.
    pub fn from_base_url(url: &Url) -> Self {
        if url.path().trim_end_matches('/').ends_with(CLOUD_PATH_SUFFIX) {
            Self::Cloud
        } else {
            Self::DataCenter
        }
    }

    pub fn is_data_center(&self) -> bool {
        matches!(self, Self::DataCenter)
    }
}

impl std::fmt::Display for DeploymentVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cloud => write!(f, "cloud"),
            Self::DataCenter => write!(f, "data-center"),
        }
    }
}

/// Parsed and validated command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Confluence site URL (e.g. "https://example.atlassian.net/wiki")
    #[arg(long)]
    pub base_url: String,

    /// Account email for basic authentication (empty for personal access tokens)
    #[arg(long, default_value = "")]
    pub email: String,

    /// API token; falls back to the CONFLUENCE_API_TOKEN environment variable
    #[arg(long)]
    pub token: Option<String>,

    /// Space key the documents publish into
    #[arg(long)]
    pub space: String,

    /// Document description files (JSON) to publish, in order
    #[arg(required = true)]
    pub documents: Vec<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved publish configuration — validated and ready to drive the client.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub base_url: Url,
    pub variant: DeploymentVariant,
    pub email: String,
    pub api_key: ApiKey,
    pub space_key: SpaceKey,
    pub documents: Vec<PathBuf>,
    pub verbose: bool,
}

impl PublishConfig {
    /// Validates raw command-line input into a usable configuration.
    pub fn from_input(input: CommandLineInput) -> Result<Self, AppError> {
        let base_url = Url::parse(&input.base_url).map_err(|e| {
            AppError::Validation(format!("invalid base URL {:?}: {}", input.base_url, e))
        })?;
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(AppError::Validation(format!(
                "base URL must be http(s), got {:?}",
                base_url.scheme()
            )));
        }

        let token = input
            .token
            .or_else(|| std::env::var("CONFLUENCE_API_TOKEN").ok())
            .ok_or_else(|| {
                AppError::MissingConfiguration(
                    "API token: pass --token or set CONFLUENCE_API_TOKEN".to_string(),
                )
            })?;

        let variant = DeploymentVariant::from_base_url(&base_url);
        log::debug!("Detected {} deployment at {}", variant, base_url);

        Ok(Self {
            variant,
            email: input.email,
            api_key: ApiKey::new(token)?,
            space_key: SpaceKey::new(input.space)?,
            documents: input.documents.into_iter().map(PathBuf::from).collect(),
            verbose: input.verbose,
            base_url,
        })
    }

    /// Site base without a trailing slash, for request URL assembly.
    pub fn site_base(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }
}
