// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. Reading these constants should tell you the story
//! of how the system operates: how much it fetches, how it allocates
//! memory, how hard it tries on conflict.

// ---------------------------------------------------------------------------
// Confluence API boundaries
// ---------------------------------------------------------------------------

/// How many attachments the adapter requests per attachment listing.
///
/// Pages rarely carry more than a handful of attachments; 200 keeps the
/// duplicate-name lookup to a single round-trip in practice.
pub const ATTACHMENT_LIST_PAGE_SIZE: usize = 200;

/// How many times a duplicate-name attachment conflict is retried against
/// the existing attachment's data endpoint. Exactly one hop; the retry
/// path itself is never retried.
#[allow(dead_code)]
pub const DUPLICATE_CONFLICT_RETRY_LIMIT: usize = 1;

/// Path suffix that marks a Confluence Cloud site.
///
/// Cloud sites serve the REST API under `https://<site>.atlassian.net/wiki`;
/// Data Center installs serve it from the context root. The suffix is the
/// only configured signal distinguishing the two deployment variants.
pub const CLOUD_PATH_SUFFIX: &str = "/wiki";

// ---------------------------------------------------------------------------
// Storage-format rendering boundaries
// ---------------------------------------------------------------------------

/// Estimated characters emitted per ADF node, used to pre-allocate
/// output strings.
///
/// This is a performance hint, not a constraint. Over-estimating wastes
/// a little memory; under-estimating causes reallocation.
pub const CHARS_PER_NODE_ESTIMATE: usize = 128;

/// Default initial capacity for output string builders.
pub const OUTPUT_STRING_INITIAL_CAPACITY: usize = 512;

/// Heading levels Confluence storage format understands. Levels outside
/// this range clamp so the emitted tag is always well-formed.
pub const HEADING_LEVEL_RANGE: std::ops::RangeInclusive<u8> = 1..=6;

/// State attribute value that marks a task item as completed.
pub const TASK_STATE_DONE: &str = "DONE";

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
