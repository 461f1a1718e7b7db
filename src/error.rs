//! Structured error types for folio.
//!
//! Page planning is all-or-nothing: a half-computed page plan cannot be
//! rendered safely, so the planner and engine fail the whole call with a
//! [`FolioError`]. Merge validation is best effort and never fails; each
//! dropped candidate carries a [`RejectReason`] instead.

use serde::Serialize;
use thiserror::Error;

/// The unified error type returned by all fallible folio functions.
#[derive(Debug, Error)]
pub enum FolioError {
    /// Geometry that no page plan can be computed for: a non-positive row
    /// height, margins that eat the whole page, negative or non-finite inputs.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A page whose capacity for its content is zero while content remains.
    #[error("Content too large for page {page_index}: {detail}")]
    ContentTooLargeForPage { page_index: usize, detail: String },

    /// JSON input failed to parse as a folio job.
    #[error("Failed to parse job: {source}{}", fmt_hint(.hint))]
    ParseError {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
}

fn fmt_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl FolioError {
    pub(crate) fn geometry(msg: impl Into<String>) -> Self {
        FolioError::InvalidGeometry(msg.into())
    }

    pub(crate) fn too_large(page_index: usize, detail: impl Into<String>) -> Self {
        FolioError::ContentTooLargeForPage {
            page_index,
            detail: detail.into(),
        }
    }

    /// The taxonomy kind of this error. Parse failures have no taxonomy kind.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            FolioError::InvalidGeometry(_) => Some(ErrorKind::InvalidGeometry),
            FolioError::ContentTooLargeForPage { .. } => Some(ErrorKind::ContentTooLargeForPage),
            FolioError::ParseError { .. } => None,
        }
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the job schema. Check field names (camelCase) and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FolioError::ParseError { source: e, hint }
    }
}

/// Every failure and rejection kind folio can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    InvalidGeometry,
    ContentTooLargeForPage,
    MalformedRegion,
    OutOfRangeRegion,
    DegenerateRegion,
    DuplicateRegion,
    OverlappingRegion,
    SanityLimitExceeded,
}

/// Why a merge candidate was dropped.
///
/// Indices in `Duplicate` and `Overlapping` refer to the candidate list, so a
/// caller can point at the earlier region that won.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RejectReason {
    /// A coordinate is missing, null, non-numeric, fractional or non-finite.
    Malformed { field: &'static str },
    /// A coordinate is negative, past the grid bounds, or start > end.
    OutOfRange,
    /// A single cell. Merging it would be a no-op.
    Degenerate,
    /// Spans more rows or columns than the configured sanity limits.
    SanityLimitExceeded { rows: u64, cols: u64 },
    /// Same four coordinates as an accepted region.
    Duplicate { of: usize },
    /// Shares at least one cell with an accepted region.
    Overlapping { with: usize },
}

impl RejectReason {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RejectReason::Malformed { .. } => ErrorKind::MalformedRegion,
            RejectReason::OutOfRange => ErrorKind::OutOfRangeRegion,
            RejectReason::Degenerate => ErrorKind::DegenerateRegion,
            RejectReason::SanityLimitExceeded { .. } => ErrorKind::SanityLimitExceeded,
            RejectReason::Duplicate { .. } => ErrorKind::DuplicateRegion,
            RejectReason::Overlapping { .. } => ErrorKind::OverlappingRegion,
        }
    }
}
