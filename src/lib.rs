//! # Folio
//!
//! Page planning for exported reports.
//!
//! A report export has two hard parts that have nothing to do with pixels or
//! file formats. The first is deciding how a report (a header block, N body
//! rows, a footer block) splits across fixed-size pages, so a renderer can
//! paint each page without cutting a row in half. The second is turning a
//! pile of candidate cell merges into a set a spreadsheet writer can apply
//! without corrupting the sheet.
//!
//! Folio does exactly those two things. Rendering, measuring and writing
//! bytes stay with the caller, which hands folio measured heights and gets
//! back plain values.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [config]    typed jobs with explicit defaults
//!       ↓
//!   [model]     Document, PageGeometry, MergeRegion, ...
//!       ↓
//!   [layout]    capacities → pages → break points → bitmap slices
//!   [grid]      merge candidates → accepted set + rejections
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod layout;
pub mod model;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{MergeJob, PageSetup, PlanJob, SliceMode};
pub use error::{ErrorKind, FolioError, RejectReason};
pub use grid::{MergeReport, Rejection};
pub use layout::paginate::{BreakPoint, Page, PagePlan};
pub use model::{Document, GridBounds, MergeRegion, PageGeometry};

/// Plan the pages of a job.
///
/// This is the primary entry point. Fails as a whole on invalid geometry or
/// content that no page can hold.
pub fn plan(job: &PlanJob) -> Result<PagePlan, FolioError> {
    layout::plan_job(job)
}

/// Plan a job described as JSON.
pub fn plan_json(json: &str) -> Result<PagePlan, FolioError> {
    let job: PlanJob = serde_json::from_str(json)?;
    plan(&job)
}

/// Validate the merge candidates of a job. Never fails.
pub fn check_merges(job: &MergeJob) -> MergeReport {
    grid::validate_merges(&job.candidates, job.bounds, job.limits)
}

/// Validate merge candidates described as JSON. Only parsing can fail.
pub fn validate_merges_json(json: &str) -> Result<MergeReport, FolioError> {
    let job: MergeJob = serde_json::from_str(json)?;
    Ok(check_merges(&job))
}
