//! # Grid Merges
//!
//! Spreadsheet-style output merges rectangular cell ranges into one visual
//! cell. A grid writer collects candidate ranges from several places (title
//! row, metadata row, runs of repeated values) and they routinely collide.
//! [`validate::validate_merges`] turns that list into one the writer can
//! apply as is; [`plan`] proposes the usual candidates.
//!
//! This side of the crate is independent of pagination.

pub mod a1;
pub mod plan;
pub mod validate;

pub use validate::{validate_merges, validate_regions, MergeReport, Rejection};
