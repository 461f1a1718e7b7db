//! # Merge Region Validation
//!
//! Filters candidate merge rectangles into a conflict-free set. One pass in
//! input order; each candidate is checked against the regions accepted so
//! far, never against other candidates, so the earliest of two conflicting
//! regions wins.
//!
//! Checks run in this order and the first failing one names the rejection:
//!
//! 1. every coordinate present and integral, else `Malformed`
//! 2. every coordinate within `0..=max` for its axis, else `OutOfRange`
//! 3. start not past end on either axis, else `OutOfRange`
//! 4. more than one cell, else `Degenerate`
//! 5. span within the optional row/column caps, else `SanityLimitExceeded`
//! 6. not identical to an accepted region, else `Duplicate`
//! 7. not sharing a cell with an accepted region, else `Overlapping`
//!
//! Validation never fails as a whole. The caller always gets the (possibly
//! empty) accepted list back.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::RejectReason;
use crate::model::{CandidateRegion, GridBounds, MergeLimits, MergeRegion};

/// A dropped candidate and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// Position in the candidate list.
    pub index: usize,
    pub reason: RejectReason,
}

/// Outcome of one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// Accepted regions, in input order.
    pub accepted: Vec<MergeRegion>,
    /// Candidate index of each accepted region.
    pub accepted_indices: Vec<usize>,
    pub rejected: Vec<Rejection>,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Validate raw candidates against `bounds` and `limits`.
pub fn validate_merges(
    candidates: &[CandidateRegion],
    bounds: GridBounds,
    limits: MergeLimits,
) -> MergeReport {
    let mut report = MergeReport::default();

    for (index, candidate) in candidates.iter().enumerate() {
        match check(candidate, bounds, limits, &report) {
            Ok(region) => {
                debug!(index, region = %region, "merge accepted");
                report.accepted.push(region);
                report.accepted_indices.push(index);
            }
            Err(reason) => {
                if reason == RejectReason::Degenerate {
                    debug!(index, "single-cell merge skipped");
                } else {
                    warn!(index, reason = ?reason, "merge rejected");
                }
                report.rejected.push(Rejection { index, reason });
            }
        }
    }

    debug!(
        accepted = report.accepted.len(),
        rejected = report.rejected.len(),
        "merge validation complete"
    );
    report
}

/// Validate already-typed regions. Same rules as [`validate_merges`].
pub fn validate_regions(
    regions: &[MergeRegion],
    bounds: GridBounds,
    limits: MergeLimits,
) -> MergeReport {
    let candidates: Vec<CandidateRegion> = regions.iter().copied().map(CandidateRegion::from).collect();
    validate_merges(&candidates, bounds, limits)
}

fn check(
    candidate: &CandidateRegion,
    bounds: GridBounds,
    limits: MergeLimits,
    report: &MergeReport,
) -> Result<MergeRegion, RejectReason> {
    let start_row = coordinate(candidate.start_row.as_ref(), "startRow")?;
    let start_col = coordinate(candidate.start_col.as_ref(), "startCol")?;
    let end_row = coordinate(candidate.end_row.as_ref(), "endRow")?;
    let end_col = coordinate(candidate.end_col.as_ref(), "endCol")?;

    let start_row = on_axis(start_row, bounds.max_row)?;
    let start_col = on_axis(start_col, bounds.max_col)?;
    let end_row = on_axis(end_row, bounds.max_row)?;
    let end_col = on_axis(end_col, bounds.max_col)?;

    if start_row > end_row || start_col > end_col {
        return Err(RejectReason::OutOfRange);
    }

    let region = MergeRegion::new(start_row, start_col, end_row, end_col);
    if region.is_single_cell() {
        return Err(RejectReason::Degenerate);
    }

    let too_tall = limits.max_rows.is_some_and(|max| region.rows() > u64::from(max));
    let too_wide = limits.max_cols.is_some_and(|max| region.cols() > u64::from(max));
    if too_tall || too_wide {
        return Err(RejectReason::SanityLimitExceeded {
            rows: region.rows(),
            cols: region.cols(),
        });
    }

    let accepted = report.accepted.iter().zip(&report.accepted_indices);
    for (other, &of) in accepted.clone() {
        if *other == region {
            return Err(RejectReason::Duplicate { of });
        }
    }
    for (other, &with) in accepted {
        if other.intersects(&region) {
            return Err(RejectReason::Overlapping { with });
        }
    }

    Ok(region)
}

/// Read one coordinate. Integral floats such as `2.0` count as integers.
fn coordinate(value: Option<&Value>, field: &'static str) -> Result<i64, RejectReason> {
    let malformed = RejectReason::Malformed { field };
    let Some(Value::Number(n)) = value else {
        return Err(malformed);
    };
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    if n.as_u64().is_some() {
        // integral, just larger than any grid
        return Ok(i64::MAX);
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
        _ => Err(malformed),
    }
}

fn on_axis(v: i64, max: u32) -> Result<u32, RejectReason> {
    if v < 0 || v > i64::from(max) {
        return Err(RejectReason::OutOfRange);
    }
    u32::try_from(v).map_err(|_| RejectReason::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ten_by_ten() -> GridBounds {
        GridBounds::for_size(10, 10)
    }

    fn run(candidates: &[CandidateRegion]) -> MergeReport {
        validate_merges(candidates, ten_by_ten(), MergeLimits::default())
    }

    #[test]
    fn overlap_keeps_first_region() {
        let report = run(&[
            CandidateRegion::new(0, 0, 1, 1),
            CandidateRegion::new(1, 1, 2, 2),
            CandidateRegion::new(3, 0, 3, 5),
        ]);
        assert_eq!(
            report.accepted,
            vec![MergeRegion::new(0, 0, 1, 1), MergeRegion::new(3, 0, 3, 5)]
        );
        assert_eq!(report.accepted_indices, vec![0, 2]);
        assert_eq!(
            report.rejected,
            vec![Rejection {
                index: 1,
                reason: RejectReason::Overlapping { with: 0 },
            }]
        );
    }

    #[test]
    fn single_cell_is_degenerate() {
        let report = run(&[CandidateRegion::new(2, 2, 2, 2)]);
        assert!(report.accepted.is_empty());
        assert_eq!(report.rejected[0].reason, RejectReason::Degenerate);
    }

    #[test]
    fn negative_coordinate_is_out_of_range() {
        let report = run(&[CandidateRegion::new(-1, 0, 2, 2)]);
        assert_eq!(report.rejected[0].reason, RejectReason::OutOfRange);
    }

    #[test]
    fn past_bounds_and_reversed_are_out_of_range() {
        let report = run(&[
            CandidateRegion::new(0, 0, 10, 1),
            CandidateRegion::new(0, 0, 1, 10),
            CandidateRegion::new(3, 0, 2, 1),
            CandidateRegion::new(0, 4, 1, 3),
        ]);
        assert!(report.accepted.is_empty());
        assert!(report
            .rejected
            .iter()
            .all(|r| r.reason == RejectReason::OutOfRange));
    }

    #[test]
    fn duplicate_wins_over_overlap() {
        let report = run(&[
            CandidateRegion::new(0, 0, 1, 1),
            CandidateRegion::new(4, 4, 5, 5),
            CandidateRegion::new(4, 4, 5, 5),
        ]);
        assert_eq!(report.rejected[0].reason, RejectReason::Duplicate { of: 1 });
    }

    #[test]
    fn malformed_coordinates() {
        let candidates = vec![
            CandidateRegion {
                end_col: None,
                ..CandidateRegion::new(0, 0, 1, 1)
            },
            CandidateRegion {
                start_row: Some(Value::Null),
                ..CandidateRegion::new(0, 0, 1, 1)
            },
            CandidateRegion {
                end_row: Some(json!(1.5)),
                ..CandidateRegion::new(0, 0, 1, 1)
            },
            CandidateRegion {
                start_col: Some(json!("0")),
                ..CandidateRegion::new(0, 0, 1, 1)
            },
        ];
        let report = run(&candidates);
        let reasons: Vec<_> = report.rejected.iter().map(|r| r.reason.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                RejectReason::Malformed { field: "endCol" },
                RejectReason::Malformed { field: "startRow" },
                RejectReason::Malformed { field: "endRow" },
                RejectReason::Malformed { field: "startCol" },
            ]
        );
    }

    #[test]
    fn integral_floats_are_accepted() {
        let candidate = CandidateRegion {
            end_row: Some(json!(2.0)),
            ..CandidateRegion::new(0, 0, 1, 1)
        };
        let report = run(&[candidate]);
        assert_eq!(report.accepted, vec![MergeRegion::new(0, 0, 2, 1)]);
    }

    #[test]
    fn huge_integer_is_out_of_range() {
        let candidate = CandidateRegion {
            end_row: Some(json!(u64::MAX)),
            ..CandidateRegion::new(0, 0, 1, 1)
        };
        let report = run(&[candidate]);
        assert_eq!(report.rejected[0].reason, RejectReason::OutOfRange);
    }

    #[test]
    fn sanity_limits() {
        let limits = MergeLimits {
            max_rows: Some(3),
            max_cols: None,
        };
        let report = validate_merges(
            &[
                CandidateRegion::new(0, 0, 3, 0),
                CandidateRegion::new(0, 0, 2, 9),
            ],
            ten_by_ten(),
            limits,
        );
        assert_eq!(
            report.rejected[0].reason,
            RejectReason::SanityLimitExceeded { rows: 4, cols: 1 }
        );
        assert_eq!(report.accepted, vec![MergeRegion::new(0, 0, 2, 9)]);
    }

    #[test]
    fn revalidating_accepted_changes_nothing() {
        let report = run(&[
            CandidateRegion::new(0, 0, 1, 1),
            CandidateRegion::new(1, 1, 2, 2),
            CandidateRegion::new(5, 5, 5, 5),
            CandidateRegion::new(3, 0, 3, 5),
        ]);
        let again = validate_regions(&report.accepted, ten_by_ten(), MergeLimits::default());
        assert_eq!(again.accepted, report.accepted);
        assert!(again.is_clean());
    }

    #[test]
    fn rejection_serializes_with_kind_tag() {
        let r = Rejection {
            index: 3,
            reason: RejectReason::Overlapping { with: 1 },
        };
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({ "index": 3, "reason": { "kind": "overlapping", "with": 1 } })
        );
    }
}
