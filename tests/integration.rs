//! Integration tests for the folio planning pipeline.
//!
//! These tests drive JSON jobs through the public API, the way the CLI and
//! the wasm bindings do. They verify:
//! - Job deserialization and defaults
//! - Page capacities and page ranges for the reference report
//! - Bitmap slices attached to pages
//! - Merge validation outcomes and their JSON shape
//! - Fatal errors carry the right kind

use folio::error::ErrorKind;
use folio::grid::plan::{span_row, split_row};
use folio::grid::validate_regions;
use folio::model::MergeLimits;
use folio::*;

// ─── Helpers ────────────────────────────────────────────────────

const REFERENCE_GEOMETRY: &str = r#"{
    "pageHeight": 280, "marginTop": 15, "marginBottom": 15,
    "reservedTrailerHeight": 15, "safetyMargin": 3
}"#;

fn reference_job(document: &str) -> String {
    format!(r#"{{ "document": {document}, "geometry": {REFERENCE_GEOMETRY} }}"#)
}

fn ranges(plan: &PagePlan) -> Vec<(usize, usize)> {
    plan.pages.iter().map(|p| (p.row_start, p.row_end)).collect()
}

fn merge_job(candidates: &str) -> String {
    format!(r#"{{ "candidates": {candidates}, "bounds": {{ "maxRow": 9, "maxCol": 9 }} }}"#)
}

fn reason_kinds(report: &MergeReport) -> Vec<(usize, ErrorKind)> {
    report
        .rejected
        .iter()
        .map(|r| (r.index, r.reason.kind()))
        .collect()
}

// ─── Page Capacity Tests ────────────────────────────────────────

#[test]
fn test_reference_capacities() {
    let job = reference_job(r#"{ "headerHeight": 30, "footerHeight": 20, "totalRows": 100, "rowHeight": 5 }"#);
    let plan = plan_json(&job).unwrap();
    let caps = plan.capacities.expect("uniform rows should report capacities");
    assert_eq!(caps.first_page_max_rows, 40);
    assert_eq!(caps.middle_page_max_rows, 46);
    assert_eq!(caps.last_page_max_rows, 42);
    assert_eq!(plan.available.middle, 232.0);
}

#[test]
fn test_zero_row_height_is_invalid_geometry() {
    let job = reference_job(r#"{ "headerHeight": 30, "footerHeight": 20, "totalRows": 100, "rowHeight": 0 }"#);
    let err = plan_json(&job).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::InvalidGeometry));
}

#[test]
fn test_default_page_setup_is_a4() {
    let job = r#"{ "document": { "headerHeight": 30, "footerHeight": 20, "totalRows": 10, "rowHeight": 5 } }"#;
    let plan = plan_json(job).unwrap();
    let caps = plan.capacities.unwrap();
    // base = 297 - 15 - 15 - 15 - 8 = 244
    assert_eq!(caps.first_page_max_rows, 42);
    assert_eq!(caps.middle_page_max_rows, 48);
    assert_eq!(caps.last_page_max_rows, 44);
}

#[test]
fn test_landscape_page_setup() {
    let job = r#"{
        "document": { "headerHeight": 30, "footerHeight": 20, "totalRows": 10, "rowHeight": 5 },
        "page": { "orientation": "Landscape" }
    }"#;
    let caps = plan_json(job).unwrap().capacities.unwrap();
    assert_eq!(caps.first_page_max_rows, 25);
    assert_eq!(caps.middle_page_max_rows, 31);
    assert_eq!(caps.last_page_max_rows, 27);
}

// ─── Pagination Tests ───────────────────────────────────────────

#[test]
fn test_reference_pages() {
    let job = reference_job(r#"{ "headerHeight": 30, "footerHeight": 20, "totalRows": 100, "rowHeight": 5 }"#);
    let plan = plan_json(&job).unwrap();
    assert_eq!(ranges(&plan), vec![(0, 40), (40, 86), (86, 100)]);
    let headers: Vec<bool> = plan.pages.iter().map(|p| p.includes_header).collect();
    let footers: Vec<bool> = plan.pages.iter().map(|p| p.includes_footer).collect();
    assert_eq!(headers, vec![true, false, false]);
    assert_eq!(footers, vec![false, false, true]);
    assert_eq!(plan.break_points.len(), 2, "Every page but the last has a break");
}

#[test]
fn test_per_row_heights_match_uniform() {
    let heights = vec!["5"; 100].join(",");
    let job = reference_job(&format!(
        r#"{{ "headerHeight": 30, "footerHeight": 20, "rowHeights": [{heights}] }}"#
    ));
    let plan = plan_json(&job).unwrap();
    assert!(plan.capacities.is_none());
    assert_eq!(ranges(&plan), vec![(0, 40), (40, 86), (86, 100)]);
}

#[test]
fn test_header_only_first_page() {
    let job = reference_job(r#"{ "headerHeight": 230, "footerHeight": 20, "totalRows": 50, "rowHeight": 5 }"#);
    let plan = plan_json(&job).unwrap();
    assert_eq!(ranges(&plan), vec![(0, 0), (0, 46), (46, 50)]);
    assert!(plan.pages[0].includes_header);
}

#[test]
fn test_empty_document_has_one_page() {
    let job = reference_job(r#"{ "headerHeight": 30, "footerHeight": 20, "totalRows": 0, "rowHeight": 5 }"#);
    let plan = plan_json(&job).unwrap();
    assert_eq!(plan.page_count(), 1);
    assert!(plan.pages[0].includes_header && plan.pages[0].includes_footer);
    assert!(plan.break_points.is_empty());
}

#[test]
fn test_header_taller_than_page_fails() {
    let job = reference_job(r#"{ "headerHeight": 400, "footerHeight": 20, "totalRows": 5, "rowHeight": 5 }"#);
    let err = plan_json(&job).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::ContentTooLargeForPage));
}

#[test]
fn test_gaps_from_page_setup() {
    let job = r#"{
        "document": { "headerHeight": 30, "footerHeight": 20, "totalRows": 10, "rowHeight": 5 },
        "page": { "headerGap": 5, "footerGap": 10 }
    }"#;
    let caps = plan_json(job).unwrap().capacities.unwrap();
    // 244 - 35 = 209, 244 - 30 = 214
    assert_eq!(caps.first_page_max_rows, 41);
    assert_eq!(caps.last_page_max_rows, 42);
}

// ─── Slice Tests ────────────────────────────────────────────────

#[test]
fn test_bitmap_slices_in_json_output() {
    let job = format!(
        r#"{{
            "document": {{ "headerHeight": 30, "footerHeight": 20, "totalRows": 100, "rowHeight": 5 }},
            "geometry": {REFERENCE_GEOMETRY},
            "bitmap": {{ "width": 1000, "height": 1100 }},
            "outputWidth": 180
        }}"#
    );
    let plan = plan_json(&job).unwrap();
    let value = serde_json::to_value(&plan).unwrap();
    let page = &value["pages"][1];
    assert_eq!(page["rowStart"], 40);
    assert_eq!(page["sourceYOffset"], 460);
    assert_eq!(page["sourceHeight"], 460);
    assert!((page["outputHeight"].as_f64().unwrap() - 82.8).abs() < 1e-9);
    assert!(value.get("warnings").is_none(), "Reference slices fit their pages");
}

#[test]
fn test_unsliced_plan_has_no_slice_fields() {
    let job = reference_job(r#"{ "headerHeight": 30, "footerHeight": 20, "totalRows": 100, "rowHeight": 5 }"#);
    let value = serde_json::to_value(plan_json(&job).unwrap()).unwrap();
    assert!(value["pages"][0].get("sourceYOffset").is_none());
    assert_eq!(value["capacities"]["firstPageMaxRows"], 40);
    assert_eq!(value["breakPoints"][0]["endRow"], 40);
}

// ─── Merge Validation Tests ─────────────────────────────────────

#[test]
fn test_overlapping_region_rejected() {
    let json = merge_job(
        r#"[
            { "startRow": 0, "startCol": 0, "endRow": 1, "endCol": 1 },
            { "startRow": 1, "startCol": 1, "endRow": 2, "endCol": 2 },
            { "startRow": 3, "startCol": 0, "endRow": 3, "endCol": 5 }
        ]"#,
    );
    let report = validate_merges_json(&json).unwrap();
    assert_eq!(
        report.accepted,
        vec![MergeRegion::new(0, 0, 1, 1), MergeRegion::new(3, 0, 3, 5)]
    );
    assert_eq!(reason_kinds(&report), vec![(1, ErrorKind::OverlappingRegion)]);
}

#[test]
fn test_single_cell_region_is_degenerate() {
    let json = merge_job(r#"[{ "startRow": 2, "startCol": 2, "endRow": 2, "endCol": 2 }]"#);
    let report = validate_merges_json(&json).unwrap();
    assert!(report.accepted.is_empty());
    assert_eq!(reason_kinds(&report), vec![(0, ErrorKind::DegenerateRegion)]);
}

#[test]
fn test_negative_region_is_out_of_range() {
    let json = merge_job(r#"[{ "startRow": -1, "startCol": 0, "endRow": 2, "endCol": 2 }]"#);
    let report = validate_merges_json(&json).unwrap();
    assert_eq!(reason_kinds(&report), vec![(0, ErrorKind::OutOfRangeRegion)]);
}

#[test]
fn test_malformed_regions_do_not_fail_the_call() {
    let json = merge_job(
        r#"[
            { "startRow": 0, "startCol": 0, "endRow": 1 },
            { "startRow": "a", "startCol": 0, "endRow": 1, "endCol": 1 },
            { "startRow": 0, "startCol": 0, "endRow": 1, "endCol": 1 }
        ]"#,
    );
    let report = validate_merges_json(&json).unwrap();
    assert_eq!(report.accepted, vec![MergeRegion::new(0, 0, 1, 1)]);
    assert_eq!(
        reason_kinds(&report),
        vec![(0, ErrorKind::MalformedRegion), (1, ErrorKind::MalformedRegion)]
    );
}

#[test]
fn test_merge_limits_from_json() {
    let json = r#"{
        "candidates": [{ "startRow": 0, "startCol": 0, "endRow": 0, "endCol": 300 }],
        "limits": { "maxCols": 256 }
    }"#;
    let report = validate_merges_json(json).unwrap();
    assert_eq!(reason_kinds(&report), vec![(0, ErrorKind::SanityLimitExceeded)]);
}

#[test]
fn test_report_json_shape() {
    let json = merge_job(
        r#"[
            { "startRow": 0, "startCol": 0, "endRow": 1, "endCol": 1 },
            { "startRow": 0, "startCol": 0, "endRow": 1, "endCol": 1 }
        ]"#,
    );
    let value = serde_json::to_value(validate_merges_json(&json).unwrap()).unwrap();
    assert_eq!(value["acceptedIndices"], serde_json::json!([0]));
    assert_eq!(value["rejected"][0]["reason"]["kind"], "duplicate");
    assert_eq!(value["rejected"][0]["reason"]["of"], 0);
}

#[test]
fn test_planned_merges_validate_cleanly() {
    let mut regions: Vec<MergeRegion> = span_row(0, 6).into_iter().collect();
    regions.extend(split_row(2, 6, 2));
    regions.extend(split_row(8, 6, 3));
    let report = validate_regions(&regions, GridBounds::for_size(10, 6), MergeLimits::default());
    assert!(report.is_clean());
    assert_eq!(report.accepted.len(), 6);
    assert_eq!(report.accepted[0].to_string(), "A1:F1");
}

// ─── Parse Errors ───────────────────────────────────────────────

#[test]
fn test_invalid_json_has_hint() {
    let err = plan_json(r#"{ "document": { "totalRows": 3, }"#).unwrap_err();
    assert!(matches!(err, FolioError::ParseError { .. }));
    assert!(err.to_string().contains("Hint:"));
}

#[test]
fn test_missing_candidates_is_parse_error() {
    let err = validate_merges_json(r#"{ "bounds": { "maxRow": 1, "maxCol": 1 } }"#).unwrap_err();
    assert!(matches!(err, FolioError::ParseError { .. }));
}
