//! Merge candidate planners.
//!
//! Each planner proposes rectangles for a common report layout. None of
//! them checks bounds or conflicts; feed the output to
//! [`validate_regions`](super::validate::validate_regions).

use crate::model::MergeRegion;

fn to_u32(v: usize) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

/// A title row spanning all `cols` columns. `None` for a single column.
pub fn span_row(row: u32, cols: u32) -> Option<MergeRegion> {
    (cols > 1).then(|| MergeRegion::new(row, 0, row, cols - 1))
}

/// Split `cols` columns of one row into `parts` near-equal segments, e.g. a
/// left/right metadata row or a left/center/right signature row.
///
/// Segment `k` covers `floor(k * cols / parts) ..= floor((k + 1) * cols / parts) - 1`.
/// Empty and single-cell segments are skipped.
pub fn split_row(row: u32, cols: u32, parts: u32) -> Vec<MergeRegion> {
    if parts == 0 {
        return vec![];
    }
    let bound = |k: u32| (u64::from(k) * u64::from(cols) / u64::from(parts)) as u32;
    (0..parts)
        .filter_map(|k| {
            let start = bound(k);
            let end = bound(k + 1);
            (end > start + 1).then(|| MergeRegion::new(row, start, row, end - 1))
        })
        .collect()
}

/// Runs of equal, non-empty values down one column.
///
/// `values[i]` is the cell at row `first_row + i`.
pub fn column_runs<S: AsRef<str>>(values: &[S], col: u32, first_row: u32) -> Vec<MergeRegion> {
    runs(values)
        .map(|(start, end)| {
            MergeRegion::new(
                first_row.saturating_add(to_u32(start)),
                col,
                first_row.saturating_add(to_u32(end)),
                col,
            )
        })
        .collect()
}

/// Vertical runs for every column of a rectangular grid, column by column.
pub fn vertical_runs<S: AsRef<str>>(grid: &[Vec<S>], first_row: u32) -> Vec<MergeRegion> {
    let Some(width) = grid.first().map(Vec::len) else {
        return vec![];
    };
    debug_assert!(grid.iter().all(|row| row.len() == width));

    let mut regions = Vec::new();
    for col in 0..width {
        let column: Vec<&str> = grid
            .iter()
            .map(|row| row.get(col).map_or("", |s| s.as_ref()))
            .collect();
        regions.extend(column_runs(&column, to_u32(col), first_row));
    }
    regions
}

/// Runs of equal, non-empty values along each row, row by row.
pub fn horizontal_runs<S: AsRef<str>>(grid: &[Vec<S>], first_row: u32) -> Vec<MergeRegion> {
    let mut regions = Vec::new();
    for (i, row) in grid.iter().enumerate() {
        let r = first_row.saturating_add(to_u32(i));
        regions.extend(
            runs(row.as_slice()).map(|(start, end)| MergeRegion::new(r, to_u32(start), r, to_u32(end))),
        );
    }
    regions
}

/// Inclusive `(start, end)` index pairs of runs longer than one.
fn runs<S: AsRef<str>>(values: &[S]) -> impl Iterator<Item = (usize, usize)> + '_ {
    let mut i = 0;
    std::iter::from_fn(move || {
        while i < values.len() {
            let value = values[i].as_ref();
            let start = i;
            i += 1;
            if value.is_empty() {
                continue;
            }
            while i < values.len() && values[i].as_ref() == value {
                i += 1;
            }
            if i - start > 1 {
                return Some((start, i - 1));
            }
        }
        None
    })
}
