//! # Pagination Engine
//!
//! Walks the body rows page by page over the state `(next_row, page_index)`
//! and asks [`decide_break`] what each page takes. The result is an ordered
//! list of [`Page`]s whose row ranges partition `[0, totalRows)` exactly.
//!
//! The header lives on page 0 only. The footer lives on the terminal page,
//! or on a footer-only page appended after it when the terminal page has no
//! room left for it.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::FolioError;
use crate::layout::capacity::{AvailableHeights, PageCapacities, PageKind};
use crate::layout::heights::{RowMetrics, FIT_EPSILON};
use crate::layout::page_break::{decide_break, BreakDecision, PageBudget};
use crate::layout::slice::PageSlice;

/// One output page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub index: usize,
    /// First body row on this page.
    pub row_start: usize,
    /// One past the last body row on this page.
    pub row_end: usize,
    pub includes_header: bool,
    pub includes_footer: bool,
    /// Source bitmap region, when the plan was sliced.
    #[serde(flatten)]
    pub slice: Option<PageSlice>,
}

impl Page {
    fn body(index: usize, row_start: usize, row_end: usize) -> Self {
        Self {
            index,
            row_start,
            row_end,
            includes_header: index == 0,
            includes_footer: false,
            slice: None,
        }
    }

    fn footer_only(index: usize, total_rows: usize) -> Self {
        Self {
            index,
            row_start: total_rows,
            row_end: total_rows,
            includes_header: index == 0,
            includes_footer: true,
            slice: None,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_end - self.row_start
    }

    /// Page-number text, e.g. `Page 2 / 3`.
    pub fn label(&self, total_pages: usize) -> String {
        format!("Page {} / {}", self.index + 1, total_pages)
    }
}

/// Where the rendered document is cut between two pages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakPoint {
    /// The page that ends at this break.
    pub page_index: usize,
    /// Rows before the break.
    pub end_row: usize,
    /// Fraction (0..1) of the full document height at the break.
    pub y_percent: f64,
}

/// The complete outcome of one pagination call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePlan {
    pub total_rows: usize,
    pub document_height: f64,
    pub available: AvailableHeights,
    /// Per-kind row capacities. Only defined for uniform rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacities: Option<PageCapacities>,
    pub pages: Vec<Page>,
    pub break_points: Vec<BreakPoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl PagePlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Labels for every page, in order.
    pub fn labels(&self) -> Vec<String> {
        let total = self.pages.len();
        self.pages.iter().map(|p| p.label(total)).collect()
    }

    pub(crate) fn warn(&mut self, msg: impl AsRef<str>) {
        let msg = msg.as_ref();
        warn!("{msg}");
        self.warnings.push(msg.to_string());
    }
}

/// Assign `total_rows` body rows to pages.
///
/// Fails with `ContentTooLargeForPage` when the header or footer block is
/// taller than a page, or when a page after the first cannot take a single
/// row while rows remain. The loop is also capped at `total_rows + 2` pages.
pub fn paginate<B: PageBudget + ?Sized>(
    budget: &B,
    total_rows: usize,
) -> Result<Vec<Page>, FolioError> {
    let first_room = budget.available().first;
    if first_room < -FIT_EPSILON {
        return Err(FolioError::too_large(
            0,
            format!("header block overflows the page by {:.3}", -first_room),
        ));
    }

    let max_pages = total_rows.saturating_add(2);
    let mut pages: Vec<Page> = Vec::new();
    let mut next_row = 0;

    loop {
        let page_index = pages.len();
        let remaining = total_rows - next_row;
        // Backstop only: the zero-row check below already ends the loop, since
        // every page after page 0 must place at least one row.
        if page_index >= max_pages {
            return Err(FolioError::too_large(
                page_index,
                format!("{remaining} rows still unplaced after {max_pages} pages"),
            ));
        }

        let decision = decide_break(budget, page_index, next_row, remaining);
        let rows = decision.rows();
        if page_index > 0 && rows == 0 {
            return Err(FolioError::too_large(
                page_index,
                format!(
                    "a {:?} page has no room for row {next_row} ({remaining} rows remain)",
                    decision.kind()
                ),
            ));
        }

        let mut page = Page::body(page_index, next_row, next_row + rows);
        next_row += rows;
        debug!(
            page = page_index,
            kind = ?decision.kind(),
            rows,
            row_start = page.row_start,
            row_end = page.row_end,
            "page placed"
        );

        match decision {
            BreakDecision::Split { .. } => pages.push(page),
            BreakDecision::Place { .. } => {
                let kind = if page_index == 0 {
                    PageKind::First
                } else {
                    PageKind::Middle
                };
                page.includes_footer = budget.footer_fits(kind, page.row_start, rows);
                let spill = !page.includes_footer;
                pages.push(page);

                if spill {
                    let footer_index = pages.len();
                    if !budget.footer_fits(PageKind::Middle, total_rows, 0) {
                        return Err(FolioError::too_large(
                            footer_index,
                            "footer block is taller than an empty page",
                        ));
                    }
                    debug!(page = footer_index, "footer moved to its own page");
                    pages.push(Page::footer_only(footer_index, total_rows));
                }
                return Ok(pages);
            }
        }
    }
}

/// Break points for every page but the last.
pub fn break_points(pages: &[Page], metrics: &RowMetrics) -> Vec<BreakPoint> {
    let Some((_, body)) = pages.split_last() else {
        return vec![];
    };
    body.iter()
        .map(|page| BreakPoint {
            page_index: page.index,
            end_row: page.row_end,
            y_percent: metrics.normalized_y(page.row_end),
        })
        .collect()
}
