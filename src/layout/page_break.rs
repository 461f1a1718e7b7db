//! # Page Break Decisions
//!
//! Logic for deciding how many of the waiting rows land on the current page,
//! and whether that page ends the body. The rules are the same for uniform
//! and measured rows; only the question "how many rows fit?" differs, and
//! that question is answered by a [`PageBudget`].

use crate::layout::capacity::{AvailableHeights, PageCapacities, PageKind};
use crate::layout::heights::{max_rows, RowMetrics, FIT_EPSILON};

/// What to do with the rows still waiting when a page opens.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// Every remaining row lands on this page. It is the terminal data page.
    Place { kind: PageKind, rows: usize },
    /// Place some rows here, continue on the next page.
    Split { kind: PageKind, rows: usize },
}

impl BreakDecision {
    pub fn rows(&self) -> usize {
        match self {
            BreakDecision::Place { rows, .. } | BreakDecision::Split { rows, .. } => *rows,
        }
    }

    pub fn kind(&self) -> PageKind {
        match self {
            BreakDecision::Place { kind, .. } | BreakDecision::Split { kind, .. } => *kind,
        }
    }
}

/// Answers how many rows fit on a page.
pub trait PageBudget {
    fn available(&self) -> &AvailableHeights;

    /// Rows of the `remaining` ones, starting at row `start`, that fit on a
    /// page of `kind`. Never more than `remaining`.
    fn rows_fitting(&self, kind: PageKind, start: usize, remaining: usize) -> usize;

    /// Do rows `start..start + rows` fit in `room`?
    fn span_fits(&self, start: usize, rows: usize, room: f64) -> bool;

    /// Can a page of `kind` carry rows `start..start + rows` and the footer?
    fn footer_fits(&self, kind: PageKind, start: usize, rows: usize) -> bool {
        let room = self.available().with_footer(kind);
        room >= -FIT_EPSILON && self.span_fits(start, rows, room)
    }
}

/// Budget for uniform rows, driven by the planner's capacities.
#[derive(Debug, Clone, Copy)]
pub struct UniformBudget {
    pub capacities: PageCapacities,
    pub available: AvailableHeights,
    pub row_height: f64,
}

impl PageBudget for UniformBudget {
    fn available(&self) -> &AvailableHeights {
        &self.available
    }

    fn rows_fitting(&self, kind: PageKind, _start: usize, remaining: usize) -> usize {
        self.capacities.for_kind(kind).min(remaining)
    }

    fn span_fits(&self, _start: usize, rows: usize, room: f64) -> bool {
        rows == 0 || max_rows(room, self.row_height) >= rows
    }
}

/// Budget for rows of differing heights, driven by the cumulative table.
#[derive(Debug, Clone, Copy)]
pub struct MeasuredBudget<'a> {
    pub available: AvailableHeights,
    pub metrics: &'a RowMetrics,
}

impl PageBudget for MeasuredBudget<'_> {
    fn available(&self) -> &AvailableHeights {
        &self.available
    }

    fn rows_fitting(&self, kind: PageKind, start: usize, remaining: usize) -> usize {
        self.metrics
            .rows_fitting(start, self.available.for_kind(kind))
            .min(remaining)
    }

    fn span_fits(&self, start: usize, rows: usize, room: f64) -> bool {
        self.metrics.span(start, start + rows) <= room + FIT_EPSILON
    }
}

/// Decide the fate of the `remaining` rows starting at `start` on page
/// `page_index`.
///
/// - Page 0 takes what fits below the header.
/// - A later page that can hold every remaining row above the footer is the
///   terminal page.
/// - Otherwise the page is a middle page and takes what a middle page holds.
///   If that happens to be everything, the page still ends the body, but the
///   footer has to spill to a page of its own.
pub fn decide_break<B: PageBudget + ?Sized>(
    budget: &B,
    page_index: usize,
    start: usize,
    remaining: usize,
) -> BreakDecision {
    if page_index == 0 {
        let rows = budget.rows_fitting(PageKind::First, start, remaining);
        return settle(PageKind::First, rows, remaining);
    }

    if budget.rows_fitting(PageKind::Last, start, remaining) >= remaining {
        return BreakDecision::Place {
            kind: PageKind::Last,
            rows: remaining,
        };
    }

    let rows = budget.rows_fitting(PageKind::Middle, start, remaining);
    settle(PageKind::Middle, rows, remaining)
}

fn settle(kind: PageKind, rows: usize, remaining: usize) -> BreakDecision {
    if rows >= remaining {
        BreakDecision::Place {
            kind,
            rows: remaining,
        }
    } else {
        BreakDecision::Split { kind, rows }
    }
}
