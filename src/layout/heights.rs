//! # Row Metrics
//!
//! Vertical positions of every row boundary in the full rendered report.
//! Built once per document and shared by the pagination engine (how many
//! rows fit, where the breaks fall) and the slice calculator (which pixels a
//! page covers).
//!
//! Uniform rows need no table: boundary `i` sits at `i * rowHeight`. Mixed
//! rows get a monotonic cumulative table of `n + 1` entries so that every
//! lookup is exact instead of accumulating rounding error page after page.

use crate::model::{Document, RowHeights};

/// Tolerance used when asking whether content "fits" in a height.
pub const FIT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
enum Rows {
    Uniform { height: f64, count: usize },
    /// `cum[i]` is the height of rows `0..i`; `cum.len() == count + 1`.
    Cumulative(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowMetrics {
    header_height: f64,
    footer_height: f64,
    rows: Rows,
}

impl RowMetrics {
    pub fn new(document: &Document) -> Self {
        let rows = match &document.rows {
            RowHeights::Uniform { count, height } => Rows::Uniform {
                height: *height,
                count: *count,
            },
            RowHeights::PerRow { heights, .. } => {
                let mut cum = Vec::with_capacity(heights.len() + 1);
                let mut running = 0.0;
                cum.push(running);
                for h in heights {
                    running += h;
                    cum.push(running);
                }
                Rows::Cumulative(cum)
            }
        };
        Self {
            header_height: document.header_height,
            footer_height: document.footer_height,
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        match &self.rows {
            Rows::Uniform { count, .. } => *count,
            Rows::Cumulative(cum) => cum.len() - 1,
        }
    }

    pub fn uniform_height(&self) -> Option<f64> {
        match &self.rows {
            Rows::Uniform { height, .. } => Some(*height),
            Rows::Cumulative(_) => None,
        }
    }

    pub fn header_height(&self) -> f64 {
        self.header_height
    }

    pub fn footer_height(&self) -> f64 {
        self.footer_height
    }

    /// Height of rows `0..row`. `row` is clamped to the row count.
    pub fn offset(&self, row: usize) -> f64 {
        let row = row.min(self.row_count());
        match &self.rows {
            Rows::Uniform { height, .. } => row as f64 * height,
            Rows::Cumulative(cum) => cum[row],
        }
    }

    /// Height of rows `start..end`.
    pub fn span(&self, start: usize, end: usize) -> f64 {
        if end <= start {
            return 0.0;
        }
        self.offset(end) - self.offset(start)
    }

    pub fn body_height(&self) -> f64 {
        self.offset(self.row_count())
    }

    /// Header + body + footer.
    pub fn document_height(&self) -> f64 {
        self.header_height + self.body_height() + self.footer_height
    }

    /// Y of the boundary above `row`, measured from the top of the header.
    pub fn boundary_y(&self, row: usize) -> f64 {
        self.header_height + self.offset(row)
    }

    /// Fraction (0..1) of the document height at which the boundary above
    /// `row` sits.
    pub fn normalized_y(&self, row: usize) -> f64 {
        let total = self.document_height();
        if total <= 0.0 {
            return 0.0;
        }
        match &self.rows {
            Rows::Uniform { count, .. } => {
                let header_ratio = self.header_height / total;
                if *count == 0 {
                    return header_ratio;
                }
                let footer_ratio = self.footer_height / total;
                let data_ratio = 1.0 - header_ratio - footer_ratio;
                let processed = row.min(*count) as f64 / *count as f64;
                header_ratio + processed * data_ratio
            }
            Rows::Cumulative(_) => self.boundary_y(row) / total,
        }
    }

    /// How many rows starting at `start` fit in `available`.
    ///
    /// Never more than the rows left after `start`; zero when `available` is
    /// negative.
    pub fn rows_fitting(&self, start: usize, available: f64) -> usize {
        let left = self.row_count().saturating_sub(start);
        if available < 0.0 || left == 0 {
            return 0;
        }
        match &self.rows {
            Rows::Uniform { height, .. } => max_rows(available, *height).min(left),
            Rows::Cumulative(cum) => {
                let base = cum[start];
                let fitting = cum[start..].partition_point(|&c| c - base <= available + FIT_EPSILON);
                fitting.saturating_sub(1)
            }
        }
    }
}

/// `floor(available / row_height)`, zero for negative space.
pub fn max_rows(available: f64, row_height: f64) -> usize {
    if available <= 0.0 || row_height <= 0.0 {
        return 0;
    }
    (available / row_height + FIT_EPSILON).floor() as usize
}
