//! # Report Model
//!
//! The measured inputs folio plans against. A rendering collaborator measures
//! a report once (header block, body rows, footer block) and hands those
//! heights over; folio never touches pixels or DOM itself.
//!
//! Everything here is an immutable value created once per export call. All
//! lengths share one linear unit (mm or px), whichever the caller measures in.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FolioError;

/// A rendered report reduced to its measured heights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Height of the header block shown once, at the top of page 0.
    #[serde(default)]
    pub header_height: f64,

    /// Height of the footer block shown once, on the terminal page.
    #[serde(default)]
    pub footer_height: f64,

    /// Body rows, either one shared height or one height per row.
    #[serde(flatten)]
    pub rows: RowHeights,
}

/// Body row heights.
///
/// In JSON this is either `"totalRows": N, "rowHeight": h` or
/// `"rowHeights": [h0, h1, ...]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowHeights {
    /// Heterogeneous rows. A `totalRows` sent alongside must match the
    /// number of heights.
    PerRow {
        #[serde(rename = "rowHeights")]
        heights: Vec<f64>,
        #[serde(rename = "totalRows", default, skip_serializing_if = "Option::is_none")]
        declared: Option<usize>,
    },
    /// `count` rows of identical `height`.
    Uniform {
        #[serde(rename = "totalRows")]
        count: usize,
        #[serde(rename = "rowHeight")]
        height: f64,
    },
}

impl Document {
    pub fn uniform(header_height: f64, footer_height: f64, total_rows: usize, row_height: f64) -> Self {
        Self {
            header_height,
            footer_height,
            rows: RowHeights::Uniform {
                count: total_rows,
                height: row_height,
            },
        }
    }

    pub fn per_row(header_height: f64, footer_height: f64, heights: Vec<f64>) -> Self {
        Self {
            header_height,
            footer_height,
            rows: RowHeights::PerRow {
                heights,
                declared: None,
            },
        }
    }

    pub fn total_rows(&self) -> usize {
        match &self.rows {
            RowHeights::PerRow { heights, .. } => heights.len(),
            RowHeights::Uniform { count, .. } => *count,
        }
    }

    /// The shared row height, if every row has the same one.
    pub fn uniform_row_height(&self) -> Option<f64> {
        match &self.rows {
            RowHeights::Uniform { height, .. } => Some(*height),
            RowHeights::PerRow { .. } => None,
        }
    }

    /// Reject heights no plan can be computed from.
    pub fn validate(&self) -> Result<(), FolioError> {
        non_negative("headerHeight", self.header_height)?;
        non_negative("footerHeight", self.footer_height)?;
        match &self.rows {
            RowHeights::Uniform { count, height } => {
                positive("rowHeight", *height)?;
                within_row_limit(*count)
            }
            RowHeights::PerRow { heights, declared } => {
                if let Some(n) = declared.filter(|n| *n != heights.len()) {
                    return Err(FolioError::geometry(format!(
                        "totalRows {n} does not match the {} entries of rowHeights",
                        heights.len()
                    )));
                }
                within_row_limit(heights.len())?;
                for (i, h) in heights.iter().enumerate() {
                    if !h.is_finite() || *h <= 0.0 {
                        return Err(FolioError::geometry(format!(
                            "rowHeights[{i}] must be a positive finite number, got {h}"
                        )));
                    }
                }
                Ok(())
            }
        }
    }
}

/// Vertical page geometry, in the same unit as the [`Document`] heights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub page_height: f64,
    #[serde(default)]
    pub margin_top: f64,
    #[serde(default)]
    pub margin_bottom: f64,
    /// Space kept free at the bottom of every page for page-number text.
    #[serde(default)]
    pub reserved_trailer_height: f64,
    #[serde(default)]
    pub safety_margin: f64,
    /// Gap between the header block and the first body row.
    #[serde(default)]
    pub header_gap: f64,
    /// Gap between the last body row and the footer block.
    #[serde(default)]
    pub footer_gap: f64,
}

impl PageGeometry {
    pub fn new(
        page_height: f64,
        margin_top: f64,
        margin_bottom: f64,
        reserved_trailer_height: f64,
        safety_margin: f64,
    ) -> Self {
        Self {
            page_height,
            margin_top,
            margin_bottom,
            reserved_trailer_height,
            safety_margin,
            header_gap: 0.0,
            footer_gap: 0.0,
        }
    }

    pub fn with_gaps(mut self, header_gap: f64, footer_gap: f64) -> Self {
        self.header_gap = header_gap;
        self.footer_gap = footer_gap;
        self
    }

    /// Height between the margins, before any reservation.
    pub fn content_height(&self) -> f64 {
        self.page_height - self.margin_top - self.margin_bottom
    }

    /// Height left for header, rows and footer on any page.
    pub fn base_height(&self) -> f64 {
        self.content_height() - self.reserved_trailer_height - self.safety_margin
    }

    pub fn validate(&self) -> Result<(), FolioError> {
        positive("pageHeight", self.page_height)?;
        non_negative("marginTop", self.margin_top)?;
        non_negative("marginBottom", self.margin_bottom)?;
        non_negative("reservedTrailerHeight", self.reserved_trailer_height)?;
        non_negative("safetyMargin", self.safety_margin)?;
        non_negative("headerGap", self.header_gap)?;
        non_negative("footerGap", self.footer_gap)?;
        if self.page_height <= self.margin_top + self.margin_bottom {
            return Err(FolioError::geometry(format!(
                "pageHeight {} leaves no room between margins {} + {}",
                self.page_height, self.margin_top, self.margin_bottom
            )));
        }
        Ok(())
    }
}

/// Most body rows a single document may carry.
pub const MAX_ROWS: usize = 100_000_000;

fn within_row_limit(count: usize) -> Result<(), FolioError> {
    if count > MAX_ROWS {
        return Err(FolioError::geometry(format!(
            "totalRows {count} exceeds the limit of {MAX_ROWS}"
        )));
    }
    Ok(())
}

fn non_negative(name: &str, v: f64) -> Result<(), FolioError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(FolioError::geometry(format!(
            "{name} must be a non-negative finite number, got {v}"
        )))
    }
}

fn positive(name: &str, v: f64) -> Result<(), FolioError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(FolioError::geometry(format!(
            "{name} must be a positive finite number, got {v}"
        )))
    }
}

/// Standard page sizes in millimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns portrait (width, height) in millimetres.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::A3 => (297.0, 420.0),
            PageSize::A5 => (148.0, 210.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Legal => (215.9, 355.6),
            PageSize::Tabloid => (279.4, 431.8),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Orient portrait (width, height) dimensions.
    pub fn apply(&self, (w, h): (f64, f64)) -> (f64, f64) {
        match self {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Edge values (top, right, bottom, left) used for page margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// A captured image of the whole report, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
}

// ── Grid ────────────────────────────────────────────────────────────

/// Last valid row and column of a grid, both inclusive and zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridBounds {
    pub max_row: u32,
    pub max_col: u32,
}

impl GridBounds {
    /// Spreadsheet worksheet limits (1,048,576 rows by 16,384 columns).
    pub const SPREADSHEET: GridBounds = GridBounds {
        max_row: 1_048_575,
        max_col: 16_383,
    };

    /// Bounds for a grid of `rows` by `cols` cells.
    pub fn for_size(rows: u32, cols: u32) -> Self {
        Self {
            max_row: rows.saturating_sub(1),
            max_col: cols.saturating_sub(1),
        }
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self::SPREADSHEET
    }
}

/// A validated rectangular merge: inclusive, zero-based cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRegion {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl MergeRegion {
    pub fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    /// Number of rows spanned.
    pub fn rows(&self) -> u64 {
        u64::from(self.end_row) - u64::from(self.start_row) + 1
    }

    /// Number of columns spanned.
    pub fn cols(&self) -> u64 {
        u64::from(self.end_col) - u64::from(self.start_col) + 1
    }

    pub fn is_single_cell(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }

    /// Do the two rectangles share at least one cell?
    pub fn intersects(&self, other: &MergeRegion) -> bool {
        let rows_apart = self.end_row < other.start_row || self.start_row > other.end_row;
        let cols_apart = self.end_col < other.start_col || self.start_col > other.end_col;
        !rows_apart && !cols_apart
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.start_row..=self.end_row).contains(&row) && (self.start_col..=self.end_col).contains(&col)
    }
}

impl fmt::Display for MergeRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            crate::grid::a1::cell_ref(self.start_row, self.start_col),
            crate::grid::a1::cell_ref(self.end_row, self.end_col)
        )
    }
}

/// A merge candidate as supplied by a grid-export collaborator.
///
/// Coordinates are kept as raw JSON values so that missing, null, string or
/// fractional coordinates can be reported as malformed instead of failing
/// the whole parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRegion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_row: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_col: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_row: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_col: Option<serde_json::Value>,
}

impl CandidateRegion {
    pub fn new(start_row: i64, start_col: i64, end_row: i64, end_col: i64) -> Self {
        Self {
            start_row: Some(start_row.into()),
            start_col: Some(start_col.into()),
            end_row: Some(end_row.into()),
            end_col: Some(end_col.into()),
        }
    }
}

impl From<MergeRegion> for CandidateRegion {
    fn from(r: MergeRegion) -> Self {
        Self::new(
            i64::from(r.start_row),
            i64::from(r.start_col),
            i64::from(r.end_row),
            i64::from(r.end_col),
        )
    }
}

/// Optional caps on how large a single merge may be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeLimits {
    #[serde(default)]
    pub max_rows: Option<u32>,
    #[serde(default)]
    pub max_cols: Option<u32>,
}
