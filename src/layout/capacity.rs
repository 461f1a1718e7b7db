//! # Page Capacity
//!
//! How many body rows the first, middle and last page can hold.
//!
//! Every page loses its margins, the reserved trailer (page-number text) and
//! a safety margin. The first page additionally carries the header block,
//! the last page the footer block:
//!
//! ```text
//! base   = pageHeight - marginTop - marginBottom - reservedTrailer - safety
//! first  = base - header - headerGap
//! middle = base
//! last   = base - footer - footerGap
//! ```
//!
//! A header that nearly fills the page gives `first_page_max_rows == 0`.
//! That is not an error; the engine puts the header alone on page 0.

use serde::Serialize;
use tracing::debug;

use crate::error::FolioError;
use crate::layout::heights::max_rows;
use crate::model::PageGeometry;

/// Which rows-per-page budget applies to a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageKind {
    /// Page 0, below the header.
    First,
    /// Neither header nor footer.
    Middle,
    /// The terminal page, above the footer.
    Last,
}

/// Height left for body rows on each kind of page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableHeights {
    pub first: f64,
    pub middle: f64,
    pub last: f64,
}

impl AvailableHeights {
    pub fn compute(
        header_height: f64,
        footer_height: f64,
        geometry: &PageGeometry,
    ) -> Result<Self, FolioError> {
        geometry.validate()?;
        let base = geometry.base_height();
        Ok(Self {
            first: base - header_height - geometry.header_gap,
            middle: base,
            last: base - footer_height - geometry.footer_gap,
        })
    }

    pub fn for_kind(&self, kind: PageKind) -> f64 {
        match kind {
            PageKind::First => self.first,
            PageKind::Middle => self.middle,
            PageKind::Last => self.last,
        }
    }

    /// Height the footer block and its gap take from a page.
    pub fn footer_block(&self) -> f64 {
        self.middle - self.last
    }

    /// Height left for rows on a page of `kind` that must also carry the
    /// footer. Page 0 keeps its header; every other page becomes a last page.
    pub fn with_footer(&self, kind: PageKind) -> f64 {
        match kind {
            PageKind::First => self.first - self.footer_block(),
            PageKind::Middle | PageKind::Last => self.last,
        }
    }
}

/// Maximum body rows per page kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCapacities {
    pub first_page_max_rows: usize,
    pub middle_page_max_rows: usize,
    pub last_page_max_rows: usize,
}

impl PageCapacities {
    pub fn from_available(available: &AvailableHeights, row_height: f64) -> Self {
        Self {
            first_page_max_rows: max_rows(available.first, row_height),
            middle_page_max_rows: max_rows(available.middle, row_height),
            last_page_max_rows: max_rows(available.last, row_height),
        }
    }

    pub fn for_kind(&self, kind: PageKind) -> usize {
        match kind {
            PageKind::First => self.first_page_max_rows,
            PageKind::Middle => self.middle_page_max_rows,
            PageKind::Last => self.last_page_max_rows,
        }
    }
}

/// Compute first/middle/last page capacities for uniform rows.
///
/// Fails with `InvalidGeometry` when `row_height <= 0`, when the margins
/// leave no page, or when any input is negative or non-finite.
pub fn plan_capacities(
    header_height: f64,
    footer_height: f64,
    row_height: f64,
    geometry: &PageGeometry,
) -> Result<PageCapacities, FolioError> {
    if !row_height.is_finite() || row_height <= 0.0 {
        return Err(FolioError::geometry(format!(
            "rowHeight must be a positive finite number, got {row_height}"
        )));
    }
    for (name, v) in [("headerHeight", header_height), ("footerHeight", footer_height)] {
        if !v.is_finite() || v < 0.0 {
            return Err(FolioError::geometry(format!(
                "{name} must be a non-negative finite number, got {v}"
            )));
        }
    }

    let available = AvailableHeights::compute(header_height, footer_height, geometry)?;
    let capacities = PageCapacities::from_available(&available, row_height);
    debug!(
        first = capacities.first_page_max_rows,
        middle = capacities.middle_page_max_rows,
        last = capacities.last_page_max_rows,
        base = available.middle,
        "page capacities"
    );
    Ok(capacities)
}
