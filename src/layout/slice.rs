//! # Bitmap Slices
//!
//! Collaborators that capture the whole report as one image paint each page
//! by cutting a horizontal band out of that image. This module turns a
//! page's row range into that band: a source Y offset and height in bitmap
//! pixels, plus the height the band occupies once scaled to the output width.
//!
//! Boundaries are converted to pixels once per row boundary, so the bands of
//! consecutive pages tile the bitmap without gaps or overlaps.

use serde::Serialize;

use crate::config::SliceMode;
use crate::error::FolioError;
use crate::layout::heights::{RowMetrics, FIT_EPSILON};
use crate::layout::paginate::{Page, PagePlan};
use crate::model::{Bitmap, PageGeometry};

const PIXEL_EPSILON: f64 = 1e-6;

/// The bitmap band painted on one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSlice {
    pub source_y_offset: u32,
    pub source_height: u32,
    pub output_height: f64,
}

pub struct SliceCalculator<'a> {
    metrics: &'a RowMetrics,
    bitmap: Bitmap,
    output_width: f64,
    mode: SliceMode,
    /// Bitmap pixels per document unit.
    scale: f64,
}

impl<'a> SliceCalculator<'a> {
    pub fn new(
        metrics: &'a RowMetrics,
        bitmap: Bitmap,
        output_width: f64,
        mode: SliceMode,
    ) -> Result<Self, FolioError> {
        if bitmap.width == 0 || bitmap.height == 0 {
            return Err(FolioError::geometry(format!(
                "bitmap must be non-empty, got {}x{}",
                bitmap.width, bitmap.height
            )));
        }
        if !output_width.is_finite() || output_width <= 0.0 {
            return Err(FolioError::geometry(format!(
                "outputWidth must be a positive finite number, got {output_width}"
            )));
        }
        let document_height = metrics.document_height();
        if document_height <= 0.0 {
            return Err(FolioError::geometry(
                "document has no height to map onto the bitmap",
            ));
        }
        Ok(Self {
            metrics,
            bitmap,
            output_width,
            mode,
            scale: f64::from(bitmap.height) / document_height,
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Top and bottom of the page's band, in document units.
    pub fn source_span(&self, page: &Page) -> (f64, f64) {
        let with_bands = self.mode == SliceMode::WithBands;
        let top = if with_bands && page.includes_header {
            0.0
        } else {
            self.metrics.boundary_y(page.row_start)
        };
        let mut bottom = self.metrics.boundary_y(page.row_end);
        if with_bands && page.includes_footer {
            bottom += self.metrics.footer_height();
        }
        (top, bottom)
    }

    fn pixel(&self, y: f64) -> u32 {
        if y >= self.metrics.document_height() - FIT_EPSILON {
            return self.bitmap.height;
        }
        let px = (y * self.scale + PIXEL_EPSILON).floor().max(0.0);
        (px as u32).min(self.bitmap.height)
    }

    pub fn slice(&self, page: &Page) -> PageSlice {
        let (top, bottom) = self.source_span(page);
        let source_y_offset = self.pixel(top);
        let source_end = self.pixel(bottom).max(source_y_offset);
        let source_height = source_end - source_y_offset;
        PageSlice {
            source_y_offset,
            source_height,
            output_height: self.output_height(source_height),
        }
    }

    /// Height of `source_height` bitmap pixels once scaled to the output width.
    pub fn output_height(&self, source_height: u32) -> f64 {
        f64::from(source_height) * (self.output_width / f64::from(self.bitmap.width))
    }

    /// Vertical room a page offers its band.
    ///
    /// In `BodyOnly` mode the header and footer blocks are painted next to
    /// the band and take their share; in `WithBands` mode they are inside it.
    pub fn room_on(&self, page: &Page, geometry: &PageGeometry) -> f64 {
        let mut room = geometry.content_height() - geometry.reserved_trailer_height;
        if self.mode == SliceMode::BodyOnly {
            if page.includes_header {
                room -= self.metrics.header_height() + geometry.header_gap;
            }
            if page.includes_footer {
                room -= self.metrics.footer_height() + geometry.footer_gap;
            }
        }
        room
    }
}

/// Attach a slice to every page of `plan`, recording a warning for each
/// band that would overflow its page.
pub fn slice_pages(plan: &mut PagePlan, calculator: &SliceCalculator<'_>, geometry: &PageGeometry) {
    let mut overflows = Vec::new();
    for page in plan.pages.iter_mut() {
        let slice = calculator.slice(page);
        let room = calculator.room_on(page, geometry);
        if slice.output_height > room + PIXEL_EPSILON {
            overflows.push(format!(
                "page {} content is {:.2} tall but the page only has {:.2}",
                page.index + 1,
                slice.output_height,
                room
            ));
        }
        page.slice = Some(slice);
    }
    for msg in overflows {
        plan.warn(msg);
    }
}

/// Size of a bitmap scaled to fit a content box, keeping its aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitBox {
    pub width: f64,
    pub height: f64,
    /// Output units per bitmap pixel.
    pub scale: f64,
}

/// Fit a whole bitmap onto one page, for single-page output.
pub fn fit_to_page(
    bitmap: Bitmap,
    content_width: f64,
    content_height: f64,
) -> Result<FitBox, FolioError> {
    if bitmap.width == 0 || bitmap.height == 0 {
        return Err(FolioError::geometry("bitmap must be non-empty"));
    }
    let usable = |v: f64| v.is_finite() && v > 0.0;
    if !(usable(content_width) && usable(content_height)) {
        return Err(FolioError::geometry(format!(
            "content box must be positive and finite, got {content_width}x{content_height}"
        )));
    }
    let bitmap_aspect = f64::from(bitmap.width) / f64::from(bitmap.height);
    let page_aspect = content_width / content_height;
    let (width, height) = if bitmap_aspect > page_aspect {
        (content_width, content_width / bitmap_aspect)
    } else {
        (content_height * bitmap_aspect, content_height)
    };
    Ok(FitBox {
        width,
        height,
        scale: width / f64::from(bitmap.width),
    })
}
