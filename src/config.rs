//! Typed job configuration.
//!
//! Every optional field has an explicit default here rather than being
//! filled in ad hoc at the use site.

use serde::{Deserialize, Serialize};

use crate::model::{
    Bitmap, CandidateRegion, Document, Edges, GridBounds, MergeLimits, Orientation, PageGeometry,
    PageSize,
};

/// Page setup as a page-geometry collaborator describes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSetup {
    #[serde(default)]
    pub size: PageSize,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default = "default_margins")]
    pub margins: Edges,
    #[serde(default = "default_trailer")]
    pub reserved_trailer_height: f64,
    #[serde(default = "default_safety")]
    pub safety_margin: f64,
    #[serde(default)]
    pub header_gap: f64,
    #[serde(default)]
    pub footer_gap: f64,
}

fn default_margins() -> Edges {
    Edges::uniform(15.0)
}

fn default_trailer() -> f64 {
    15.0
}

fn default_safety() -> f64 {
    8.0
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            orientation: Orientation::Portrait,
            margins: default_margins(),
            reserved_trailer_height: default_trailer(),
            safety_margin: default_safety(),
            header_gap: 0.0,
            footer_gap: 0.0,
        }
    }
}

impl PageSetup {
    /// Oriented (width, height) of the page.
    pub fn dimensions(&self) -> (f64, f64) {
        self.orientation.apply(self.size.dimensions())
    }

    pub fn content_width(&self) -> f64 {
        self.dimensions().0 - self.margins.horizontal()
    }

    /// Resolve into the vertical geometry the planner works with.
    pub fn geometry(&self) -> PageGeometry {
        let (_, height) = self.dimensions();
        PageGeometry {
            page_height: height,
            margin_top: self.margins.top,
            margin_bottom: self.margins.bottom,
            reserved_trailer_height: self.reserved_trailer_height,
            safety_margin: self.safety_margin,
            header_gap: self.header_gap,
            footer_gap: self.footer_gap,
        }
    }
}

/// Which part of the captured bitmap a page slice covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SliceMode {
    /// Only the page's body rows. Header and footer are painted separately.
    #[default]
    BodyOnly,
    /// Body rows plus the header band on the header page and the footer band
    /// on the footer page.
    WithBands,
}

/// A pagination request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanJob {
    pub document: Document,

    #[serde(default)]
    pub page: PageSetup,

    /// Explicit geometry. When present it wins over `page`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<PageGeometry>,

    /// Captured bitmap of the report. When present every page gets a slice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitmap: Option<Bitmap>,

    /// Output width of a slice. Defaults to the content width of `page`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_width: Option<f64>,

    #[serde(default)]
    pub slice_mode: SliceMode,
}

impl PlanJob {
    pub fn new(document: Document, geometry: PageGeometry) -> Self {
        Self {
            document,
            page: PageSetup::default(),
            geometry: Some(geometry),
            bitmap: None,
            output_width: None,
            slice_mode: SliceMode::BodyOnly,
        }
    }

    pub fn resolved_geometry(&self) -> PageGeometry {
        self.geometry.unwrap_or_else(|| self.page.geometry())
    }

    pub fn resolved_output_width(&self) -> f64 {
        self.output_width.unwrap_or_else(|| self.page.content_width())
    }
}

/// A merge validation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeJob {
    pub candidates: Vec<CandidateRegion>,
    #[serde(default)]
    pub bounds: GridBounds,
    #[serde(default)]
    pub limits: MergeLimits,
}
