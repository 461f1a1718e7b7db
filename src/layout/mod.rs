//! # Layout Pipeline
//!
//! This is where the pages get decided.
//!
//! ```text
//! Document + PageGeometry
//!       ↓
//!   [heights]   cumulative row boundaries
//!       ↓
//!   [capacity]  room (and, for uniform rows, max rows) per page kind
//!       ↓
//!   [paginate]  walk the rows page by page via [page_break]
//!       ↓
//!   [slice]     optional: cut a captured bitmap into per-page bands
//! ```
//!
//! Every step is a pure function of its inputs. A failure anywhere fails the
//! whole plan; there is no partial result.

pub mod capacity;
pub mod heights;
pub mod page_break;
pub mod paginate;
pub mod slice;

use tracing::debug;

use crate::config::PlanJob;
use crate::error::FolioError;
use crate::model::{Document, PageGeometry};

use capacity::{plan_capacities, AvailableHeights};
use heights::RowMetrics;
use page_break::{MeasuredBudget, UniformBudget};
use paginate::{break_points, paginate, PagePlan};
use slice::{slice_pages, SliceCalculator};

/// Split `document` into pages of `geometry`.
pub fn plan_pages(document: &Document, geometry: &PageGeometry) -> Result<PagePlan, FolioError> {
    document.validate()?;
    let metrics = RowMetrics::new(document);
    plan_with_metrics(document, geometry, &metrics)
}

fn plan_with_metrics(
    document: &Document,
    geometry: &PageGeometry,
    metrics: &RowMetrics,
) -> Result<PagePlan, FolioError> {
    let available =
        AvailableHeights::compute(document.header_height, document.footer_height, geometry)?;
    let total_rows = metrics.row_count();

    let (capacities, pages) = match metrics.uniform_height() {
        Some(row_height) => {
            let capacities = plan_capacities(
                document.header_height,
                document.footer_height,
                row_height,
                geometry,
            )?;
            let budget = UniformBudget {
                capacities,
                available,
                row_height,
            };
            (Some(capacities), paginate(&budget, total_rows)?)
        }
        None => {
            let budget = MeasuredBudget {
                available,
                metrics,
            };
            (None, paginate(&budget, total_rows)?)
        }
    };

    let mut plan = PagePlan {
        total_rows,
        document_height: metrics.document_height(),
        available,
        capacities,
        break_points: break_points(&pages, metrics),
        pages,
        warnings: Vec::new(),
    };

    let spilled = plan
        .pages
        .last()
        .filter(|last| last.index > 0 && last.row_count() == 0 && last.includes_footer)
        .map(|last| last.index + 1);
    if let Some(page) = spilled {
        plan.warn(format!(
            "footer did not fit below the last rows; moved to page {page}"
        ));
    }

    debug!(
        pages = plan.page_count(),
        rows = total_rows,
        height = plan.document_height,
        "plan complete"
    );
    Ok(plan)
}

/// Run a full [`PlanJob`]: paginate and, when a bitmap was supplied, slice.
pub fn plan_job(job: &PlanJob) -> Result<PagePlan, FolioError> {
    job.document.validate()?;
    let geometry = job.resolved_geometry();
    let metrics = RowMetrics::new(&job.document);
    let mut plan = plan_with_metrics(&job.document, &geometry, &metrics)?;

    if let Some(bitmap) = job.bitmap {
        let calculator =
            SliceCalculator::new(&metrics, bitmap, job.resolved_output_width(), job.slice_mode)?;
        slice_pages(&mut plan, &calculator, &geometry);
    }
    Ok(plan)
}
