//! The layout pipeline. One call to [`compute_layout`] runs, in order:
//! participant duplication, role indexing, grid placement, connector
//! routing, compartment sizing, sentinel removal, overall bounds and the
//! final translation to the origin.
//!
//! The pipeline mutates positions in place; computing the same
//! [`crate::model::Layout`] twice is not supported — build a fresh
//! aggregate per compute.

pub mod geometry;

mod compartments;
mod dedup;
mod grid;
mod index;
mod placement;
mod routing;
mod transform;

use crate::config::LayoutConfig;
use crate::model::Layout;
use crate::text_metrics::FontMetrics;

use index::LayoutIndex;

pub fn compute_layout(layout: &mut Layout, metrics: &dyn FontMetrics, config: &LayoutConfig) {
    dedup::add_duplicates(layout);
    let index = LayoutIndex::new(layout);
    placement::layout_participants(layout, &index, metrics, config);
    routing::layout_connectors(layout, &index, config);
    compartments::layout_compartments(layout, metrics, config);
    compartments::remove_extracellular(layout);
    compartments::compute_dimension(layout);
    compartments::move_to_origin(layout);
}
