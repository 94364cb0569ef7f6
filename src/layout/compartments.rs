//! Compartment sizing and layout finalization: grow every compartment
//! around its contents, drop a label in its bottom-right corner, compute
//! the overall bounds and translate the whole diagram to the origin.

use crate::config::LayoutConfig;
use crate::layout::geometry::{Bounds, Coordinate, Position};
use crate::layout::transform::{
    entity_bounds, move_compartment, reaction_bounds,
};
use crate::model::{CompartmentId, ContainedGlyph, EntityRole, Layout};
use crate::text_metrics::FontMetrics;

pub(crate) fn layout_compartments(
    layout: &mut Layout,
    metrics: &dyn FontMetrics,
    config: &LayoutConfig,
) {
    size_compartment(layout, layout.root, metrics, config);
}

/// Post-order: each compartment wraps its children and its directly
/// contained glyphs plus padding. The reaction gets generous clearance and
/// input/catalyst hooks are pulled inside the rectangle.
fn size_compartment(
    layout: &mut Layout,
    compartment: CompartmentId,
    metrics: &dyn FontMetrics,
    config: &LayoutConfig,
) {
    let children = layout.compartments[compartment].children.clone();
    for child in &children {
        size_compartment(layout, *child, metrics, config);
    }
    let mut bounds = Bounds::default();
    for child in children {
        bounds.add(layout.compartments[child].position);
    }
    for glyph in layout.compartments[compartment].contained.clone() {
        match glyph {
            ContainedGlyph::Reaction => bounds.add(
                reaction_bounds(&layout.reaction).padded_by(80.0, 40.0),
            ),
            ContainedGlyph::Entity(id) => {
                let entity = &layout.entities[id];
                bounds.add(entity_bounds(entity));
                if entity.has_role(EntityRole::Catalyst) && entity.has_role(EntityRole::Input) {
                    // enclose the hook that runs over the top of the diagram
                    let mut top = entity.position.y;
                    if let Some(connector) = &entity.connector {
                        for segment in &connector.segments {
                            top = top.min(segment.from.y);
                        }
                    }
                    bounds.add(Position::new(entity.position.x, top, 1.0, 1.0));
                }
            }
        }
    }
    let mut position = bounds
        .get()
        .unwrap_or_default()
        .padded(config.compartment_padding);

    let text_width = metrics.text_width(&layout.compartments[compartment].name);
    let text_height = metrics.text_height();
    let label_width = text_width + 30.0;
    if position.width < label_width {
        let diff = label_width - position.width;
        position.width = label_width;
        position.x -= 0.5 * diff;
    }
    layout.compartments[compartment].label_position = Coordinate::new(
        position.max_x() - text_width - 15.0,
        position.max_y() + 0.5 * text_height - config.compartment_padding,
    );
    layout.compartments[compartment].position = position;
}

/// The sentinel stays as the structural parent, but disappears from the
/// emitted compartment set before bounds are computed.
pub(crate) fn remove_extracellular(layout: &mut Layout) {
    layout.strip_sentinel();
}

/// Overall bounds: every emitted compartment, every entity with its
/// connector extents, and the reaction.
pub(crate) fn compute_dimension(layout: &mut Layout) {
    let mut bounds = Bounds::default();
    for compartment in layout.emitted_compartments() {
        bounds.add(layout.compartments[compartment].position);
    }
    for entity in &layout.entities {
        bounds.add(entity_bounds(entity));
        if let Some(connector) = &entity.connector {
            for segment in &connector.segments {
                bounds.add(segment.bounds());
            }
            if let Some(badge) = &connector.stoichiometry {
                bounds.add(badge.shape);
            }
        }
    }
    bounds.add(reaction_bounds(&layout.reaction));
    layout.position = bounds.get().unwrap_or_default();
}

/// Shifts the whole diagram so the layout origin is `(0, 0)`.
pub(crate) fn move_to_origin(layout: &mut Layout) {
    let dx = -layout.position.x;
    let dy = -layout.position.y;
    layout.position.translate(dx, dy);
    move_compartment(layout, layout.root, dx, dy);
}
