//! Low-level glyph manipulation: sizing from renderable class and text,
//! bounds including attachments, and the translate/center operations every
//! pass goes through. Keeping all mutation here means a glyph, its
//! attachments, its connector and its backbone can never drift apart.

use crate::config::LayoutConfig;
use crate::layout::geometry::Position;
use crate::model::{
    CompartmentId, ContainedGlyph, EntityGlyph, Layout, ReactionGlyph, RenderableClass,
};
use crate::text_metrics::FontMetrics;

/// Sizes an entity box from its class and label, then distributes its
/// attachments along the right border.
pub(crate) fn set_entity_size(
    entity: &mut EntityGlyph,
    metrics: &dyn FontMetrics,
    config: &LayoutConfig,
) {
    let text_width = metrics.text_width(&entity.name);
    let text_height = metrics.text_height();
    let (width, height) = match entity.renderable_class {
        RenderableClass::Attachment => (config.attachment_size, config.attachment_size),
        RenderableClass::EncapsulatedNode
        | RenderableClass::ProcessNode
        | RenderableClass::EntitySet
        | RenderableClass::EntitySetDrug => (
            config.set_text_padding + text_width,
            config.set_text_padding + text_height,
        ),
        RenderableClass::Gene => (
            config.entity_text_padding + text_width,
            config.gene_arrow_height + text_height,
        ),
        _ => (
            config.entity_text_padding + text_width,
            config.entity_text_padding + text_height,
        ),
    };
    entity.position.width = width;
    entity.position.height = height;
    place_attachments(entity, config);
}

/// Attachments sit centered on the right border, evenly spaced.
fn place_attachments(entity: &mut EntityGlyph, config: &LayoutConfig) {
    let count = entity.attachments.len();
    if count == 0 {
        return;
    }
    let step = entity.position.height / (count as f64 + 1.0);
    let border_x = entity.position.max_x();
    for (i, attachment) in entity.attachments.iter_mut().enumerate() {
        attachment.position.width = config.attachment_size;
        attachment.position.height = config.attachment_size;
        attachment
            .position
            .set_center(border_x, entity.position.y + step * (i as f64 + 1.0));
    }
}

/// Sizes the reaction box and attaches the two backbone segments. The
/// segments translate with the glyph from here on.
pub(crate) fn set_reaction_size(reaction: &mut ReactionGlyph, config: &LayoutConfig) {
    reaction.position.width = config.reaction_size;
    reaction.position.height = config.reaction_size;
    reaction.segments.clear();
    let position = reaction.position;
    reaction.segments.push(crate::layout::geometry::Segment::new(
        position.x,
        position.center_y(),
        position.x - config.backbone_length,
        position.center_y(),
    ));
    reaction.segments.push(crate::layout::geometry::Segment::new(
        position.max_x(),
        position.center_y(),
        position.max_x() + config.backbone_length,
        position.center_y(),
    ));
}

/// The box that placement and sizing reason about: the entity plus its
/// attachments.
pub(crate) fn entity_bounds(entity: &EntityGlyph) -> Position {
    let mut bounds = entity.position;
    for attachment in &entity.attachments {
        bounds.union(attachment.position);
    }
    bounds
}

/// Reaction bounds include the backbone tips.
pub(crate) fn reaction_bounds(reaction: &ReactionGlyph) -> Position {
    let mut bounds = reaction.position;
    for segment in &reaction.segments {
        bounds.union(segment.bounds());
    }
    bounds
}

pub(crate) fn glyph_bounds(layout: &Layout, glyph: ContainedGlyph) -> Position {
    match glyph {
        ContainedGlyph::Entity(id) => entity_bounds(&layout.entities[id]),
        ContainedGlyph::Reaction => reaction_bounds(&layout.reaction),
    }
}

pub(crate) fn move_entity(entity: &mut EntityGlyph, dx: f64, dy: f64) {
    entity.position.translate(dx, dy);
    for attachment in &mut entity.attachments {
        attachment.position.translate(dx, dy);
    }
    if let Some(connector) = &mut entity.connector {
        for segment in &mut connector.segments {
            segment.translate(dx, dy);
        }
        if let Some(badge) = &mut connector.stoichiometry {
            badge.shape.translate(dx, dy);
        }
    }
}

pub(crate) fn move_reaction(reaction: &mut ReactionGlyph, dx: f64, dy: f64) {
    reaction.position.translate(dx, dy);
    for segment in &mut reaction.segments {
        segment.translate(dx, dy);
    }
}

pub(crate) fn move_glyph(layout: &mut Layout, glyph: ContainedGlyph, dx: f64, dy: f64) {
    match glyph {
        ContainedGlyph::Entity(id) => move_entity(&mut layout.entities[id], dx, dy),
        ContainedGlyph::Reaction => move_reaction(&mut layout.reaction, dx, dy),
    }
}

/// Centers a glyph's bounds (not just its box) on the given point.
pub(crate) fn center_glyph(layout: &mut Layout, glyph: ContainedGlyph, cx: f64, cy: f64) {
    let bounds = glyph_bounds(layout, glyph);
    move_glyph(layout, glyph, cx - bounds.center_x(), cy - bounds.center_y());
}

/// Translates a compartment subtree: the rectangle, the label anchor, every
/// directly contained glyph, then the children.
pub(crate) fn move_compartment(layout: &mut Layout, compartment: CompartmentId, dx: f64, dy: f64) {
    layout.compartments[compartment].position.translate(dx, dy);
    let label = &mut layout.compartments[compartment].label_position;
    label.x += dx;
    label.y += dy;
    let contained = layout.compartments[compartment].contained.clone();
    for glyph in contained {
        move_glyph(layout, glyph, dx, dy);
    }
    let children = layout.compartments[compartment].children.clone();
    for child in children {
        move_compartment(layout, child, dx, dy);
    }
}
