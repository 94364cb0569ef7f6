//! Connector synthesis. Inputs enter the backbone's left port, outputs
//! leave from the right port, catalysts drop onto the reaction center from
//! above and regulators fan out over a semicircle anchored under it. All
//! paths are sequences of straight segments sharing endpoints.

use std::f64::consts::PI;

use crate::config::LayoutConfig;
use crate::layout::geometry::{Position, Segment};
use crate::layout::index::LayoutIndex;
use crate::layout::transform::entity_bounds;
use crate::model::{
    Connector, ConnectorPointer, EntityId, EntityRole, Layout, RenderableClass, Role,
    StoichiometryBadge,
};

pub(crate) fn layout_connectors(layout: &mut Layout, index: &LayoutIndex, config: &LayoutConfig) {
    input_connectors(layout, index, config);
    output_connectors(layout, index, config);
    catalyst_connectors(layout, index, config);
    regulator_connectors(layout, index, config);
}

/// Inputs share a vertical rule to the right of the widest input. Entities
/// that are also catalysts get three extra segments hooking over the top
/// of the diagram onto the reaction center.
fn input_connectors(layout: &mut Layout, index: &LayoutIndex, config: &LayoutConfig) {
    if index.inputs.is_empty() {
        return;
    }
    let reaction_position = layout.reaction.position;
    let rule = index
        .inputs
        .iter()
        .map(|&id| entity_bounds(&layout.entities[id]).max_x())
        .fold(f64::MIN, f64::max)
        + config.min_segment;
    let port = reaction_position.x - config.backbone_length;
    for &id in &index.inputs {
        let position = layout.entities[id].position;
        let bi_role = layout.entities[id].roles.len() > 1;
        let mut segments = Vec::new();
        if layout.entities[id].renderable_class == RenderableClass::Gene {
            // the gene arrow needs an extra jog before the rule
            segments.push(Segment::new(
                position.max_x() + 8.0,
                position.y,
                position.max_x() + 30.0,
                position.center_y(),
            ));
            segments.push(Segment::new(
                position.max_x() + 30.0,
                position.center_y(),
                rule,
                position.center_y(),
            ));
        } else {
            segments.push(Segment::new(
                position.max_x(),
                position.center_y(),
                rule,
                position.center_y(),
            ));
        }
        segments.push(Segment::new(
            rule,
            position.center_y(),
            port,
            reaction_position.center_y(),
        ));
        let pointer = if bi_role {
            let top = position.y.min(reaction_position.y) - 5.0;
            segments.push(Segment::new(
                position.center_x(),
                position.y,
                position.center_x(),
                top,
            ));
            segments.push(Segment::new(position.center_x(), top, rule + 50.0, top));
            segments.push(Segment::new(
                rule + 50.0,
                top,
                reaction_position.center_x(),
                reaction_position.center_y(),
            ));
            ConnectorPointer::Catalyst
        } else {
            ConnectorPointer::Input
        };
        let mut connector = Connector::new(pointer);
        // stoichiometry badges only ever come from the input role here
        let input_role = layout.entities[id].role(EntityRole::Input).copied();
        if let Some(role) = input_role {
            connector.stoichiometry = stoichiometry_badge(&segments, &role, config);
        }
        connector.segments = segments;
        layout.entities[id].connector = Some(connector);
    }
}

/// Mirror image of the input side; the rule leaves room for the arrowhead.
fn output_connectors(layout: &mut Layout, index: &LayoutIndex, config: &LayoutConfig) {
    if index.outputs.is_empty() {
        return;
    }
    let reaction_position = layout.reaction.position;
    let port = reaction_position.max_x() + config.backbone_length;
    let rule = index
        .outputs
        .iter()
        .map(|&id| entity_bounds(&layout.entities[id]).x)
        .fold(f64::MAX, f64::min)
        - config.min_segment
        - config.arrow_size;
    for &id in &index.outputs {
        let position = layout.entities[id].position;
        let segments = vec![
            Segment::new(position.x - 4.0, position.center_y(), rule, position.center_y()),
            Segment::new(
                rule,
                position.center_y(),
                port,
                reaction_position.center_y(),
            ),
        ];
        set_single_role_connector(layout, id, segments, config);
    }
}

/// Catalysts drop to a horizontal rule under the lowest catalyst, then dive
/// onto the reaction center.
fn catalyst_connectors(layout: &mut Layout, index: &LayoutIndex, config: &LayoutConfig) {
    if index.catalysts.is_empty() {
        return;
    }
    let reaction_position = layout.reaction.position;
    let rule = index
        .catalysts
        .iter()
        .map(|&id| entity_bounds(&layout.entities[id]).max_y())
        .fold(f64::MIN, f64::max)
        + config.min_segment;
    for &id in &index.catalysts {
        let position = layout.entities[id].position;
        let segments = vec![
            Segment::new(position.center_x(), position.max_y(), position.center_x(), rule),
            Segment::new(
                position.center_x(),
                rule,
                reaction_position.center_x(),
                reaction_position.center_y(),
            ),
        ];
        set_single_role_connector(layout, id, segments, config);
    }
}

/// Regulators connect to a semicircle under the reaction: `n` regulators
/// take the attachment angles `π·i/(n+1)` on a radius that grows with `n`
/// so the pointer boxes never touch.
fn regulator_connectors(layout: &mut Layout, index: &LayoutIndex, config: &LayoutConfig) {
    if index.regulators.is_empty() {
        return;
    }
    let reaction_position = layout.reaction.position;
    let rule = index
        .regulators
        .iter()
        .map(|&id| entity_bounds(&layout.entities[id]).y)
        .fold(f64::MAX, f64::min)
        - config.min_segment;
    let sectors = index.regulators.len() + 1;
    let radius =
        reaction_position.height / 2.0 + config.regulator_size * sectors as f64 / PI;
    let mut regulators: Vec<EntityId> = index.regulators.clone();
    regulators.sort_by(|&a, &b| {
        layout.entities[a]
            .position
            .center_x()
            .total_cmp(&layout.entities[b].position.center_x())
    });
    for (i, &id) in regulators.iter().enumerate() {
        let angle = PI * (i + 1) as f64 / sectors as f64;
        let x = reaction_position.center_x() - radius * angle.cos();
        let y = reaction_position.center_y() + radius * angle.sin();
        let position = layout.entities[id].position;
        let segments = vec![
            Segment::new(position.center_x(), position.max_y(), position.center_x(), rule),
            Segment::new(position.center_x(), rule, x, y),
        ];
        set_single_role_connector(layout, id, segments, config);
    }
}

/// Builds the connector for an entity with exactly one role: pointer and
/// badge both come from that role.
fn set_single_role_connector(
    layout: &mut Layout,
    id: EntityId,
    segments: Vec<Segment>,
    config: &LayoutConfig,
) {
    let role = layout.entities[id].roles[0];
    let mut connector = Connector::new(ConnectorPointer::for_role(role.kind));
    connector.stoichiometry = stoichiometry_badge(&segments, &role, config);
    connector.segments = segments;
    layout.entities[id].connector = Some(connector);
}

/// A labeled box on the midpoint of the segment departing the entity, only
/// when the stoichiometry is not one.
fn stoichiometry_badge(
    segments: &[Segment],
    role: &Role,
    config: &LayoutConfig,
) -> Option<StoichiometryBadge> {
    if role.stoichiometry == 1 {
        return None;
    }
    let center = segments.first()?.midpoint();
    let half = 0.5 * config.stoichiometry_box_size;
    Some(StoichiometryBadge {
        value: role.stoichiometry,
        shape: Position::new(
            center.x - half,
            center.y - half,
            config.stoichiometry_box_size,
            config.stoichiometry_box_size,
        ),
    })
}
