//! Participant duplication. Entities whose roles sit on opposite sides of
//! the reaction cannot be drawn as one glyph, so they are split in two with
//! disjoint role sets. Running the pass twice is a no-op.

use crate::model::{ContainedGlyph, EntityRole, Layout};

/// Splits every entity carrying an incompatible role pair. The copy joins
/// the same compartment as the original.
pub(crate) fn add_duplicates(layout: &mut Layout) {
    let mut added = Vec::new();
    for (id, entity) in layout.entities.iter_mut().enumerate() {
        if entity.roles.len() < 2 {
            continue;
        }
        let kinds = role_kinds(entity.roles.iter().map(|role| role.kind));
        let split = if kinds == role_kinds([EntityRole::Input, EntityRole::Output])
            || kinds == role_kinds([EntityRole::Catalyst, EntityRole::PositiveRegulator])
            || kinds == role_kinds([EntityRole::Catalyst, EntityRole::NegativeRegulator])
        {
            // Two opposite roles: the first stays on the copy, the rest on
            // the original.
            Some(entity.roles.remove(0))
        } else if kinds
            == role_kinds([
                EntityRole::Catalyst,
                EntityRole::PositiveRegulator,
                EntityRole::NegativeRegulator,
            ]) {
            // Catalyst plus both regulator roles: peel off the catalyst,
            // the original keeps the regulators.
            entity
                .roles
                .iter()
                .position(|role| role.kind == EntityRole::Catalyst)
                .map(|at| entity.roles.remove(at))
        } else {
            None
        };
        if let Some(role) = split {
            added.push((id, entity.split_off(role)));
        }
    }
    for (source, copy) in added {
        let compartment = layout.entities[source].compartment;
        let id = layout.entities.len();
        layout.entities.push(copy);
        layout.compartments[compartment]
            .contained
            .push(ContainedGlyph::Entity(id));
    }
}

fn role_kinds(kinds: impl IntoIterator<Item = EntityRole>) -> Vec<EntityRole> {
    let mut kinds: Vec<EntityRole> = kinds.into_iter().collect();
    kinds.sort_by_key(|kind| *kind as u8);
    kinds.dedup();
    kinds
}
