//! Read-only partition of entities by role, in the order tiles consume
//! them: multi-role glyphs first, trivial molecules last, classes in the
//! fixed preference order.

use std::cmp::Ordering;

use crate::model::{EntityGlyph, EntityId, EntityRole, Layout, RenderableClass};

#[derive(Debug, Default)]
pub(crate) struct LayoutIndex {
    pub inputs: Vec<EntityId>,
    pub outputs: Vec<EntityId>,
    pub catalysts: Vec<EntityId>,
    pub regulators: Vec<EntityId>,
}

impl LayoutIndex {
    pub fn new(layout: &Layout) -> Self {
        let mut index = LayoutIndex::default();
        for (id, entity) in layout.entities.iter().enumerate() {
            for role in &entity.roles {
                match role.kind {
                    EntityRole::Input => index.inputs.push(id),
                    EntityRole::Output => index.outputs.push(id),
                    EntityRole::Catalyst => index.catalysts.push(id),
                    EntityRole::NegativeRegulator | EntityRole::PositiveRegulator => {
                        index.regulators.push(id)
                    }
                }
            }
        }
        // An entity that is both an input and a catalyst (or regulator) is
        // drawn once, on the input side; its extra role only shows in the
        // connector hook.
        index
            .catalysts
            .retain(|&id| !layout.entities[id].has_role(EntityRole::Input));
        index
            .regulators
            .retain(|&id| !layout.entities[id].has_role(EntityRole::Input));
        for list in [
            &mut index.inputs,
            &mut index.outputs,
            &mut index.catalysts,
            &mut index.regulators,
        ] {
            list.dedup();
            list.sort_by(|a, b| tile_order(&layout.entities[*a], &layout.entities[*b]));
        }
        index
    }
}

/// Ordering of glyphs inside one tile.
pub(crate) fn tile_order(a: &EntityGlyph, b: &EntityGlyph) -> Ordering {
    b.roles
        .len()
        .cmp(&a.roles.len())
        .then(a.trivial.cmp(&b.trivial))
        .then(class_rank(a.renderable_class).cmp(&class_rank(b.renderable_class)))
}

/// Fixed preference order of renderable classes; drug variants rank with
/// their base class.
pub(crate) fn class_rank(class: RenderableClass) -> usize {
    match class {
        RenderableClass::ProcessNode => 0,
        RenderableClass::EncapsulatedNode => 1,
        RenderableClass::Complex | RenderableClass::ComplexDrug => 2,
        RenderableClass::EntitySet | RenderableClass::EntitySetDrug => 3,
        RenderableClass::Protein | RenderableClass::ProteinDrug => 4,
        RenderableClass::Rna | RenderableClass::RnaDrug => 5,
        RenderableClass::Chemical | RenderableClass::ChemicalDrug => 6,
        RenderableClass::Gene => 7,
        RenderableClass::Entity | RenderableClass::Attachment => 8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::Position;
    use crate::model::{
        CompartmentGlyph, ContainedGlyph, ReactionClass, ReactionGlyph, Role,
    };

    fn entity(name: &str, class: RenderableClass, roles: Vec<Role>, trivial: bool) -> EntityGlyph {
        EntityGlyph {
            st_id: name.to_string(),
            name: name.to_string(),
            renderable_class: class,
            roles,
            trivial,
            crossed: false,
            dashed: false,
            drug: false,
            disease: false,
            attachments: Vec::new(),
            compartment: 0,
            position: Position::default(),
            connector: None,
        }
    }

    fn layout(entities: Vec<EntityGlyph>) -> Layout {
        let mut root = CompartmentGlyph::new(
            "GO:0005576".to_string(),
            "extracellular region".to_string(),
            None,
        );
        for id in 0..entities.len() {
            root.contained.push(ContainedGlyph::Entity(id));
        }
        root.contained.push(ContainedGlyph::Reaction);
        let reaction = ReactionGlyph {
            st_id: "R-1".to_string(),
            name: "r".to_string(),
            class: ReactionClass::Transition,
            compartment: 0,
            position: Position::default(),
            segments: Vec::new(),
        };
        Layout::new(reaction, entities, vec![root], 0)
    }

    #[test]
    fn roles_partition_into_four_lists() {
        let layout = layout(vec![
            entity("a", RenderableClass::Protein, vec![Role::new(EntityRole::Input, 1)], false),
            entity("b", RenderableClass::Protein, vec![Role::new(EntityRole::Output, 1)], false),
            entity("c", RenderableClass::Protein, vec![Role::new(EntityRole::Catalyst, 1)], false),
            entity(
                "d",
                RenderableClass::Protein,
                vec![Role::new(EntityRole::NegativeRegulator, 1)],
                false,
            ),
            entity(
                "e",
                RenderableClass::Protein,
                vec![Role::new(EntityRole::PositiveRegulator, 1)],
                false,
            ),
        ]);
        let index = LayoutIndex::new(&layout);
        assert_eq!(index.inputs, vec![0]);
        assert_eq!(index.outputs, vec![1]);
        assert_eq!(index.catalysts, vec![2]);
        assert_eq!(index.regulators, vec![3, 4]);
    }

    #[test]
    fn bi_role_entities_stay_on_the_input_side() {
        let layout = layout(vec![entity(
            "a",
            RenderableClass::Protein,
            vec![Role::new(EntityRole::Input, 1), Role::new(EntityRole::Catalyst, 1)],
            false,
        )]);
        let index = LayoutIndex::new(&layout);
        assert_eq!(index.inputs, vec![0]);
        assert!(index.catalysts.is_empty());
    }

    #[test]
    fn tile_order_prefers_multi_role_then_class() {
        let layout = layout(vec![
            entity("water", RenderableClass::Chemical, vec![Role::new(EntityRole::Input, 1)], true),
            entity("enzyme", RenderableClass::Protein, vec![Role::new(EntityRole::Input, 1)], false),
            entity(
                "dual",
                RenderableClass::Chemical,
                vec![Role::new(EntityRole::Input, 1), Role::new(EntityRole::Catalyst, 1)],
                false,
            ),
            entity("set", RenderableClass::EntitySet, vec![Role::new(EntityRole::Input, 1)], false),
        ]);
        let index = LayoutIndex::new(&layout);
        // dual first (two roles), then set before protein by class order,
        // trivial chemical last.
        assert_eq!(index.inputs, vec![2, 3, 1, 0]);
    }
}
