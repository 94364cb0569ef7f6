//! The glyph model: one reaction, its participants, and the compartment
//! tree that contains them. The [`Layout`] aggregate owns every glyph for
//! the duration of one compute; cross-references between glyphs and
//! compartments use arena indices rather than pointers.

use serde::{Deserialize, Serialize};

use crate::layout::geometry::{Coordinate, Position, Segment};

pub type EntityId = usize;
pub type CompartmentId = usize;

/// The function an entity plays in the reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityRole {
    Input,
    Output,
    Catalyst,
    PositiveRegulator,
    NegativeRegulator,
}

/// A role paired with its stoichiometry. Stoichiometry is always >= 1;
/// ingestion rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "type")]
    pub kind: EntityRole,
    pub stoichiometry: u32,
}

impl Role {
    pub fn new(kind: EntityRole, stoichiometry: u32) -> Self {
        Self {
            kind,
            stoichiometry,
        }
    }
}

/// How an entity glyph is drawn. Drug variants share the geometry of their
/// base class and only differ for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderableClass {
    Protein,
    ProteinDrug,
    Complex,
    ComplexDrug,
    Chemical,
    ChemicalDrug,
    EntitySet,
    EntitySetDrug,
    Rna,
    RnaDrug,
    Gene,
    Entity,
    EncapsulatedNode,
    ProcessNode,
    Attachment,
}

/// Shape class of the reaction glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionClass {
    Transition,
    Binding,
    Dissociation,
    Omitted,
    Uncertain,
}

/// Pointer glyph drawn where a connector meets the reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectorPointer {
    Input,
    Output,
    Catalyst,
    Activator,
    Inhibitor,
}

impl ConnectorPointer {
    pub fn for_role(role: EntityRole) -> Self {
        match role {
            EntityRole::Input => ConnectorPointer::Input,
            EntityRole::Output => ConnectorPointer::Output,
            EntityRole::Catalyst => ConnectorPointer::Catalyst,
            EntityRole::PositiveRegulator => ConnectorPointer::Activator,
            EntityRole::NegativeRegulator => ConnectorPointer::Inhibitor,
        }
    }
}

/// The badge drawn on the first segment of a connector whose role carries a
/// stoichiometry other than one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoichiometryBadge {
    pub value: u32,
    pub shape: Position,
}

/// The segmented line that ties one entity to the reaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub segments: Vec<Segment>,
    pub pointer: ConnectorPointer,
    pub stoichiometry: Option<StoichiometryBadge>,
}

impl Connector {
    pub fn new(pointer: ConnectorPointer) -> Self {
        Self {
            segments: Vec::new(),
            pointer,
            stoichiometry: None,
        }
    }
}

/// A translational modification drawn as a small box on the entity border.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentGlyph {
    pub name: String,
    pub position: Position,
}

/// One participant glyph. A single physical entity may yield two of these
/// after duplication; each copy keeps the same stable identifier.
#[derive(Debug, Clone)]
pub struct EntityGlyph {
    pub st_id: String,
    pub name: String,
    pub renderable_class: RenderableClass,
    pub roles: Vec<Role>,
    pub trivial: bool,
    pub crossed: bool,
    pub dashed: bool,
    pub drug: bool,
    pub disease: bool,
    pub attachments: Vec<AttachmentGlyph>,
    pub compartment: CompartmentId,
    pub position: Position,
    pub connector: Option<Connector>,
}

impl EntityGlyph {
    pub fn has_role(&self, kind: EntityRole) -> bool {
        self.roles.iter().any(|role| role.kind == kind)
    }

    pub fn role(&self, kind: EntityRole) -> Option<&Role> {
        self.roles.iter().find(|role| role.kind == kind)
    }

    /// A copy carrying exactly `role`, sharing everything else. The copy
    /// has no connector; routing assigns one later.
    pub fn split_off(&self, role: Role) -> EntityGlyph {
        EntityGlyph {
            st_id: self.st_id.clone(),
            name: self.name.clone(),
            renderable_class: self.renderable_class,
            roles: vec![role],
            trivial: self.trivial,
            crossed: self.crossed,
            dashed: self.dashed,
            drug: self.drug,
            disease: self.disease,
            attachments: self.attachments.clone(),
            compartment: self.compartment,
            position: Position::default(),
            connector: None,
        }
    }
}

/// The central reaction glyph with its backbone segments.
#[derive(Debug, Clone)]
pub struct ReactionGlyph {
    pub st_id: String,
    pub name: String,
    pub class: ReactionClass,
    pub compartment: CompartmentId,
    pub position: Position,
    pub segments: Vec<Segment>,
}

/// A handle to something a compartment directly contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainedGlyph {
    Entity(EntityId),
    Reaction,
}

/// A cellular compartment node. Parent/child links form a tree rooted at
/// the extracellular sentinel.
#[derive(Debug, Clone)]
pub struct CompartmentGlyph {
    pub accession: String,
    pub name: String,
    pub parent: Option<CompartmentId>,
    pub children: Vec<CompartmentId>,
    pub contained: Vec<ContainedGlyph>,
    pub position: Position,
    pub label_position: Coordinate,
}

impl CompartmentGlyph {
    pub fn new(accession: String, name: String, parent: Option<CompartmentId>) -> Self {
        Self {
            accession,
            name,
            parent,
            children: Vec::new(),
            contained: Vec::new(),
            position: Position::default(),
            label_position: Coordinate::default(),
        }
    }
}

/// The aggregate handed to [`crate::layout::compute_layout`]. It owns the
/// reaction, every entity glyph and the compartment arena exclusively;
/// computing the same instance twice is not supported.
#[derive(Debug, Clone)]
pub struct Layout {
    pub position: Position,
    pub reaction: ReactionGlyph,
    pub entities: Vec<EntityGlyph>,
    pub compartments: Vec<CompartmentGlyph>,
    pub root: CompartmentId,
    sentinel_stripped: bool,
}

impl Layout {
    pub fn new(
        reaction: ReactionGlyph,
        entities: Vec<EntityGlyph>,
        compartments: Vec<CompartmentGlyph>,
        root: CompartmentId,
    ) -> Self {
        Self {
            position: Position::default(),
            reaction,
            entities,
            compartments,
            root,
            sentinel_stripped: false,
        }
    }

    /// True when `ancestor` lies strictly above `compartment` in the tree.
    pub fn is_ancestor(&self, ancestor: CompartmentId, compartment: CompartmentId) -> bool {
        let mut current = self.compartments[compartment].parent;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.compartments[id].parent;
        }
        false
    }

    /// True when any entity directly assigned to `compartment` carries
    /// `role`.
    pub fn compartment_has_role(&self, compartment: CompartmentId, role: EntityRole) -> bool {
        self.compartments[compartment]
            .contained
            .iter()
            .any(|glyph| match glyph {
                ContainedGlyph::Entity(id) => self.entities[*id].has_role(role),
                ContainedGlyph::Reaction => false,
            })
    }

    /// Drops the extracellular sentinel from the emitted compartment set.
    /// The sentinel stays reachable through `root` for internal passes.
    pub(crate) fn strip_sentinel(&mut self) {
        self.sentinel_stripped = true;
    }

    /// Identifiers of compartments that are part of the published layout.
    pub fn emitted_compartments(&self) -> impl Iterator<Item = CompartmentId> + '_ {
        let skip = self.sentinel_stripped.then_some(self.root);
        (0..self.compartments.len()).filter(move |id| Some(*id) != skip)
    }
}
