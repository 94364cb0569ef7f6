//! Inbound model. Descriptors mirror the wire names of the persistence
//! layer (`stId`, `displayName`, `renderableClass`); [`build_layout`]
//! validates them, merges duplicate participants, resolves the compartment
//! tree through the ontology and produces the [`Layout`] aggregate the
//! pipeline consumes.

use std::collections::HashMap;

use anyhow::Result;
use serde::Deserialize;

use crate::model::{
    AttachmentGlyph, CompartmentGlyph, CompartmentId, ContainedGlyph, EntityGlyph, EntityRole,
    Layout, ReactionClass, ReactionGlyph, RenderableClass, Role,
};
use crate::ontology::{normalize_accession, CompartmentNode, CompartmentOntology};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionInput {
    #[serde(default)]
    pub reaction: Option<ReactionDescriptor>,
    pub participants: Vec<ParticipantDescriptor>,
    #[serde(default)]
    pub compartments: Vec<CompartmentDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionDescriptor {
    pub st_id: String,
    #[serde(rename = "displayName")]
    pub name: String,
    #[serde(default)]
    pub compartment: Option<String>,
    /// Explicit shape class; derived from the stoichiometry delta when
    /// absent.
    #[serde(default)]
    pub class: Option<ReactionClass>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDescriptor {
    pub st_id: String,
    #[serde(rename = "displayName")]
    pub name: String,
    pub renderable_class: RenderableClass,
    pub roles: Vec<RoleDescriptor>,
    #[serde(default)]
    pub compartment: Option<String>,
    #[serde(default)]
    pub trivial: bool,
    #[serde(default)]
    pub crossed: bool,
    #[serde(default)]
    pub dashed: bool,
    #[serde(default)]
    pub drug: bool,
    #[serde(default)]
    pub disease: bool,
    #[serde(default)]
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RoleDescriptor {
    #[serde(rename = "type")]
    pub kind: EntityRole,
    #[serde(default = "one")]
    pub stoichiometry: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompartmentDescriptor {
    pub accession: String,
    pub display_name: String,
}

/// Builds the layout aggregate for one reaction. Fails on a missing
/// reaction, an empty participant list, a role-less participant or a
/// stoichiometry below one; everything else degrades gracefully.
pub fn build_layout(input: &ReactionInput, ontology: &CompartmentOntology) -> Result<Layout> {
    let reaction = input
        .reaction
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("reaction is missing"))?;
    if input.participants.is_empty() {
        return Err(anyhow::anyhow!("reaction {} has no participants", reaction.st_id));
    }
    for participant in &input.participants {
        if participant.roles.is_empty() {
            return Err(anyhow::anyhow!(
                "participant {} has no role",
                participant.st_id
            ));
        }
        for role in &participant.roles {
            if role.stoichiometry < 1 {
                return Err(anyhow::anyhow!(
                    "participant {} has stoichiometry {}",
                    participant.st_id,
                    role.stoichiometry
                ));
            }
        }
    }

    let display_names: HashMap<String, String> = input
        .compartments
        .iter()
        .filter_map(|descriptor| {
            normalize_accession(&descriptor.accession)
                .map(|accession| (accession, descriptor.display_name.clone()))
        })
        .collect();

    let merged = merge_participants(&input.participants);

    let mut accessions: Vec<String> = Vec::new();
    let mut note = |raw: &Option<String>| {
        if let Some(accession) = raw.as_deref().and_then(normalize_accession) {
            if !accessions.contains(&accession) {
                accessions.push(accession);
            }
        }
    };
    for participant in &merged {
        note(&participant.compartment);
    }
    note(&reaction.compartment);

    let tree = ontology.tree_with_intermediate_nodes(&accessions);
    let (mut compartments, by_accession) = flatten_tree(&tree, &display_names);
    let root = 0;

    let resolve = |raw: &Option<String>| -> CompartmentId {
        raw.as_deref()
            .and_then(normalize_accession)
            .and_then(|accession| by_accession.get(&accession).copied())
            .unwrap_or(root)
    };

    let mut entities = Vec::with_capacity(merged.len());
    let mut delta: i64 = 0;
    for participant in &merged {
        let compartment = resolve(&participant.compartment);
        let id = entities.len();
        compartments[compartment]
            .contained
            .push(ContainedGlyph::Entity(id));
        for role in &participant.roles {
            match role.kind {
                EntityRole::Input => delta += i64::from(role.stoichiometry),
                EntityRole::Output => delta -= i64::from(role.stoichiometry),
                _ => {}
            }
        }
        entities.push(EntityGlyph {
            st_id: participant.st_id.clone(),
            name: participant.name.clone(),
            renderable_class: participant.renderable_class,
            roles: participant.roles.iter().map(|r| Role::new(r.kind, r.stoichiometry)).collect(),
            trivial: participant.trivial,
            crossed: participant.crossed,
            dashed: participant.dashed,
            drug: participant.drug,
            disease: participant.disease || participant.dashed,
            attachments: participant
                .attachments
                .iter()
                .map(|name| AttachmentGlyph {
                    name: name.clone(),
                    position: Default::default(),
                })
                .collect(),
            compartment,
            position: Default::default(),
            connector: None,
        });
    }

    // A reaction without a compartment lands in the tree root.
    let reaction_compartment = resolve(&reaction.compartment);
    compartments[reaction_compartment]
        .contained
        .push(ContainedGlyph::Reaction);

    let class = reaction.class.unwrap_or(match delta.cmp(&0) {
        std::cmp::Ordering::Greater => ReactionClass::Binding,
        std::cmp::Ordering::Less => ReactionClass::Dissociation,
        std::cmp::Ordering::Equal => ReactionClass::Transition,
    });
    let reaction = ReactionGlyph {
        st_id: reaction.st_id.clone(),
        name: reaction.name.clone(),
        class,
        compartment: reaction_compartment,
        position: Default::default(),
        segments: Vec::new(),
    };

    Ok(Layout::new(reaction, entities, compartments, root))
}

/// Participants sharing a stable identifier and the same crossed/dashed
/// flags are one glyph with the union of the roles.
fn merge_participants(participants: &[ParticipantDescriptor]) -> Vec<ParticipantDescriptor> {
    let mut merged: Vec<ParticipantDescriptor> = Vec::new();
    let mut by_identity: HashMap<(String, bool, bool), usize> = HashMap::new();
    for participant in participants {
        let identity = (
            participant.st_id.clone(),
            participant.crossed,
            participant.dashed,
        );
        match by_identity.get(&identity) {
            Some(&at) => {
                for role in &participant.roles {
                    let exists = merged[at].roles.iter().any(|r| r.kind == role.kind);
                    if !exists {
                        merged[at].roles.push(*role);
                    }
                }
            }
            None => {
                by_identity.insert(identity, merged.len());
                merged.push(participant.clone());
            }
        }
    }
    merged
}

/// Pre-order flattening of the ontology tree into the compartment arena.
/// The root lands at index zero.
fn flatten_tree(
    tree: &CompartmentNode,
    display_names: &HashMap<String, String>,
) -> (Vec<CompartmentGlyph>, HashMap<String, CompartmentId>) {
    let mut compartments = Vec::new();
    let mut by_accession = HashMap::new();
    push_node(tree, None, display_names, &mut compartments, &mut by_accession);
    (compartments, by_accession)
}

fn push_node(
    node: &CompartmentNode,
    parent: Option<CompartmentId>,
    display_names: &HashMap<String, String>,
    compartments: &mut Vec<CompartmentGlyph>,
    by_accession: &mut HashMap<String, CompartmentId>,
) {
    let id = compartments.len();
    let name = display_names
        .get(&node.accession)
        .cloned()
        .unwrap_or_else(|| node.name.clone());
    compartments.push(CompartmentGlyph::new(node.accession.clone(), name, parent));
    by_accession.insert(node.accession.clone(), id);
    if let Some(parent) = parent {
        compartments[parent].children.push(id);
    }
    for child in &node.children {
        push_node(child, Some(id), display_names, compartments, by_accession);
    }
}
