//! Serializable snapshot of a computed layout, the contract a renderer
//! consumes: reaction with backbone, entities with connectors and badges,
//! compartments with label anchors.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::model::{ConnectorPointer, Layout, ReactionClass, RenderableClass};

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f64,
    pub height: f64,
    pub reaction: ReactionDump,
    pub entities: Vec<EntityDump>,
    pub compartments: Vec<CompartmentDump>,
}

#[derive(Debug, Serialize)]
pub struct ReactionDump {
    pub st_id: String,
    pub name: String,
    pub class: ReactionClass,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub segments: Vec<[f64; 4]>,
}

#[derive(Debug, Serialize)]
pub struct EntityDump {
    pub st_id: String,
    pub name: String,
    pub renderable_class: RenderableClass,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub trivial: bool,
    pub crossed: bool,
    pub dashed: bool,
    pub drug: bool,
    pub disease: bool,
    pub attachments: Vec<AttachmentDump>,
    pub connector: Option<ConnectorDump>,
}

#[derive(Debug, Serialize)]
pub struct AttachmentDump {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Serialize)]
pub struct ConnectorDump {
    pub pointer: ConnectorPointer,
    pub segments: Vec<[f64; 4]>,
    pub stoichiometry: Option<StoichiometryDump>,
}

#[derive(Debug, Serialize)]
pub struct StoichiometryDump {
    pub value: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Serialize)]
pub struct CompartmentDump {
    pub accession: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label_x: f64,
    pub label_y: f64,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let reaction = ReactionDump {
            st_id: layout.reaction.st_id.clone(),
            name: layout.reaction.name.clone(),
            class: layout.reaction.class,
            x: layout.reaction.position.x,
            y: layout.reaction.position.y,
            width: layout.reaction.position.width,
            height: layout.reaction.position.height,
            segments: layout
                .reaction
                .segments
                .iter()
                .map(|s| [s.from.x, s.from.y, s.to.x, s.to.y])
                .collect(),
        };

        let entities = layout
            .entities
            .iter()
            .map(|entity| EntityDump {
                st_id: entity.st_id.clone(),
                name: entity.name.clone(),
                renderable_class: entity.renderable_class,
                x: entity.position.x,
                y: entity.position.y,
                width: entity.position.width,
                height: entity.position.height,
                trivial: entity.trivial,
                crossed: entity.crossed,
                dashed: entity.dashed,
                drug: entity.drug,
                disease: entity.disease,
                attachments: entity
                    .attachments
                    .iter()
                    .map(|attachment| AttachmentDump {
                        name: attachment.name.clone(),
                        x: attachment.position.x,
                        y: attachment.position.y,
                    })
                    .collect(),
                connector: entity.connector.as_ref().map(|connector| ConnectorDump {
                    pointer: connector.pointer,
                    segments: connector
                        .segments
                        .iter()
                        .map(|s| [s.from.x, s.from.y, s.to.x, s.to.y])
                        .collect(),
                    stoichiometry: connector.stoichiometry.map(|badge| StoichiometryDump {
                        value: badge.value,
                        x: badge.shape.x,
                        y: badge.shape.y,
                        width: badge.shape.width,
                        height: badge.shape.height,
                    }),
                }),
            })
            .collect();

        let compartments = layout
            .emitted_compartments()
            .map(|id| {
                let compartment = &layout.compartments[id];
                CompartmentDump {
                    accession: compartment.accession.clone(),
                    name: compartment.name.clone(),
                    x: compartment.position.x,
                    y: compartment.position.y,
                    width: compartment.position.width,
                    height: compartment.position.height,
                    label_x: compartment.label_position.x,
                    label_y: compartment.label_position.y,
                }
            })
            .collect();

        LayoutDump {
            width: layout.position.width,
            height: layout.position.height,
            reaction,
            entities,
            compartments,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ParticipantDescriptor, ReactionDescriptor, ReactionInput, RoleDescriptor};
    use crate::model::EntityRole;
    use crate::ontology::CompartmentOntology;
    use crate::text_metrics::CharMetrics;
    use crate::{LayoutConfig, build_layout, compute_layout};

    fn participant(st_id: &str, kind: EntityRole) -> ParticipantDescriptor {
        ParticipantDescriptor {
            st_id: st_id.to_string(),
            name: st_id.to_string(),
            renderable_class: RenderableClass::Protein,
            roles: vec![RoleDescriptor {
                kind,
                stoichiometry: 1,
            }],
            compartment: Some("GO:0005829".to_string()),
            trivial: false,
            crossed: false,
            dashed: false,
            drug: false,
            disease: false,
            attachments: Vec::new(),
        }
    }

    #[test]
    fn dump_mirrors_the_computed_layout() {
        let input = ReactionInput {
            reaction: Some(ReactionDescriptor {
                st_id: "R-HSA-1".to_string(),
                name: "demo".to_string(),
                compartment: Some("GO:0005829".to_string()),
                class: None,
            }),
            participants: vec![
                participant("R-A", EntityRole::Input),
                participant("R-B", EntityRole::Output),
            ],
            compartments: Vec::new(),
        };
        let mut layout =
            build_layout(&input, CompartmentOntology::cellular_components()).unwrap();
        compute_layout(&mut layout, &CharMetrics::default(), &LayoutConfig::default());

        let dump = LayoutDump::from_layout(&layout);
        assert_eq!(dump.reaction.segments.len(), 2);
        assert_eq!(dump.entities.len(), 2);
        assert!(dump.entities.iter().all(|entity| entity.connector.is_some()));
        // the extracellular sentinel is not part of the emitted set
        assert_eq!(dump.compartments.len(), 1);
        assert_eq!(dump.compartments[0].accession, "GO:0005829");
        assert!(dump.width > 0.0);

        let json = serde_json::to_string(&dump).unwrap();
        assert!(json.contains("\"st_id\":\"R-HSA-1\""));
    }
}
