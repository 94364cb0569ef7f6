//! End-to-end scenarios: each builds one reaction through the public API,
//! computes the layout with deterministic char metrics, and checks the
//! geometric contract a renderer relies on.

use std::f64::consts::PI;

use reaction_layout::input::{
    ParticipantDescriptor, ReactionDescriptor, ReactionInput, RoleDescriptor,
};
use reaction_layout::layout::geometry::Position;
use reaction_layout::model::{
    CompartmentId, ConnectorPointer, ContainedGlyph, EntityRole, Layout, RenderableClass,
};
use reaction_layout::{CharMetrics, CompartmentOntology, LayoutConfig, build_layout, compute_layout};

const EPS: f64 = 1e-6;
const CYTOSOL: &str = "GO:0005829";
const CYTOPLASM: &str = "GO:0005737";
const NUCLEOPLASM: &str = "GO:0005654";

fn participant(
    st_id: &str,
    name: &str,
    class: RenderableClass,
    compartment: &str,
    roles: &[(EntityRole, u32)],
) -> ParticipantDescriptor {
    ParticipantDescriptor {
        st_id: st_id.to_string(),
        name: name.to_string(),
        renderable_class: class,
        roles: roles
            .iter()
            .map(|&(kind, stoichiometry)| RoleDescriptor {
                kind,
                stoichiometry,
            })
            .collect(),
        compartment: Some(compartment.to_string()),
        trivial: false,
        crossed: false,
        dashed: false,
        drug: false,
        disease: false,
        attachments: Vec::new(),
    }
}

fn reaction_in(compartment: &str) -> Option<ReactionDescriptor> {
    Some(ReactionDescriptor {
        st_id: "R-HSA-000001".to_string(),
        name: "reaction".to_string(),
        compartment: Some(compartment.to_string()),
        class: None,
    })
}

fn computed(input: ReactionInput) -> Layout {
    let mut layout =
        build_layout(&input, CompartmentOntology::cellular_components()).expect("valid input");
    compute_layout(&mut layout, &CharMetrics::default(), &LayoutConfig::default());
    layout
}

fn entity_bounds(layout: &Layout, id: usize) -> Position {
    let entity = &layout.entities[id];
    let mut bounds = entity.position;
    for attachment in &entity.attachments {
        bounds.union(attachment.position);
    }
    bounds
}

fn reaction_bounds(layout: &Layout) -> Position {
    let mut bounds = layout.reaction.position;
    for segment in &layout.reaction.segments {
        bounds.union(segment.bounds());
    }
    bounds
}

fn descendant_glyphs(layout: &Layout, compartment: CompartmentId, out: &mut Vec<ContainedGlyph>) {
    out.extend(layout.compartments[compartment].contained.iter().copied());
    for &child in &layout.compartments[compartment].children {
        descendant_glyphs(layout, child, out);
    }
}

fn encloses_with_padding(outer: &Position, inner: &Position, padding: f64) -> bool {
    outer.x <= inner.x - padding + EPS
        && outer.y <= inner.y - padding + EPS
        && outer.max_x() >= inner.max_x() + padding - EPS
        && outer.max_y() >= inner.max_y() + padding - EPS
}

/// The geometric contract every valid layout satisfies, checked after
/// every scenario.
fn assert_invariants(layout: &Layout) {
    // 1. origin anchored
    assert!(layout.position.x.abs() < EPS, "layout x = {}", layout.position.x);
    assert!(layout.position.y.abs() < EPS, "layout y = {}", layout.position.y);

    // 2. compartments enclose their descendants with 20 units of padding
    for compartment in layout.emitted_compartments() {
        let position = layout.compartments[compartment].position;
        let mut glyphs = Vec::new();
        descendant_glyphs(layout, compartment, &mut glyphs);
        for glyph in glyphs {
            let bounds = match glyph {
                ContainedGlyph::Entity(id) => entity_bounds(layout, id),
                ContainedGlyph::Reaction => layout.reaction.position,
            };
            assert!(
                encloses_with_padding(&position, &bounds, 20.0),
                "compartment {} {:?} does not enclose {:?}",
                layout.compartments[compartment].name,
                position,
                bounds,
            );
        }
        for &child in &layout.compartments[compartment].children {
            assert!(
                position.contains(&layout.compartments[child].position),
                "compartment does not contain child compartment"
            );
        }
    }

    // 3. connectors are non-empty chains that reach the reaction
    let reaction = layout.reaction.position;
    for entity in &layout.entities {
        let connector = entity.connector.as_ref().expect("every entity is routed");
        assert!(!connector.segments.is_empty());
        let chains: Vec<&[reaction_layout::layout::geometry::Segment]> =
            if entity.roles.len() > 1 && entity.has_role(EntityRole::Input) {
                // input chain plus hook chain
                let boundary = connector.segments.len() - 3;
                vec![&connector.segments[..boundary], &connector.segments[boundary..]]
            } else {
                vec![&connector.segments[..]]
            };
        for chain in chains {
            for pair in chain.windows(2) {
                assert!(
                    (pair[0].to.x - pair[1].from.x).abs() < EPS
                        && (pair[0].to.y - pair[1].from.y).abs() < EPS,
                    "adjacent segments must share an endpoint"
                );
            }
        }
        let last = connector.segments.last().unwrap().to;
        match connector.pointer {
            ConnectorPointer::Input => {
                assert!((last.x - (reaction.x - 20.0)).abs() < EPS);
                assert!((last.y - reaction.center_y()).abs() < EPS);
            }
            ConnectorPointer::Output => {
                assert!((last.x - (reaction.max_x() + 20.0)).abs() < EPS);
                assert!((last.y - reaction.center_y()).abs() < EPS);
            }
            ConnectorPointer::Catalyst => {
                assert!((last.x - reaction.center_x()).abs() < EPS);
                assert!((last.y - reaction.center_y()).abs() < EPS);
            }
            ConnectorPointer::Activator | ConnectorPointer::Inhibitor => {
                let dx = last.x - reaction.center_x();
                let dy = last.y - reaction.center_y();
                assert!(dy > 0.0, "regulator attachment below the reaction center");
                assert!(dx.hypot(dy) > reaction.height / 2.0 - EPS);
            }
        }
    }

    // 4. no two entity glyphs overlap, none overlaps the reaction
    for (a, entity_a) in layout.entities.iter().enumerate() {
        let bounds_a = entity_bounds(layout, a);
        assert!(
            !bounds_a.intersects(&reaction_bounds(layout)),
            "entity {} overlaps the reaction",
            entity_a.name
        );
        for b in a + 1..layout.entities.len() {
            let bounds_b = entity_bounds(layout, b);
            assert!(
                !bounds_a.intersects(&bounds_b),
                "entities {} and {} overlap",
                entity_a.name,
                layout.entities[b].name
            );
        }
    }

    // 6. a unique root among the emitted compartments
    let roots = layout
        .emitted_compartments()
        .filter(|&id| {
            layout.compartments[id]
                .parent
                .map(|parent| parent == layout.root)
                .unwrap_or(true)
        })
        .count();
    assert_eq!(roots, 1, "expected a unique emitted root compartment");
}

#[test]
fn s1_single_compartment_simple_transition() {
    let layout = computed(ReactionInput {
        reaction: reaction_in(CYTOSOL),
        participants: vec![
            participant("R-A", "A", RenderableClass::Protein, CYTOSOL, &[(EntityRole::Input, 1)]),
            participant("R-B", "B", RenderableClass::Protein, CYTOSOL, &[(EntityRole::Output, 1)]),
        ],
        compartments: vec![],
    });
    assert_invariants(&layout);

    let reaction = layout.reaction.position;
    assert_eq!(layout.reaction.segments.len(), 2);
    let a = &layout.entities[0];
    let b = &layout.entities[1];
    assert!(a.position.max_x() < reaction.x);
    assert!(b.position.x > reaction.max_x());
    assert!((a.position.center_y() - reaction.center_y()).abs() < EPS);
    assert!((b.position.center_y() - reaction.center_y()).abs() < EPS);

    let emitted: Vec<_> = layout.emitted_compartments().collect();
    assert_eq!(emitted.len(), 1);
    assert_eq!(layout.compartments[emitted[0]].accession, CYTOSOL);
}

#[test]
fn s2_input_that_is_also_a_catalyst() {
    let layout = computed(ReactionInput {
        reaction: reaction_in(CYTOSOL),
        participants: vec![
            participant(
                "R-C",
                "C",
                RenderableClass::Protein,
                CYTOSOL,
                &[(EntityRole::Input, 1), (EntityRole::Catalyst, 1)],
            ),
            participant("R-D", "D", RenderableClass::Protein, CYTOSOL, &[(EntityRole::Output, 1)]),
        ],
        compartments: vec![],
    });
    assert_invariants(&layout);

    // no duplication for the compatible pair: one glyph, one connector
    assert_eq!(layout.entities.len(), 2);
    let connector = layout.entities[0].connector.as_ref().unwrap();
    assert_eq!(connector.segments.len(), 5);
    assert_eq!(connector.pointer, ConnectorPointer::Catalyst);

    // the hook runs over the top and the compartment encloses it
    let entity = &layout.entities[0];
    let hook_top = connector.segments[3].from.y;
    assert!(hook_top < entity.position.y);
    let compartment = layout
        .emitted_compartments()
        .map(|id| &layout.compartments[id])
        .find(|c| c.accession == CYTOSOL)
        .unwrap();
    assert!(compartment.position.y <= hook_top - 20.0 + EPS);
}

#[test]
fn s3_input_output_entity_splits() {
    let layout = computed(ReactionInput {
        reaction: reaction_in(CYTOSOL),
        participants: vec![participant(
            "R-D",
            "D",
            RenderableClass::Protein,
            CYTOSOL,
            &[(EntityRole::Input, 1), (EntityRole::Output, 1)],
        )],
        compartments: vec![],
    });
    assert_invariants(&layout);

    assert_eq!(layout.entities.len(), 2);
    let reaction = layout.reaction.position;
    let mut input = None;
    let mut output = None;
    for entity in &layout.entities {
        assert_eq!(entity.st_id, "R-D");
        assert_eq!(entity.roles.len(), 1);
        match entity.connector.as_ref().unwrap().pointer {
            ConnectorPointer::Input => input = Some(entity),
            ConnectorPointer::Output => output = Some(entity),
            other => panic!("unexpected pointer {other:?}"),
        }
    }
    let input = input.expect("one copy keeps the input role");
    let output = output.expect("one copy keeps the output role");
    assert!(input.position.max_x() < reaction.x);
    assert!(output.position.x > reaction.max_x());
    assert_eq!(input.compartment, output.compartment);
}

#[test]
fn s4_seven_regulators_fan_out_on_a_semicircle() {
    let names = ["r1", "r2", "r3", "r4", "r5", "r6", "r7"];
    let mut participants: Vec<_> = names
        .iter()
        .map(|name| {
            participant(
                name,
                name,
                RenderableClass::Protein,
                CYTOSOL,
                &[(EntityRole::NegativeRegulator, 1)],
            )
        })
        .collect();
    participants.push(participant(
        "R-A",
        "A",
        RenderableClass::Protein,
        CYTOSOL,
        &[(EntityRole::Input, 1)],
    ));
    let layout = computed(ReactionInput {
        reaction: reaction_in(CYTOSOL),
        participants,
        compartments: vec![],
    });
    assert_invariants(&layout);

    let regulators: Vec<_> = layout
        .entities
        .iter()
        .filter(|entity| entity.has_role(EntityRole::NegativeRegulator))
        .collect();
    assert_eq!(regulators.len(), 7);

    // single horizontal strip
    let first_y = regulators[0].position.center_y();
    for regulator in &regulators {
        assert!((regulator.position.center_y() - first_y).abs() < EPS);
    }

    let reaction = layout.reaction.position;
    let radius = reaction.height / 2.0 + 6.0 * 8.0 / PI;
    let mut sorted = regulators.clone();
    sorted.sort_by(|a, b| a.position.center_x().total_cmp(&b.position.center_x()));
    for (i, regulator) in sorted.iter().enumerate() {
        let connector = regulator.connector.as_ref().unwrap();
        assert_eq!(connector.pointer, ConnectorPointer::Inhibitor);
        let angle = PI * (i + 1) as f64 / 8.0;
        let end = connector.segments.last().unwrap().to;
        let expected_x = reaction.center_x() - radius * angle.cos();
        let expected_y = reaction.center_y() + radius * angle.sin();
        assert!((end.x - expected_x).abs() < EPS, "regulator {i} x");
        assert!((end.y - expected_y).abs() < EPS, "regulator {i} y");
    }
}

#[test]
fn s5_nested_compartments() {
    let layout = computed(ReactionInput {
        reaction: reaction_in(NUCLEOPLASM),
        participants: vec![
            participant(
                "R-A",
                "A",
                RenderableClass::Protein,
                CYTOPLASM,
                &[(EntityRole::Input, 1)],
            ),
            participant(
                "R-B",
                "B",
                RenderableClass::Protein,
                NUCLEOPLASM,
                &[(EntityRole::Output, 1)],
            ),
        ],
        compartments: vec![],
    });
    assert_invariants(&layout);

    let by_accession = |accession: &str| {
        layout
            .emitted_compartments()
            .map(|id| &layout.compartments[id])
            .find(|c| c.accession == accession)
            .unwrap_or_else(|| panic!("compartment {accession} emitted"))
    };
    let cytoplasm = by_accession(CYTOPLASM);
    let envelope = by_accession("GO:0005635");
    let nucleoplasm = by_accession(NUCLEOPLASM);

    assert!(cytoplasm.position.contains(&envelope.position));
    assert!(envelope.position.contains(&nucleoplasm.position));
    assert!(nucleoplasm.position.contains(&layout.reaction.position));

    // the input column stays left of the nuclear boundary
    let input = entity_bounds(&layout, 0);
    assert!(input.max_x() < nucleoplasm.position.x);

    // labels keep their compartments at least as wide as the text
    for compartment in [cytoplasm, envelope, nucleoplasm] {
        let metrics = CharMetrics::default();
        let text_width = metrics.char_width * compartment.name.chars().count() as f64;
        assert!(compartment.position.width + EPS >= text_width + 30.0);
    }
}

#[test]
fn s6_stoichiometry_badge() {
    let layout = computed(ReactionInput {
        reaction: reaction_in(CYTOSOL),
        participants: vec![
            participant("R-A", "A", RenderableClass::Chemical, CYTOSOL, &[(EntityRole::Input, 3)]),
            participant("R-B", "B", RenderableClass::Chemical, CYTOSOL, &[(EntityRole::Output, 1)]),
        ],
        compartments: vec![],
    });
    assert_invariants(&layout);

    let connector = layout.entities[0].connector.as_ref().unwrap();
    let badge = connector.stoichiometry.expect("badge for stoichiometry 3");
    assert_eq!(badge.value, 3);
    assert_eq!(badge.shape.width, 12.0);
    assert_eq!(badge.shape.height, 12.0);
    let midpoint = connector.segments[0].midpoint();
    assert!((badge.shape.center_x() - midpoint.x).abs() < EPS);
    assert!((badge.shape.center_y() - midpoint.y).abs() < EPS);

    // the unit-stoichiometry output carries no badge
    assert!(layout.entities[1]
        .connector
        .as_ref()
        .unwrap()
        .stoichiometry
        .is_none());
}

#[test]
fn gene_inputs_get_the_arrow_jog() {
    let layout = computed(ReactionInput {
        reaction: reaction_in(CYTOSOL),
        participants: vec![
            participant("R-G", "MYC", RenderableClass::Gene, CYTOSOL, &[(EntityRole::Input, 1)]),
            participant("R-B", "B", RenderableClass::Protein, CYTOSOL, &[(EntityRole::Output, 1)]),
        ],
        compartments: vec![],
    });
    assert_invariants(&layout);

    let gene = &layout.entities[0];
    let connector = gene.connector.as_ref().unwrap();
    assert_eq!(connector.segments.len(), 3);
    let jog = connector.segments[0];
    assert!((jog.from.x - (gene.position.max_x() + 8.0)).abs() < EPS);
    assert!((jog.from.y - gene.position.y).abs() < EPS);
    assert!((jog.to.x - (gene.position.max_x() + 30.0)).abs() < EPS);
}

#[test]
fn catalysts_connect_through_the_rule_above_the_reaction() {
    let layout = computed(ReactionInput {
        reaction: reaction_in(CYTOSOL),
        participants: vec![
            participant("R-A", "A", RenderableClass::Protein, CYTOSOL, &[(EntityRole::Input, 1)]),
            participant("R-B", "B", RenderableClass::Protein, CYTOSOL, &[(EntityRole::Output, 1)]),
            participant(
                "R-E",
                "enzyme",
                RenderableClass::Protein,
                CYTOSOL,
                &[(EntityRole::Catalyst, 1)],
            ),
        ],
        compartments: vec![],
    });
    assert_invariants(&layout);

    let catalyst = &layout.entities[2];
    let connector = catalyst.connector.as_ref().unwrap();
    assert_eq!(connector.pointer, ConnectorPointer::Catalyst);
    assert_eq!(connector.segments.len(), 2);
    // catalyst strip sits above the reaction
    assert!(catalyst.position.max_y() < layout.reaction.position.y);
    let drop = connector.segments[0];
    assert!((drop.from.x - catalyst.position.center_x()).abs() < EPS);
    assert!((drop.to.y - (catalyst.position.max_y() + 35.0)).abs() < EPS);
}
