//! Cellular-component ontology and the minimal-surrounding-tree builder.
//!
//! The master ontology is a DAG of compartments linked by a `surrounded_by`
//! relation. Given the set of accessions present in one reaction, the
//! builder reduces the DAG to the smallest tree that still connects every
//! present compartment to the extracellular region, keeping whatever
//! intermediate compartments are needed on the way.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

/// Accession of the synthetic outermost compartment. It is the root of
/// every tree this module produces.
pub const EXTRACELLULAR_REGION: &str = "GO:0005576";

static ACCESSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:GO:)?(\d{7})$").expect("accession pattern"));

/// Builtin table of common cellular components, enough to lay out the large
/// majority of reactions without an external ontology load.
static CELLULAR_COMPONENTS: Lazy<CompartmentOntology> = Lazy::new(|| {
    let table: &[(&str, &str, &[&str])] = &[
        ("GO:0005576", "extracellular region", &[]),
        ("GO:0005886", "plasma membrane", &["GO:0005576"]),
        ("GO:0005737", "cytoplasm", &["GO:0005886"]),
        ("GO:0005829", "cytosol", &["GO:0005886"]),
        ("GO:0005634", "nucleus", &["GO:0005737"]),
        ("GO:0005635", "nuclear envelope", &["GO:0005737"]),
        ("GO:0005654", "nucleoplasm", &["GO:0005635"]),
        ("GO:0005730", "nucleolus", &["GO:0005654"]),
        ("GO:0005741", "mitochondrial outer membrane", &["GO:0005829"]),
        (
            "GO:0005758",
            "mitochondrial intermembrane space",
            &["GO:0005741"],
        ),
        ("GO:0005743", "mitochondrial inner membrane", &["GO:0005758"]),
        ("GO:0005759", "mitochondrial matrix", &["GO:0005743"]),
        ("GO:0005789", "endoplasmic reticulum membrane", &["GO:0005829"]),
        ("GO:0005788", "endoplasmic reticulum lumen", &["GO:0005789"]),
        ("GO:0000139", "Golgi membrane", &["GO:0005829"]),
        ("GO:0005796", "Golgi lumen", &["GO:0000139"]),
        ("GO:0005765", "lysosomal membrane", &["GO:0005829"]),
        ("GO:0043202", "lysosomal lumen", &["GO:0005765"]),
        ("GO:0010008", "endosome membrane", &["GO:0005829"]),
        ("GO:0031904", "endosome lumen", &["GO:0010008"]),
        ("GO:0005778", "peroxisomal membrane", &["GO:0005829"]),
        ("GO:0005782", "peroxisomal matrix", &["GO:0005778"]),
        ("GO:0030659", "cytoplasmic vesicle membrane", &["GO:0005829"]),
        ("GO:0060205", "cytoplasmic vesicle lumen", &["GO:0030659"]),
    ];
    let terms = table.iter().map(|(accession, name, parents)| OntologyTerm {
        accession: (*accession).to_string(),
        name: (*name).to_string(),
        surrounded_by: parents.iter().map(|p| (*p).to_string()).collect(),
    });
    CompartmentOntology::from_terms(terms)
});

/// Normalizes a GO accession to the canonical `GO:NNNNNNN` form. Returns
/// `None` for anything that is not an accession.
pub fn normalize_accession(raw: &str) -> Option<String> {
    ACCESSION_RE
        .captures(raw.trim())
        .map(|caps| format!("GO:{}", &caps[1]))
}

/// One node of the master DAG.
#[derive(Debug, Clone)]
pub struct OntologyTerm {
    pub accession: String,
    pub name: String,
    /// Accessions of the compartments directly surrounding this one.
    pub surrounded_by: Vec<String>,
}

/// One node of a produced tree. Children are ordered by accession so the
/// output is deterministic regardless of input order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompartmentNode {
    pub accession: String,
    pub name: String,
    pub children: Vec<CompartmentNode>,
}

/// The master `surrounded_by` DAG.
#[derive(Debug, Clone)]
pub struct CompartmentOntology {
    terms: HashMap<String, OntologyTerm>,
}

impl CompartmentOntology {
    pub fn from_terms(terms: impl IntoIterator<Item = OntologyTerm>) -> Self {
        let terms = terms
            .into_iter()
            .map(|term| (term.accession.clone(), term))
            .collect();
        Self { terms }
    }

    /// The builtin cellular-component table.
    pub fn cellular_components() -> &'static CompartmentOntology {
        &CELLULAR_COMPONENTS
    }

    pub fn term(&self, accession: &str) -> Option<&OntologyTerm> {
        self.terms.get(accession)
    }

    fn name_of(&self, accession: &str) -> String {
        self.terms
            .get(accession)
            .map(|term| term.name.clone())
            .unwrap_or_else(|| accession.to_string())
    }

    /// Builds the minimal tree connecting `accessions` to the extracellular
    /// region, retaining intermediate compartments where two present
    /// members share part of a path. Unknown accessions are dropped
    /// silently; an empty set yields the sentinel alone. The builder is
    /// total.
    pub fn tree_with_intermediate_nodes<I, S>(&self, accessions: I) -> CompartmentNode
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let present: BTreeSet<String> = accessions
            .into_iter()
            .filter_map(|raw| normalize_accession(raw.as_ref()))
            .filter(|acc| acc == EXTRACELLULAR_REGION || self.terms.contains_key(acc))
            .collect();

        // child -> parent, first selected path wins
        let mut parent_of: BTreeMap<String, String> = BTreeMap::new();
        let mut nodes: BTreeSet<String> = BTreeSet::new();
        nodes.insert(EXTRACELLULAR_REGION.to_string());

        for accession in &present {
            if accession == EXTRACELLULAR_REGION {
                continue;
            }
            let path = self.select_path(accession, &present);
            for pair in path.windows(2) {
                parent_of
                    .entry(pair[0].clone())
                    .or_insert_with(|| pair[1].clone());
            }
            nodes.extend(path);
        }

        // Anything that ended without a parent hangs off the sentinel.
        for node in &nodes {
            if node != EXTRACELLULAR_REGION && !parent_of.contains_key(node) {
                parent_of.insert(node.clone(), EXTRACELLULAR_REGION.to_string());
            }
        }

        let mut children: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (child, parent) in &parent_of {
            children.entry(parent.clone()).or_default().push(child.clone());
        }

        let trimmed_root = trim_upper_chain(EXTRACELLULAR_REGION, &children, &present);
        let mut root = CompartmentNode {
            accession: EXTRACELLULAR_REGION.to_string(),
            name: self.name_of(EXTRACELLULAR_REGION),
            children: Vec::new(),
        };
        if trimmed_root != EXTRACELLULAR_REGION {
            root.children.push(self.build_node(&trimmed_root, &children));
        } else {
            for child in children.get(EXTRACELLULAR_REGION).into_iter().flatten() {
                root.children.push(self.build_node(child, &children));
            }
        }
        root
    }

    fn build_node(
        &self,
        accession: &str,
        children: &BTreeMap<String, Vec<String>>,
    ) -> CompartmentNode {
        CompartmentNode {
            accession: accession.to_string(),
            name: self.name_of(accession),
            children: children
                .get(accession)
                .into_iter()
                .flatten()
                .map(|child| self.build_node(child, children))
                .collect(),
        }
    }

    /// Chooses, among every upward path from `accession`, the one that
    /// touches the most other present compartments; ties fall to the
    /// shorter path, then to the lexicographically smaller sequence.
    fn select_path(&self, accession: &str, present: &BTreeSet<String>) -> Vec<String> {
        let mut best: Option<(usize, usize, Vec<String>)> = None;
        let mut stack = vec![accession.to_string()];
        self.walk_paths(accession, present, &mut stack, &mut best);
        match best {
            Some((_, _, path)) => path,
            None => vec![accession.to_string()],
        }
    }

    fn walk_paths(
        &self,
        current: &str,
        present: &BTreeSet<String>,
        stack: &mut Vec<String>,
        best: &mut Option<(usize, usize, Vec<String>)>,
    ) {
        let parents = self
            .terms
            .get(current)
            .map(|term| term.surrounded_by.as_slice())
            .unwrap_or(&[]);
        let mut terminal = true;
        for parent in parents {
            if stack.contains(parent) {
                continue;
            }
            terminal = false;
            stack.push(parent.clone());
            if parent == EXTRACELLULAR_REGION {
                consider_path(stack, present, best);
            } else {
                self.walk_paths(parent, present, stack, best);
            }
            stack.pop();
        }
        if terminal {
            consider_path(stack, present, best);
        }
    }
}

fn consider_path(
    path: &[String],
    present: &BTreeSet<String>,
    best: &mut Option<(usize, usize, Vec<String>)>,
) {
    // The origin itself does not count towards the score.
    let members = path[1..].iter().filter(|acc| present.contains(*acc)).count();
    let better = match best {
        None => true,
        Some((best_members, best_len, best_path)) => {
            members > *best_members
                || (members == *best_members && path.len() < *best_len)
                || (members == *best_members && path.len() == *best_len && path < best_path.as_slice())
        }
    };
    if better {
        *best = Some((members, path.len(), path.to_vec()));
    }
}

/// Walks down from the sentinel while it has a single child that is not a
/// present compartment; the deepest such descendant becomes the node that
/// hangs directly off the sentinel.
fn trim_upper_chain(
    root: &str,
    children: &BTreeMap<String, Vec<String>>,
    present: &BTreeSet<String>,
) -> String {
    let mut outer = root.to_string();
    loop {
        let kids = children.get(&outer);
        match kids {
            Some(kids) if kids.len() == 1 && !present.contains(&outer) => {
                outer = kids[0].clone();
            }
            _ => break,
        }
    }
    outer
}
