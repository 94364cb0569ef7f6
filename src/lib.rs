pub mod config;
pub mod input;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod ontology;
pub mod text_metrics;

pub use config::LayoutConfig;
pub use input::{ReactionInput, build_layout};
pub use layout::compute_layout;
pub use model::Layout;
pub use ontology::CompartmentOntology;
pub use text_metrics::{CharMetrics, FontMetrics, SystemFontMetrics};
