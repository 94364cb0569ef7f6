use serde::{Deserialize, Serialize};

/// Every tunable distance used by the layout passes. Values default to the
/// reference diagram style; all units are abstract pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Length of each of the two backbone segments flanking the reaction.
    pub backbone_length: f64,
    /// Side of the reaction box.
    pub reaction_size: f64,
    /// Gap between the two columns of an overflowing vertical tile.
    pub column_padding: f64,
    /// Size of the box surrounding regulator and catalyst pointer shapes.
    pub regulator_size: f64,
    /// Minimum length of segments departing participants.
    pub min_segment: f64,
    /// Minimum distance between a compartment border and its contents.
    pub compartment_padding: f64,
    /// Minimum allocated height for any glyph inside a tile.
    pub min_glyph_height: f64,
    /// Minimum allocated width for any glyph inside a tile.
    pub min_glyph_width: f64,
    /// Vertical distance between two glyphs in a tile.
    pub vertical_padding: f64,
    /// Horizontal distance between two glyphs in a tile.
    pub horizontal_padding: f64,
    /// Minimum horizontal clearance around the reaction glyph.
    pub reaction_min_h_distance: f64,
    /// Minimum vertical clearance around the reaction glyph.
    pub reaction_min_v_distance: f64,
    /// Length of connector arrowheads.
    pub arrow_size: f64,
    /// Gap kept between regulators when a strip is compacted.
    pub regulator_gap: f64,
    /// Extra top padding on compartments whose entities hook over the top.
    pub catalyst_hook_clearance: f64,
    /// Vertical tiles switch to two columns above this glyph count.
    pub two_column_threshold: usize,
    /// Side of the stoichiometry badge box.
    pub stoichiometry_box_size: f64,
    /// Side of an attachment box.
    pub attachment_size: f64,
    /// Text padding added to the box of most entity classes.
    pub entity_text_padding: f64,
    /// Text padding for entity sets, encapsulated and process nodes.
    pub set_text_padding: f64,
    /// Extra height reserved for the gene arrow decoration.
    pub gene_arrow_height: f64,
    /// Font size handed to the text-width oracle.
    pub font_size: f32,
    /// Font family handed to the text-width oracle.
    pub font_family: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            backbone_length: 20.0,
            reaction_size: 12.0,
            column_padding: 20.0,
            regulator_size: 6.0,
            min_segment: 35.0,
            compartment_padding: 20.0,
            min_glyph_height: 25.0,
            min_glyph_width: 60.0,
            vertical_padding: 12.0,
            horizontal_padding: 12.0,
            reaction_min_h_distance: 120.0,
            reaction_min_v_distance: 60.0,
            arrow_size: 8.0,
            regulator_gap: 16.0,
            catalyst_hook_clearance: 50.0,
            two_column_threshold: 6,
            stoichiometry_box_size: 12.0,
            attachment_size: 12.0,
            entity_text_padding: 6.0,
            set_text_padding: 15.0,
            gene_arrow_height: 30.0,
            font_size: 8.0,
            font_family: "Arial, sans-serif".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_json() {
        let config = LayoutConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: LayoutConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.backbone_length, config.backbone_length);
        assert_eq!(back.font_family, config.font_family);
    }
}
