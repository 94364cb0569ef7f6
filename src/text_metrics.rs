//! Text measurement oracle. The layout only ever asks for the width of a
//! label and the line height; both queries are pure and cheap, so the
//! system-font implementation precomputes what it needs up front.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use ttf_parser::Face;

/// Width/height oracle consumed by the layout passes.
pub trait FontMetrics {
    fn text_width(&self, text: &str) -> f64;
    fn text_height(&self) -> f64;
}

/// Deterministic metrics for tests and headless environments: every
/// character is `char_width` wide and lines are `line_height` tall.
#[derive(Debug, Clone, Copy)]
pub struct CharMetrics {
    pub char_width: f64,
    pub line_height: f64,
}

impl Default for CharMetrics {
    fn default() -> Self {
        Self {
            char_width: 6.0,
            line_height: 12.0,
        }
    }
}

impl FontMetrics for CharMetrics {
    fn text_width(&self, text: &str) -> f64 {
        self.char_width * text.chars().count() as f64
    }

    fn text_height(&self) -> f64 {
        self.line_height
    }
}

static FONT_DB: Lazy<Database> = Lazy::new(|| {
    let mut db = Database::new();
    db.load_system_fonts();
    db
});

/// Metrics backed by a system font. ASCII advances are sampled once at
/// construction; anything else falls back to an average-width estimate, the
/// same estimate used when no matching face exists at all.
#[derive(Debug, Clone)]
pub struct SystemFontMetrics {
    font_size: f64,
    units_per_em: f64,
    ascii_advances: Option<[u16; 128]>,
    line_height: f64,
}

impl SystemFontMetrics {
    /// Looks up `family` (a CSS-style comma-separated list) in the system
    /// font database. Always succeeds; a missing face degrades to the
    /// average-width estimate.
    pub fn load(family: &str, font_size: f32) -> Self {
        let font_size = f64::from(font_size);
        let families = parse_families(family);
        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let mut metrics = Self {
            font_size,
            units_per_em: 1000.0,
            ascii_advances: None,
            line_height: font_size * 1.5,
        };
        if let Some(id) = FONT_DB.query(&query) {
            let _ = FONT_DB.with_face_data(id, |data, index| {
                if let Ok(face) = Face::parse(data, index) {
                    let units = f64::from(face.units_per_em().max(1));
                    let mut advances = [0u16; 128];
                    for byte in 0u8..=127 {
                        if let Some(glyph) = face.glyph_index(byte as char) {
                            advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
                        }
                    }
                    let line = f64::from(face.ascender()) - f64::from(face.descender())
                        + f64::from(face.line_gap());
                    metrics.units_per_em = units;
                    metrics.ascii_advances = Some(advances);
                    metrics.line_height = font_size * line / units;
                }
            });
        }
        metrics
    }

    fn fallback_width(&self) -> f64 {
        self.font_size * 0.56
    }
}

impl FontMetrics for SystemFontMetrics {
    fn text_width(&self, text: &str) -> f64 {
        let scale = self.font_size / self.units_per_em;
        let mut width = 0.0;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let advance = self
                .ascii_advances
                .as_ref()
                .and_then(|advances| advances.get(ch as usize).copied())
                .filter(|advance| *advance > 0);
            match advance {
                Some(advance) => width += f64::from(advance) * scale,
                None => width += self.fallback_width(),
            }
        }
        width
    }

    fn text_height(&self) -> f64 {
        self.line_height
    }
}

fn parse_families(family: &str) -> Vec<Family<'_>> {
    let mut families = Vec::new();
    for part in family.split(',') {
        let raw = part.trim().trim_matches('"').trim_matches('\'');
        if raw.is_empty() {
            continue;
        }
        match raw.to_ascii_lowercase().as_str() {
            "serif" => families.push(Family::Serif),
            "sans-serif" | "system-ui" => families.push(Family::SansSerif),
            "monospace" | "ui-monospace" => families.push(Family::Monospace),
            "cursive" => families.push(Family::Cursive),
            "fantasy" => families.push(Family::Fantasy),
            _ => families.push(Family::Name(raw)),
        }
    }
    if families.is_empty() {
        families.push(Family::SansSerif);
    }
    families
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_metrics_are_linear_in_length() {
        let metrics = CharMetrics::default();
        assert_eq!(metrics.text_width(""), 0.0);
        assert_eq!(metrics.text_width("ATP"), 18.0);
        assert_eq!(metrics.text_height(), 12.0);
    }

    #[test]
    fn system_metrics_always_produce_positive_widths() {
        let metrics = SystemFontMetrics::load("sans-serif", 8.0);
        assert!(metrics.text_width("glucose") > 0.0);
        assert!(metrics.text_height() > 0.0);
    }

    #[test]
    fn family_lists_parse_generics_and_names() {
        let families = parse_families("\"Helvetica Neue\", Arial, sans-serif");
        assert_eq!(families.len(), 3);
        assert!(matches!(families[0], Family::Name("Helvetica Neue")));
        assert!(matches!(families[2], Family::SansSerif));
    }
}
