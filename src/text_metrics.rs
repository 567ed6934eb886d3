use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

/// Average glyph advance as a fraction of the font size, used when no font
/// is available or fast measurement is requested.
const FALLBACK_ADVANCE: f32 = 0.56;

static LABEL_MEASURER: Lazy<Mutex<LabelMeasurer>> = Lazy::new(|| Mutex::new(LabelMeasurer::new()));

/// Character-count estimate. Deterministic, no font lookup.
pub fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().filter(|c| *c != '\n').count() as f32 * font_size * FALLBACK_ADVANCE
}

/// Width from the first installed font matching `font_family`, if any.
pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = LABEL_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

/// Font metrics when `fast` is off and a face resolves, otherwise the estimate.
pub fn label_width(text: &str, font_size: f32, font_family: &str, fast: bool) -> f32 {
    if fast {
        return estimate_text_width(text, font_size);
    }
    measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| estimate_text_width(text, font_size))
}

struct LabelMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<FaceMetrics>>,
}

impl LabelMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = normalize_family_key(font_family);
        if !self.faces.contains_key(&key) {
            let metrics = self.load_face(font_family);
            if metrics.is_none() {
                log::debug!("no font face for {key:?}, estimating label widths");
            }
            self.faces.insert(key.clone(), metrics);
        }
        let metrics = self.faces.get(&key)?.as_ref()?;
        Some(metrics.width(text, font_size))
    }

    fn load_face(&mut self, font_family: &str) -> Option<FaceMetrics> {
        let names: Vec<String> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_string())
            .filter(|name| !name.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => Family::SansSerif,
                "monospace" | "ui-monospace" => Family::Monospace,
                "cursive" => Family::Cursive,
                "fantasy" => Family::Fantasy,
                _ => Family::Name(name.as_str()),
            })
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        self.db
            .with_face_data(id, |data, index| {
                Face::parse(data, index).ok().map(|face| FaceMetrics::from_face(&face))
            })
            .flatten()
    }
}

/// Horizontal advances for printable ASCII, which covers every label the
/// gauge draws (years, party prefixes, digits).
struct FaceMetrics {
    units_per_em: f32,
    ascii_advances: [u16; 128],
}

impl FaceMetrics {
    fn from_face(face: &Face<'_>) -> Self {
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        Self {
            units_per_em: face.units_per_em().max(1) as f32,
            ascii_advances,
        }
    }

    fn width(&self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em;
        let fallback = font_size * FALLBACK_ADVANCE;
        text.chars()
            .filter(|ch| *ch != '\n')
            .map(|ch| {
                let advance = if ch.is_ascii() {
                    self.ascii_advances[ch as usize]
                } else {
                    0
                };
                if advance == 0 {
                    fallback
                } else {
                    advance as f32 * scale
                }
            })
            .sum::<f32>()
            .max(0.0)
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}
