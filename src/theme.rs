use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ir::{Category, Dataset};
use crate::quantize::ValueQuantizer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub background: String,
    pub party_a_color: String,
    pub party_a_light: String,
    pub party_b_color: String,
    pub party_b_light: String,
    pub neutral_color: String,
    pub band_mid_color: String,
    pub tick_color: String,
    pub needle_color: String,
    pub projected_dasharray: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            text_color: "#333333".to_string(),
            background: "#FFFFFF".to_string(),
            party_a_color: "#4A90E2".to_string(),
            party_a_light: "#9CC3F0".to_string(),
            party_b_color: "#E24A4A".to_string(),
            party_b_light: "#F09C9C".to_string(),
            neutral_color: "#999999".to_string(),
            band_mid_color: "#FFFFFF".to_string(),
            tick_color: "#333333".to_string(),
            needle_color: "#333333".to_string(),
            projected_dasharray: "3 2".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            text_color: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
            party_a_color: "#2F6FD0".to_string(),
            party_a_light: "#A9C4EE".to_string(),
            party_b_color: "#D0392F".to_string(),
            party_b_light: "#EEB0AA".to_string(),
            neutral_color: "#8A94A6".to_string(),
            band_mid_color: "#F8FAFF".to_string(),
            tick_color: "#7A8AA6".to_string(),
            needle_color: "#1C2430".to_string(),
            projected_dasharray: "4 3".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "modern" => Some(Self::modern()),
            "classic" | "default" | "base" => Some(Self::classic()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

/// Which side of the dial a margin leans toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Lean {
    PartyA,
    PartyB,
    Even,
}

pub fn lean(margin: f64) -> Lean {
    if margin > 0.0 {
        Lean::PartyA
    } else if margin < 0.0 {
        Lean::PartyB
    } else {
        Lean::Even
    }
}

/// Margin-grid key -> highest-priority category at that value. Built once per
/// dataset so live readout coloring is a single hash lookup.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    by_key: HashMap<i64, Category>,
    quantizer: Option<ValueQuantizer>,
}

impl CategoryIndex {
    pub fn build(dataset: &Dataset, quantizer: ValueQuantizer) -> Self {
        let rank = |c: Category| {
            Category::PRIORITY
                .iter()
                .position(|p| *p == c)
                .unwrap_or(usize::MAX)
        };
        let mut by_key: HashMap<i64, Category> = HashMap::new();
        for point in dataset.points.iter().filter(|p| !p.projected) {
            let key = quantizer.key(point.margin);
            by_key
                .entry(key)
                .and_modify(|existing| {
                    if rank(point.category) < rank(*existing) {
                        *existing = point.category;
                    }
                })
                .or_insert(point.category);
        }
        Self {
            by_key,
            quantizer: Some(quantizer),
        }
    }

    pub fn lookup(&self, margin: f64) -> Option<Category> {
        let quantizer = self.quantizer?;
        self.by_key.get(&quantizer.key(margin)).copied()
    }
}

#[derive(Debug, Clone)]
pub struct ColorPolicy<'a> {
    theme: &'a Theme,
    index: CategoryIndex,
}

impl<'a> ColorPolicy<'a> {
    pub fn new(theme: &'a Theme, index: CategoryIndex) -> Self {
        Self { theme, index }
    }

    /// Two-tier palette: midterm results use the saturated hue, everything
    /// else the lighter one.
    pub fn color_for(&self, margin: f64, category: Category) -> &'a str {
        let theme = self.theme;
        let saturated = category == Category::MidtermHouse;
        match (lean(margin), saturated) {
            (Lean::Even, _) => theme.neutral_color.as_str(),
            (Lean::PartyA, true) => theme.party_a_color.as_str(),
            (Lean::PartyA, false) => theme.party_a_light.as_str(),
            (Lean::PartyB, true) => theme.party_b_color.as_str(),
            (Lean::PartyB, false) => theme.party_b_light.as_str(),
        }
    }

    pub fn selection_color(&self, margin: f64) -> &'a str {
        let category = self.index.lookup(margin).unwrap_or(Category::MidtermHouse);
        self.color_for(margin, category)
    }

    pub fn category_at(&self, margin: f64) -> Option<Category> {
        self.index.lookup(margin)
    }
}
