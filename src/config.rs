use crate::error::GaugeError;
use crate::geometry::{GaugeGeometry, Point};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyNames {
    /// Prefix for positive margins.
    pub positive: String,
    /// Prefix for negative margins.
    pub negative: String,
    pub even: String,
}

impl Default for PartyNames {
    fn default() -> Self {
        Self {
            positive: "D".to_string(),
            negative: "R".to_string(),
            even: "EVEN".to_string(),
        }
    }
}

/// Hand-tuned label nudges keyed by label text. This is a correction table for
/// one known dataset, not a collision solver; it runs after the separation
/// pass and is empty unless configured.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelOffsetTable {
    pub presidential_deg: f64,
    pub house_deg: f64,
    pub presidential: Vec<String>,
    pub house: Vec<String>,
}

impl LabelOffsetTable {
    pub fn offset_for(&self, label: &str, house: bool) -> Option<f64> {
        let (labels, offset) = if house {
            (&self.house, self.house_deg)
        } else {
            (&self.presidential, self.presidential_deg)
        };
        labels.iter().any(|l| l == label).then_some(offset)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    pub font_size: f32,
    /// Floor for the angular gap between neighbouring labels on one ring.
    pub min_separation_deg: f64,
    pub separation_padding: f64,
    /// Estimate label widths from character counts instead of font metrics.
    pub fast_text: bool,
    pub offsets: LabelOffsetTable,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            min_separation_deg: 5.0,
            separation_padding: 2.0,
            fast_text: true,
            offsets: LabelOffsetTable::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaugeConfig {
    pub bound: f64,
    pub quantization_step: f64,
    /// Margins closer than this collapse into one marker. Defaults to half a
    /// quantization step; `Some(0.0)` means exact equality.
    pub group_tolerance: Option<f64>,
    /// Subdivisions per half of the dial; 1 gives ticks at -B, 0, +B.
    pub tick_divisions: usize,
    /// Vertical position of the rotation center inside the input surface.
    pub pointer_center_ratio: f64,
    pub geometry: GaugeGeometry,
    pub labels: LabelConfig,
    pub parties: PartyNames,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            bound: 10.0,
            quantization_step: 0.1,
            group_tolerance: None,
            tick_divisions: 1,
            pointer_center_ratio: 0.75,
            geometry: GaugeGeometry::default(),
            labels: LabelConfig::default(),
            parties: PartyNames::default(),
        }
    }
}

impl GaugeConfig {
    pub fn group_tolerance(&self) -> f64 {
        self.group_tolerance
            .unwrap_or(self.quantization_step / 2.0)
            .max(0.0)
    }

    pub fn validate(&self) -> Result<(), GaugeError> {
        if !(self.bound.is_finite() && self.bound > 0.0) {
            return Err(GaugeError::InvalidConfig(format!(
                "bound must be positive, got {}",
                self.bound
            )));
        }
        if !(self.quantization_step.is_finite() && self.quantization_step > 0.0) {
            return Err(GaugeError::InvalidConfig(format!(
                "quantization step must be positive, got {}",
                self.quantization_step
            )));
        }
        if !(0.0..=1.0).contains(&self.pointer_center_ratio) {
            return Err(GaugeError::InvalidConfig(format!(
                "pointer center ratio must be within [0, 1], got {}",
                self.pointer_center_ratio
            )));
        }
        let g = &self.geometry;
        if g.band_inner_radius <= 0.0 || g.band_outer_radius <= g.band_inner_radius {
            return Err(GaugeError::InvalidConfig(
                "band radii must satisfy 0 < inner < outer".to_string(),
            ));
        }
        Ok(())
    }

    /// Format a margin for the readout: `D+6.0`, `R+2.8`, `EVEN`.
    pub fn format_margin(&self, margin: f64) -> String {
        if margin > 0.0 {
            format!("{}+{:.1}", self.parties.positive, margin)
        } else if margin < 0.0 {
            format!("{}+{:.1}", self.parties.negative, margin.abs())
        } else {
            self.parties.even.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 260.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub gauge: GaugeConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            gauge: GaugeConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    text_color: Option<String>,
    background: Option<String>,
    party_a_color: Option<String>,
    party_a_light: Option<String>,
    party_b_color: Option<String>,
    party_b_light: Option<String>,
    neutral_color: Option<String>,
    tick_color: Option<String>,
    needle_color: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GeometryConfigFile {
    center_x: Option<f64>,
    center_y: Option<f64>,
    band_inner_radius: Option<f64>,
    band_outer_radius: Option<f64>,
    tick_inner_radius: Option<f64>,
    tick_outer_radius: Option<f64>,
    house_gap: Option<f64>,
    hash_length: Option<f64>,
    label_gap: Option<f64>,
    needle_length: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LabelOffsetFile {
    presidential_deg: Option<f64>,
    house_deg: Option<f64>,
    #[serde(default)]
    presidential: Vec<String>,
    #[serde(default)]
    house: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LabelConfigFile {
    font_size: Option<f32>,
    min_separation_deg: Option<f64>,
    separation_padding: Option<f64>,
    fast_text: Option<bool>,
    offsets: Option<LabelOffsetFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PartyNamesFile {
    positive: Option<String>,
    negative: Option<String>,
    even: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    bound: Option<f64>,
    quantization_step: Option<f64>,
    group_tolerance: Option<f64>,
    tick_divisions: Option<usize>,
    pointer_center_ratio: Option<f64>,
    geometry: Option<GeometryConfigFile>,
    labels: Option<LabelConfigFile>,
    /// Legacy name for `labels.offsets`.
    label_offset_table: Option<LabelOffsetFile>,
    parties: Option<PartyNamesFile>,
    width: Option<f32>,
    height: Option<f32>,
}

/// Load a config file. `.json5` files go through the JSON5 parser so they can
/// carry comments; everything else is plain JSON. No path means defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let is_json5 = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false);
    if is_json5 {
        parse_config_json5(&contents)
    } else {
        parse_config(&contents)
    }
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    apply_config_file(parsed)
}

pub fn parse_config_json5(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    apply_config_file(parsed)
}

fn apply_config_file(parsed: ConfigFile) -> anyhow::Result<Config> {
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::by_name(theme_name) {
            Some(theme) => config.theme = theme,
            None => log::warn!("unknown theme {theme_name:?}, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        let theme = &mut config.theme;
        if let Some(v) = vars.font_family {
            theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            theme.font_size = v;
        }
        if let Some(v) = vars.text_color {
            theme.text_color = v;
        }
        if let Some(v) = vars.background {
            theme.background = v;
        }
        if let Some(v) = vars.party_a_color {
            theme.party_a_color = v;
        }
        if let Some(v) = vars.party_a_light {
            theme.party_a_light = v;
        }
        if let Some(v) = vars.party_b_color {
            theme.party_b_color = v;
        }
        if let Some(v) = vars.party_b_light {
            theme.party_b_light = v;
        }
        if let Some(v) = vars.neutral_color {
            theme.neutral_color = v;
        }
        if let Some(v) = vars.tick_color {
            theme.tick_color = v;
        }
        if let Some(v) = vars.needle_color {
            theme.needle_color = v;
        }
    }
    config.render.background = config.theme.background.clone();

    let gauge = &mut config.gauge;
    if let Some(v) = parsed.bound {
        gauge.bound = v;
    }
    if let Some(v) = parsed.quantization_step {
        gauge.quantization_step = v;
    }
    if parsed.group_tolerance.is_some() {
        gauge.group_tolerance = parsed.group_tolerance;
    }
    if let Some(v) = parsed.tick_divisions {
        gauge.tick_divisions = v.max(1);
    }
    if let Some(v) = parsed.pointer_center_ratio {
        gauge.pointer_center_ratio = v;
    }

    if let Some(geo) = parsed.geometry {
        let g = &mut gauge.geometry;
        g.center = Point::new(
            geo.center_x.unwrap_or(g.center.x),
            geo.center_y.unwrap_or(g.center.y),
        );
        if let Some(v) = geo.band_inner_radius {
            g.band_inner_radius = v;
        }
        if let Some(v) = geo.band_outer_radius {
            g.band_outer_radius = v;
        }
        if let Some(v) = geo.tick_inner_radius {
            g.tick_inner_radius = v;
        }
        if let Some(v) = geo.tick_outer_radius {
            g.tick_outer_radius = v;
        }
        if let Some(v) = geo.house_gap {
            g.house_gap = v;
        }
        if let Some(v) = geo.hash_length {
            g.hash_length = v;
        }
        if let Some(v) = geo.label_gap {
            g.label_gap = v;
        }
        if let Some(v) = geo.needle_length {
            g.needle_length = v;
        }
    }

    let mut offsets = parsed.label_offset_table;
    if let Some(labels) = parsed.labels {
        let l = &mut gauge.labels;
        if let Some(v) = labels.font_size {
            l.font_size = v;
        }
        if let Some(v) = labels.min_separation_deg {
            l.min_separation_deg = v;
        }
        if let Some(v) = labels.separation_padding {
            l.separation_padding = v;
        }
        if let Some(v) = labels.fast_text {
            l.fast_text = v;
        }
        if labels.offsets.is_some() {
            offsets = labels.offsets;
        }
    }
    if let Some(file) = offsets {
        let table = &mut gauge.labels.offsets;
        if let Some(v) = file.presidential_deg {
            table.presidential_deg = v;
        }
        if let Some(v) = file.house_deg {
            table.house_deg = v;
        }
        table.presidential = file.presidential;
        table.house = file.house;
    }

    if let Some(parties) = parsed.parties {
        let p = &mut gauge.parties;
        if let Some(v) = parties.positive {
            p.positive = v;
        }
        if let Some(v) = parties.negative {
            p.negative = v;
        }
        if let Some(v) = parties.even {
            p.even = v;
        }
    }

    if let Some(v) = parsed.width {
        config.render.width = v;
    }
    if let Some(v) = parsed.height {
        config.render.height = v;
    }

    config.gauge.validate()?;
    Ok(config)
}

/// Flat view of the correction table, handy for dumps.
pub fn offset_table_entries(table: &LabelOffsetTable) -> BTreeMap<String, f64> {
    let mut entries = BTreeMap::new();
    for label in &table.presidential {
        entries.insert(format!("presidential:{label}"), table.presidential_deg);
    }
    for label in &table.house {
        entries.insert(format!("house:{label}"), table.house_deg);
    }
    entries
}
