use serde::Serialize;

use crate::geometry::Point;
use crate::ir::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TextLayout {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub anchor: TextAnchor,
    pub color: String,
    pub font_size: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: String,
}

/// The colored half-ring, as a closed annular path.
#[derive(Debug, Clone, Serialize)]
pub struct ArcLayout {
    pub center: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub path: String,
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TickLayout {
    pub margin: f64,
    pub angle: f64,
    pub inner: Point,
    pub outer: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokePattern {
    Solid,
    Dashed,
}

/// Which radial band a marker occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerRing {
    /// Inside the color band.
    Presidential,
    /// Outside the color band.
    House,
    /// Spans both bands.
    Projected,
}

impl MarkerRing {
    /// Labels for presidential markers sit inside the arc; everything else
    /// labels outward.
    pub fn labels_outside(self) -> bool {
        !matches!(self, Self::Presidential)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerLayout {
    pub label: String,
    pub years: Vec<i32>,
    pub margin: f64,
    pub category: Category,
    pub ring: MarkerRing,
    pub angle: f64,
    pub label_angle: f64,
    pub inner: Point,
    pub outer: Point,
    pub label_anchor: Point,
    /// Same size the label solver measured with.
    pub font_size: f32,
    pub color: String,
    pub stroke: StrokePattern,
    pub in_range: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NeedleLayout {
    pub margin: f64,
    /// Dial angle (0 = right, 90 = up).
    pub angle: f64,
    /// Clockwise rotation from vertical.
    pub rotation: f64,
    pub pivot: Point,
    pub tip: Point,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadoutLayout {
    pub text: TextLayout,
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GaugeLayout {
    pub width: f64,
    pub height: f64,
    pub arc: ArcLayout,
    pub ticks: Vec<TickLayout>,
    pub markers: Vec<MarkerLayout>,
    pub scale_labels: Vec<TextLayout>,
    pub needle: NeedleLayout,
    pub readout: ReadoutLayout,
}

/// One drawable item, in paint order.
#[derive(Debug, Clone, Copy)]
pub enum Primitive<'a> {
    Arc(&'a ArcLayout),
    Tick(&'a TickLayout),
    Marker(&'a MarkerLayout),
    Label(&'a TextLayout),
    Needle(&'a NeedleLayout),
    Readout(&'a ReadoutLayout),
}

impl GaugeLayout {
    pub fn primitives(&self) -> Vec<Primitive<'_>> {
        let mut out = Vec::with_capacity(
            self.ticks.len() + self.markers.len() + self.scale_labels.len() + 3,
        );
        out.push(Primitive::Arc(&self.arc));
        out.extend(self.ticks.iter().map(Primitive::Tick));
        out.extend(self.markers.iter().map(Primitive::Marker));
        out.extend(self.scale_labels.iter().map(Primitive::Label));
        out.push(Primitive::Needle(&self.needle));
        out.push(Primitive::Readout(&self.readout));
        out
    }

    pub fn marker(&self, label: &str) -> Option<&MarkerLayout> {
        self.markers.iter().find(|m| m.label == label)
    }

    pub fn markers_on(&self, ring: MarkerRing) -> impl Iterator<Item = &MarkerLayout> {
        self.markers.iter().filter(move |m| m.ring == ring)
    }
}
