//! Dial geometry and the margin <-> angle <-> point mapping.
//!
//! Angles are in degrees, measured counter-clockwise from the positive x axis
//! the way a unit circle is drawn: 0 points right (`+bound`), 90 points up
//! (margin 0) and 180 points left (`-bound`). Screen y grows downward, so
//! `margin_to_point` flips the sine term.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.x.is_finite() && self.y.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// Fixed radii of the dial. Everything is measured from `center`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaugeGeometry {
    pub center: Point,
    pub band_inner_radius: f64,
    pub band_outer_radius: f64,
    pub tick_inner_radius: f64,
    pub tick_outer_radius: f64,
    /// Gap between the band's outer edge and house hash marks.
    pub house_gap: f64,
    pub hash_length: f64,
    pub label_gap: f64,
    pub needle_length: f64,
}

impl Default for GaugeGeometry {
    fn default() -> Self {
        Self {
            center: Point::new(200.0, 200.0),
            band_inner_radius: 105.0,
            band_outer_radius: 135.0,
            tick_inner_radius: 100.0,
            tick_outer_radius: 140.0,
            house_gap: 4.0,
            hash_length: 14.0,
            label_gap: 12.0,
            needle_length: 120.0,
        }
    }
}

impl GaugeGeometry {
    pub fn band_mid_radius(&self) -> f64 {
        (self.band_inner_radius + self.band_outer_radius) / 2.0
    }

    pub fn house_inner_radius(&self) -> f64 {
        self.band_outer_radius + self.house_gap
    }

    pub fn house_outer_radius(&self) -> f64 {
        self.house_inner_radius() + self.hash_length
    }

    /// Input box around the dial whose drag pivot (horizontal middle,
    /// `center_ratio` of the way down) lands on `center`.
    pub fn input_surface(&self, center_ratio: f64) -> Rect {
        let reach = self.tick_outer_radius;
        let height = reach / center_ratio;
        Rect::new(
            self.center.x - reach,
            self.center.y - reach,
            reach * 2.0,
            height,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleMapper {
    bound: f64,
    center: Point,
}

impl AngleMapper {
    pub fn new(bound: f64, center: Point) -> Self {
        Self { bound, center }
    }

    pub fn margin_to_angle(&self, margin: f64) -> f64 {
        let normalized = (margin + self.bound) / (2.0 * self.bound);
        180.0 * (1.0 - normalized)
    }

    pub fn angle_to_margin(&self, angle: f64) -> f64 {
        self.bound * (1.0 - angle / 90.0)
    }

    pub fn angle_to_point(&self, angle: f64, radius: f64) -> Point {
        let rad = angle.to_radians();
        Point::new(
            self.center.x + radius * rad.cos(),
            self.center.y - radius * rad.sin(),
        )
    }

    pub fn margin_to_point(&self, margin: f64, radius: f64) -> Point {
        self.angle_to_point(self.margin_to_angle(margin), radius)
    }

    /// Clockwise rotation from straight up, the form a needle transform wants.
    pub fn needle_rotation(&self, margin: f64) -> f64 {
        (margin / self.bound) * 90.0
    }
}
