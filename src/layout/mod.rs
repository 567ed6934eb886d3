//! Render model: turns a dataset plus the live gauge state into positioned
//! drawables. Nothing here mutates its inputs, so it is safe to recompute on
//! every state change.

mod label_placement;
pub mod markers;
pub mod types;

pub use markers::{MarkerGroup, MarkerLayoutResolver, group_points};
pub use types::*;

use crate::config::GaugeConfig;
use crate::drag::GaugeState;
use crate::geometry::{AngleMapper, Point};
use crate::ir::Dataset;
use crate::quantize::ValueQuantizer;
use crate::theme::{CategoryIndex, ColorPolicy, Theme};

const READOUT_OFFSET: f64 = 40.0;
const SCALE_LABEL_OFFSET: f64 = 18.0;
const BOTTOM_PADDING: f64 = 60.0;

pub fn compute_layout(
    dataset: &Dataset,
    state: &GaugeState,
    config: &GaugeConfig,
    theme: &Theme,
) -> GaugeLayout {
    let quantizer = ValueQuantizer::new(config.bound, config.quantization_step);
    let colors = ColorPolicy::new(theme, CategoryIndex::build(dataset, quantizer));
    compute_layout_with(dataset, state, config, theme, &colors)
}

/// Same as [`compute_layout`] but reuses a color policy built for this dataset.
pub fn compute_layout_with(
    dataset: &Dataset,
    state: &GaugeState,
    config: &GaugeConfig,
    theme: &Theme,
    colors: &ColorPolicy<'_>,
) -> GaugeLayout {
    let geometry = &config.geometry;
    let mapper = AngleMapper::new(config.bound, geometry.center);
    let quantizer = ValueQuantizer::new(config.bound, config.quantization_step);

    let arc = arc_layout(&mapper, config, theme);
    let ticks = tick_layouts(&mapper, config);
    let markers = MarkerLayoutResolver::new(config, theme, colors).resolve(dataset);
    let scale_labels = scale_labels(&mapper, config, theme);

    // Needle and readout always stay on the dial.
    let value = if state.current_value.is_finite() {
        quantizer.quantize(state.current_value)
    } else {
        0.0
    };
    let needle = NeedleLayout {
        margin: value,
        angle: mapper.margin_to_angle(value),
        rotation: mapper.needle_rotation(value),
        pivot: geometry.center,
        tip: mapper.margin_to_point(value, geometry.needle_length),
        color: theme.needle_color.clone(),
    };
    let readout = ReadoutLayout {
        text: TextLayout {
            x: geometry.center.x,
            y: geometry.center.y + READOUT_OFFSET,
            text: config.format_margin(value),
            anchor: TextAnchor::Middle,
            color: colors.selection_color(value).to_string(),
            font_size: theme.font_size * 1.6,
        },
        category: colors.category_at(value),
    };

    let outer_extent = geometry.house_outer_radius() + geometry.label_gap * 2.0;
    let width = (geometry.center.x * 2.0).max(geometry.center.x + outer_extent);
    let height = geometry.center.y + BOTTOM_PADDING;

    GaugeLayout {
        width,
        height,
        arc,
        ticks,
        markers,
        scale_labels,
        needle,
        readout,
    }
}

fn arc_layout(mapper: &AngleMapper, config: &GaugeConfig, theme: &Theme) -> ArcLayout {
    let g = &config.geometry;
    let (inner, outer) = (g.band_inner_radius, g.band_outer_radius);
    let bound = config.bound;
    let left_outer = mapper.margin_to_point(-bound, outer);
    let right_outer = mapper.margin_to_point(bound, outer);
    let right_inner = mapper.margin_to_point(bound, inner);
    let left_inner = mapper.margin_to_point(-bound, inner);
    // Over the top is clockwise in screen space, hence sweep 1 then 0.
    let path = format!(
        "M {:.2} {:.2} A {outer:.2} {outer:.2} 0 0 1 {:.2} {:.2} L {:.2} {:.2} A {inner:.2} {inner:.2} 0 0 0 {:.2} {:.2} Z",
        left_outer.x,
        left_outer.y,
        right_outer.x,
        right_outer.y,
        right_inner.x,
        right_inner.y,
        left_inner.x,
        left_inner.y,
    );
    ArcLayout {
        center: g.center,
        inner_radius: inner,
        outer_radius: outer,
        path,
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: theme.party_b_color.clone(),
            },
            GradientStop {
                offset: 0.5,
                color: theme.band_mid_color.clone(),
            },
            GradientStop {
                offset: 1.0,
                color: theme.party_a_color.clone(),
            },
        ],
    }
}

fn tick_layouts(mapper: &AngleMapper, config: &GaugeConfig) -> Vec<TickLayout> {
    let g = &config.geometry;
    let divisions = config.tick_divisions.max(1) as i64;
    (-divisions..=divisions)
        .map(|i| {
            let margin = config.bound * i as f64 / divisions as f64;
            let angle = mapper.margin_to_angle(margin);
            TickLayout {
                margin,
                angle,
                inner: mapper.angle_to_point(angle, g.tick_inner_radius),
                outer: mapper.angle_to_point(angle, g.tick_outer_radius),
            }
        })
        .collect()
}

fn scale_text(config: &GaugeConfig, margin: f64) -> String {
    if margin == 0.0 {
        return config.parties.even.clone();
    }
    let prefix = if margin > 0.0 {
        &config.parties.positive
    } else {
        &config.parties.negative
    };
    let magnitude = margin.abs();
    if magnitude.fract() == 0.0 {
        format!("{prefix}+{}", magnitude as i64)
    } else {
        format!("{prefix}+{magnitude:.1}")
    }
}

fn scale_labels(mapper: &AngleMapper, config: &GaugeConfig, theme: &Theme) -> Vec<TextLayout> {
    let g = &config.geometry;
    let bound = config.bound;
    // End labels start at the band's outer edge and run inward.
    let left = mapper.margin_to_point(-bound, g.band_outer_radius);
    let right = mapper.margin_to_point(bound, g.band_outer_radius);
    let label = |at: Point, margin: f64, anchor: TextAnchor, color: &str| TextLayout {
        x: at.x,
        y: at.y + SCALE_LABEL_OFFSET,
        text: scale_text(config, margin),
        anchor,
        color: color.to_string(),
        font_size: theme.font_size,
    };
    vec![
        label(left, -bound, TextAnchor::Start, theme.party_b_color.as_str()),
        label(
            Point::new(g.center.x, g.center.y + SCALE_LABEL_OFFSET),
            0.0,
            TextAnchor::Middle,
            theme.text_color.as_str(),
        ),
        label(right, bound, TextAnchor::End, theme.party_a_color.as_str()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Category, HistoricalPoint};

    fn layout_for(value: f64) -> GaugeLayout {
        compute_layout(
            &Dataset::sample(),
            &GaugeState::new(value),
            &GaugeConfig::default(),
            &Theme::classic(),
        )
    }

    #[test]
    fn even_needle_points_up() {
        let layout = layout_for(0.0);
        assert_eq!(layout.needle.angle, 90.0);
        assert_eq!(layout.needle.rotation, 0.0);
        assert_eq!(layout.readout.text.text, "EVEN");
        assert_eq!(layout.readout.text.color, Theme::classic().neutral_color);
    }

    #[test]
    fn positive_value_readout() {
        let layout = layout_for(6.0);
        assert_eq!(layout.readout.text.text, "D+6.0");
        assert!((layout.needle.rotation - 54.0).abs() < 1e-9);
        assert!(layout.needle.tip.x > layout.needle.pivot.x);
        assert!(layout.needle.tip.y < layout.needle.pivot.y);
    }

    #[test]
    fn needle_clamps_out_of_range_state() {
        let layout = layout_for(42.0);
        assert_eq!(layout.needle.margin, 10.0);
        assert_eq!(layout.needle.angle, 0.0);
    }

    #[test]
    fn default_ticks_at_ends_and_center() {
        let layout = layout_for(0.0);
        let margins: Vec<f64> = layout.ticks.iter().map(|t| t.margin).collect();
        assert_eq!(margins, vec![-10.0, 0.0, 10.0]);
        let angles: Vec<f64> = layout.ticks.iter().map(|t| t.angle).collect();
        assert_eq!(angles, vec![180.0, 90.0, 0.0]);
    }

    #[test]
    fn tick_subdivisions() {
        let config = GaugeConfig {
            tick_divisions: 2,
            ..GaugeConfig::default()
        };
        let layout = compute_layout(
            &Dataset::default(),
            &GaugeState::default(),
            &config,
            &Theme::classic(),
        );
        let margins: Vec<f64> = layout.ticks.iter().map(|t| t.margin).collect();
        assert_eq!(margins, vec![-10.0, -5.0, 0.0, 5.0, 10.0]);
    }

    #[test]
    fn scale_labels_read_left_to_right() {
        let layout = layout_for(0.0);
        let texts: Vec<&str> = layout.scale_labels.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["R+10", "EVEN", "D+10"]);
        let anchors: Vec<&str> = layout.scale_labels.iter().map(|t| t.anchor.as_svg()).collect();
        assert_eq!(anchors, vec!["start", "middle", "end"]);
        assert!((layout.scale_labels[0].x - 65.0).abs() < 1e-9);
        assert!((layout.scale_labels[2].x - 335.0).abs() < 1e-9);
    }

    #[test]
    fn primitives_are_in_paint_order() {
        let layout = layout_for(1.0);
        let prims = layout.primitives();
        assert!(matches!(prims.first(), Some(Primitive::Arc(_))));
        assert!(matches!(prims.last(), Some(Primitive::Readout(_))));
        assert_eq!(
            prims.len(),
            layout.ticks.len() + layout.markers.len() + layout.scale_labels.len() + 3
        );
    }

    #[test]
    fn readout_color_follows_matching_history() {
        let data = Dataset::new(vec![HistoricalPoint::new(2024, -1.5, Category::Presidential)]);
        let layout = compute_layout(
            &data,
            &GaugeState::new(-1.5),
            &GaugeConfig::default(),
            &Theme::classic(),
        );
        assert_eq!(layout.readout.category, Some(Category::Presidential));
        assert_eq!(layout.readout.text.color, Theme::classic().party_b_light);
    }

    #[test]
    fn arc_path_spans_the_dial() {
        let layout = layout_for(0.0);
        assert!(layout.arc.path.starts_with("M 65.00 200.00 A 135.00 135.00 0 0 1 335.00 200.00"));
        assert!(layout.arc.path.ends_with('Z'));
    }
}
