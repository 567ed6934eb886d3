use crate::config::GaugeConfig;
use crate::error::GaugeError;
use crate::geometry::{AngleMapper, GaugeGeometry};
use crate::ir::{Category, Dataset, HistoricalPoint};
use crate::text_metrics::label_width;
use crate::theme::{ColorPolicy, Theme};

use super::label_placement::{angular_width, spread_angles};
use super::{MarkerLayout, MarkerRing, StrokePattern};

/// Points that share one hash mark on the dial.
#[derive(Debug, Clone)]
pub struct MarkerGroup {
    pub members: Vec<HistoricalPoint>,
    pub ring: MarkerRing,
}

impl MarkerGroup {
    pub fn margin(&self) -> f64 {
        self.members[0].margin
    }

    pub fn category(&self) -> Category {
        self.members[0].category
    }

    pub fn years(&self) -> Vec<i32> {
        self.members.iter().map(|p| p.year).collect()
    }

    /// Two-digit years in dataset order, `/`-separated.
    pub fn label(&self) -> String {
        self.members
            .iter()
            .map(HistoricalPoint::short_year)
            .collect::<Vec<_>>()
            .join("/")
    }
}

pub fn ring_for(point: &HistoricalPoint) -> MarkerRing {
    if point.projected {
        MarkerRing::Projected
    } else if point.category.is_house() {
        MarkerRing::House
    } else {
        MarkerRing::Presidential
    }
}

/// Group points on the same ring whose margins are within `tolerance` of the
/// group's first member. `tolerance == 0` is exact equality.
pub fn group_points(points: &[HistoricalPoint], tolerance: f64) -> Vec<MarkerGroup> {
    let mut groups: Vec<MarkerGroup> = Vec::new();
    for point in points {
        let ring = ring_for(point);
        let existing = groups.iter_mut().find(|g| {
            g.ring == ring && {
                let delta = (g.margin() - point.margin).abs();
                if tolerance > 0.0 {
                    delta <= tolerance
                } else {
                    delta == 0.0
                }
            }
        });
        match existing {
            Some(group) => group.members.push(point.clone()),
            None => groups.push(MarkerGroup {
                members: vec![point.clone()],
                ring,
            }),
        }
    }
    groups
}

pub struct MarkerLayoutResolver<'a> {
    mapper: AngleMapper,
    config: &'a GaugeConfig,
    theme: &'a Theme,
    colors: &'a ColorPolicy<'a>,
}

struct Radii {
    hash_inner: f64,
    hash_outer: f64,
    label: f64,
}

impl<'a> MarkerLayoutResolver<'a> {
    pub fn new(config: &'a GaugeConfig, theme: &'a Theme, colors: &'a ColorPolicy<'a>) -> Self {
        Self {
            mapper: AngleMapper::new(config.bound, config.geometry.center),
            config,
            theme,
            colors,
        }
    }

    fn radii(&self, ring: MarkerRing) -> Radii {
        let g: &GaugeGeometry = &self.config.geometry;
        let inset = (g.band_outer_radius - g.band_inner_radius) * 0.2;
        let outside_label = g.house_outer_radius() + g.label_gap;
        match ring {
            MarkerRing::Presidential => Radii {
                hash_inner: g.band_inner_radius + inset,
                hash_outer: g.band_outer_radius - inset,
                label: g.band_inner_radius - g.label_gap,
            },
            MarkerRing::House => Radii {
                hash_inner: g.house_inner_radius(),
                hash_outer: g.house_outer_radius(),
                label: outside_label,
            },
            MarkerRing::Projected => Radii {
                hash_inner: g.band_inner_radius,
                hash_outer: g.house_outer_radius(),
                label: outside_label,
            },
        }
    }

    pub fn resolve(&self, dataset: &Dataset) -> Vec<MarkerLayout> {
        let bound = self.config.bound;
        let drawable: Vec<HistoricalPoint> = dataset
            .points
            .iter()
            .filter(|p| {
                if p.margin.is_finite() {
                    return true;
                }
                let err = GaugeError::ValueError { value: p.margin };
                log::warn!("{}: {err}; skipping marker", p.year);
                false
            })
            .cloned()
            .collect();
        let groups = group_points(&drawable, self.config.group_tolerance());
        let labels = &self.config.labels;

        let mut markers: Vec<MarkerLayout> = groups
            .iter()
            .map(|group| {
                let margin = group.margin();
                let in_range = margin.abs() <= bound;
                if !in_range {
                    let err = GaugeError::OutOfRangeData {
                        year: group.members[0].year,
                        margin,
                        bound,
                    };
                    log::warn!("{err}; drawing outside the band");
                }
                let radii = self.radii(group.ring);
                let angle = self.mapper.margin_to_angle(margin);
                MarkerLayout {
                    label: group.label(),
                    years: group.years(),
                    margin,
                    category: group.category(),
                    ring: group.ring,
                    angle,
                    label_angle: angle,
                    inner: self.mapper.angle_to_point(angle, radii.hash_inner),
                    outer: self.mapper.angle_to_point(angle, radii.hash_outer),
                    label_anchor: self.mapper.angle_to_point(angle, radii.label),
                    font_size: labels.font_size,
                    color: self.colors.color_for(margin, group.category()).to_string(),
                    stroke: if group.ring == MarkerRing::Projected {
                        StrokePattern::Dashed
                    } else {
                        StrokePattern::Solid
                    },
                    in_range,
                }
            })
            .collect();

        for outside in [false, true] {
            let idxs: Vec<usize> = markers
                .iter()
                .enumerate()
                .filter(|(_, m)| m.ring.labels_outside() == outside)
                .map(|(i, _)| i)
                .collect();
            if idxs.is_empty() {
                continue;
            }
            let ring = if outside {
                MarkerRing::House
            } else {
                MarkerRing::Presidential
            };
            let radius = self.radii(ring).label;
            let desired: Vec<f64> = idxs.iter().map(|&i| markers[i].angle).collect();
            let widths: Vec<f64> = idxs
                .iter()
                .map(|&i| {
                    let text_w = label_width(
                        &markers[i].label,
                        labels.font_size,
                        &self.theme.font_family,
                        labels.fast_text,
                    );
                    angular_width(text_w as f64, radius, labels.separation_padding)
                })
                .collect();
            let resolved = spread_angles(&desired, &widths, labels.min_separation_deg);
            for (&i, label_angle) in idxs.iter().zip(resolved) {
                let marker = &mut markers[i];
                marker.label_angle = label_angle;
                if marker.in_range
                    && let Some(offset) = labels.offsets.offset_for(&marker.label, outside)
                {
                    marker.label_angle += offset;
                }
                marker.label_anchor = self.mapper.angle_to_point(marker.label_angle, radius);
            }
        }

        log::debug!("placed {} markers from {} points", markers.len(), dataset.len());
        markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantize::ValueQuantizer;
    use crate::theme::CategoryIndex;

    fn resolve_with(dataset: &Dataset, config: &GaugeConfig) -> Vec<MarkerLayout> {
        let theme = Theme::classic();
        let colors = ColorPolicy::new(
            &theme,
            CategoryIndex::build(
                dataset,
                ValueQuantizer::new(config.bound, config.quantization_step),
            ),
        );
        MarkerLayoutResolver::new(config, &theme, &colors).resolve(dataset)
    }

    #[test]
    fn equal_margins_share_a_group() {
        let points = vec![
            HistoricalPoint::new(2010, -5.1, Category::MidtermHouse),
            HistoricalPoint::new(2012, 3.0, Category::PresidentialYearHouse),
            HistoricalPoint::new(2014, -5.1, Category::MidtermHouse),
        ];
        let groups = group_points(&points, 0.0);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label(), "10/14");
        assert_eq!(groups[0].years(), vec![2010, 2014]);
    }

    #[test]
    fn tolerance_merges_near_equal_margins() {
        let points = vec![
            HistoricalPoint::new(2010, 1.2, Category::MidtermHouse),
            HistoricalPoint::new(2012, 1.23, Category::PresidentialYearHouse),
        ];
        assert_eq!(group_points(&points, 0.0).len(), 2);
        let merged = group_points(&points, 0.05);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].category(), Category::MidtermHouse);
    }

    #[test]
    fn rings_do_not_merge() {
        let points = vec![
            HistoricalPoint::new(2016, 2.1, Category::Presidential),
            HistoricalPoint::new(2018, 2.1, Category::MidtermHouse),
            HistoricalPoint::projected(2026, 2.1, Category::MidtermHouse),
        ];
        assert_eq!(group_points(&points, 0.05).len(), 3);
    }

    #[test]
    fn presidential_inside_band_house_outside() {
        let config = GaugeConfig::default();
        let g = &config.geometry;
        let markers = resolve_with(&Dataset::sample(), &config);
        let center = g.center;
        let radius = |p: crate::geometry::Point| ((p.x - center.x).powi(2) + (p.y - center.y).powi(2)).sqrt();
        for m in &markers {
            let (ri, ro) = (radius(m.inner), radius(m.outer));
            match m.ring {
                MarkerRing::Presidential => {
                    assert!(ri > g.band_inner_radius && ro < g.band_outer_radius, "{}", m.label);
                }
                MarkerRing::House => {
                    assert!(ri > g.band_outer_radius && ro > ri, "{}", m.label);
                }
                MarkerRing::Projected => unreachable!(),
            }
        }
    }

    #[test]
    fn projected_marker_spans_both_bands_dashed() {
        let config = GaugeConfig::default();
        let data = Dataset::new(vec![HistoricalPoint::projected(
            2026,
            -1.0,
            Category::MidtermHouse,
        )]);
        let markers = resolve_with(&data, &config);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].stroke, StrokePattern::Dashed);
        assert_eq!(markers[0].ring, MarkerRing::Projected);
    }

    #[test]
    fn labels_on_a_ring_keep_minimum_separation() {
        let config = GaugeConfig::default();
        let data = Dataset::new(vec![
            HistoricalPoint::new(2012, 1.2, Category::PresidentialYearHouse),
            HistoricalPoint::new(2016, 1.1, Category::PresidentialYearHouse),
            HistoricalPoint::new(2024, 0.5, Category::PresidentialYearHouse),
            HistoricalPoint::new(2022, 1.0, Category::MidtermHouse),
        ]);
        let markers = resolve_with(&data, &config);
        let mut angles: Vec<f64> = markers.iter().map(|m| m.label_angle).collect();
        angles.sort_by(f64::total_cmp);
        for pair in angles.windows(2) {
            assert!(pair[1] - pair[0] >= config.labels.min_separation_deg - 1e-9);
        }
        // Hash marks themselves stay on their true angle.
        for m in &markers {
            assert!((m.angle - 180.0 * (1.0 - (m.margin + 10.0) / 20.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn offset_table_applies_to_listed_labels_only() {
        let mut config = GaugeConfig::default();
        config.labels.offsets.presidential_deg = 4.0;
        config.labels.offsets.presidential = vec!["24".to_string(), "36".to_string()];
        let data = Dataset::new(vec![
            HistoricalPoint::new(2024, -1.5, Category::Presidential),
            HistoricalPoint::new(2020, 4.5, Category::Presidential),
            HistoricalPoint::new(1936, 24.2, Category::Presidential),
        ]);
        let markers = resolve_with(&data, &config);
        assert!((markers[0].label_angle - markers[0].angle - 4.0).abs() < 1e-9);
        assert_eq!(markers[1].label_angle, markers[1].angle);
        // Out of range: drawn unclamped, correction table skipped.
        assert!(!markers[2].in_range);
        assert!(markers[2].angle < 0.0);
        assert_eq!(markers[2].label_angle, markers[2].angle);
    }

    #[test]
    fn non_finite_margins_are_skipped() {
        let config = GaugeConfig::default();
        let data = Dataset::new(vec![
            HistoricalPoint::new(2018, 8.6, Category::MidtermHouse),
            HistoricalPoint::new(2022, f64::NAN, Category::MidtermHouse),
            HistoricalPoint::new(2024, f64::INFINITY, Category::PresidentialYearHouse),
        ]);
        let markers = resolve_with(&data, &config);
        assert_eq!(markers.len(), 1);
        let marker = &markers[0];
        assert_eq!(marker.label, "18");
        assert_eq!(marker.label_angle, marker.angle);
        assert!(marker.label_anchor.x.is_finite() && marker.label_anchor.y.is_finite());
    }

    #[test]
    fn negative_midterm_group_uses_saturated_color() {
        let config = GaugeConfig::default();
        let data = Dataset::new(vec![
            HistoricalPoint::new(2010, -5.1, Category::MidtermHouse),
            HistoricalPoint::new(2014, -5.1, Category::MidtermHouse),
        ]);
        let markers = resolve_with(&data, &config);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].label, "10/14");
        assert_eq!(markers[0].color, Theme::classic().party_b_color);
    }
}
