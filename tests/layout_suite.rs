use std::path::{Path, PathBuf};

use proptest::prelude::*;
use swing_gauge::config::load_config;
use swing_gauge::drag::{GaugeState, PointerDragController, PointerEvent};
use swing_gauge::geometry::{AngleMapper, Point};
use swing_gauge::ir::{Category, Dataset, HistoricalPoint};
use swing_gauge::layout::MarkerRing;
use swing_gauge::layout_dump::LayoutDump;
use swing_gauge::quantize::ValueQuantizer;
use swing_gauge::{GaugeConfig, Theme, compute_layout, load_dataset, render_svg};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
}

#[test]
fn render_all_fixtures() {
    let config = GaugeConfig::default();
    let theme = Theme::modern();
    // Keep this list explicit so new fixtures must be added intentionally.
    for name in ["decades.txt", "midterm_tie.txt", "landslides.json"] {
        let path = fixture(name);
        assert!(path.exists(), "fixture missing: {name}");
        let dataset = load_dataset(Some(&path), &config.parties).expect("fixture parse failed");
        assert!(!dataset.is_empty(), "{name}: empty dataset");
        let layout = compute_layout(&dataset, &GaugeState::new(0.4), &config, &theme);
        assert_valid_svg(&render_svg(&layout, &theme), name);
    }
}

#[test]
fn tied_midterms_share_one_marker() {
    let config = GaugeConfig::default();
    let theme = Theme::classic();
    let dataset = load_dataset(Some(&fixture("midterm_tie.txt")), &config.parties).unwrap();
    let layout = compute_layout(&dataset, &GaugeState::default(), &config, &theme);

    let marker = layout.marker("10/14").expect("grouped marker");
    assert_eq!(marker.years, vec![2010, 2014]);
    assert_eq!(marker.margin, -5.1);
    assert_eq!(marker.category, Category::MidtermHouse);
    assert_eq!(marker.color, theme.party_b_color);
    assert_eq!(layout.markers.len(), 2);
}

#[test]
fn even_value_points_straight_up() {
    let layout = compute_layout(
        &Dataset::sample(),
        &GaugeState::new(0.0),
        &GaugeConfig::default(),
        &Theme::classic(),
    );
    assert_eq!(layout.needle.angle, 90.0);
    assert_eq!(layout.readout.text.text, "EVEN");
}

#[test]
fn six_point_lead_reads_and_rotates() {
    let layout = compute_layout(
        &Dataset::sample(),
        &GaugeState::new(6.0),
        &GaugeConfig::default(),
        &Theme::classic(),
    );
    assert_eq!(layout.readout.text.text, "D+6.0");
    assert!((layout.needle.rotation - 54.0).abs() < 1e-9);
    assert!((layout.needle.angle - 36.0).abs() < 1e-9);
}

#[test]
fn pointer_at_top_center_selects_even() {
    let config = GaugeConfig::default();
    let quantizer = ValueQuantizer::new(config.bound, config.quantization_step);
    let controller =
        PointerDragController::new(config.bound, quantizer, config.pointer_center_ratio);
    let surface = config.geometry.input_surface(config.pointer_center_ratio);
    let top = Point::new(surface.x + surface.width / 2.0, surface.y);

    let angle = controller.raw_angle(top, &surface).unwrap();
    assert!((angle - 90.0).abs() < 1e-6);

    let mut state = GaugeState::new(7.5);
    let value = controller
        .handle(&mut state, &PointerEvent::Down { position: top, surface })
        .unwrap();
    assert_eq!(value, Some(0.0));
    controller.handle(&mut state, &PointerEvent::Up).unwrap();
    assert!(!state.is_dragging());
    assert_eq!(state.current_value, 0.0);
}

#[test]
fn landslides_render_outside_the_band() {
    let config = GaugeConfig::default();
    let dataset = load_dataset(Some(&fixture("landslides.json")), &config.parties).unwrap();
    let issues = dataset.validate(config.bound);
    assert_eq!(issues.len(), 3);

    let layout = compute_layout(&dataset, &GaugeState::default(), &config, &Theme::classic());
    for marker in layout.markers.iter().filter(|m| !m.in_range) {
        assert!(
            marker.angle < 0.0 || marker.angle > 180.0,
            "{} at {}",
            marker.label,
            marker.angle
        );
    }
    assert_eq!(layout.markers.iter().filter(|m| m.in_range).count(), 2);
    assert_eq!(layout.markers_on(MarkerRing::Projected).count(), 1);
}

#[test]
fn json5_config_renames_parties() {
    let config = load_config(Some(&fixture("party_names.json5"))).unwrap();
    assert_eq!(config.gauge.bound, 8.0);
    assert_eq!(config.theme.projected_dasharray, Theme::modern().projected_dasharray);

    let dataset = load_dataset(Some(&fixture("party_names.txt")), &config.gauge.parties).unwrap();
    assert_eq!(dataset.points[1].margin, -2.8);
    assert_eq!(dataset.validate(config.gauge.bound).len(), 1);

    let quantizer = ValueQuantizer::new(config.gauge.bound, config.gauge.quantization_step);
    let mut state = GaugeState::default();
    state.set_value(-2.8, &quantizer).unwrap();
    let layout = compute_layout(&dataset, &state, &config.gauge, &config.theme);
    assert_eq!(layout.readout.text.text, "Red+3.0");

    let dump = LayoutDump::from_layout(&layout, &state, &config.gauge);
    let json: serde_json::Value = serde_json::from_str(&dump.to_json().unwrap()).unwrap();
    assert_eq!(json["quantization_step"], 0.5);
    assert_eq!(json["group_tolerance"], 0.25);
}

fn category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::MidtermHouse),
        Just(Category::PresidentialYearHouse),
        Just(Category::Presidential),
    ]
}

proptest! {
    #[test]
    fn angle_round_trip(bound in 1.0f64..50.0, t in -1.0f64..=1.0) {
        let mapper = AngleMapper::new(bound, Point::new(0.0, 0.0));
        let margin = bound * t;
        let back = mapper.angle_to_margin(mapper.margin_to_angle(margin));
        prop_assert!((back - margin).abs() < 1e-6);
    }

    #[test]
    fn angle_decreases_with_margin(a in -10.0f64..10.0, b in -10.0f64..10.0) {
        prop_assume!((a - b).abs() > 1e-9);
        let mapper = AngleMapper::new(10.0, Point::new(0.0, 0.0));
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        prop_assert!(mapper.margin_to_angle(lo) > mapper.margin_to_angle(hi));
    }

    #[test]
    fn idle_moves_never_change_value(
        start in -10.0f64..10.0,
        moves in prop::collection::vec((0.0f64..400.0, 0.0f64..300.0), 1..20),
    ) {
        let config = GaugeConfig::default();
        let quantizer = ValueQuantizer::new(config.bound, config.quantization_step);
        let controller =
            PointerDragController::new(config.bound, quantizer, config.pointer_center_ratio);
        let surface = config.geometry.input_surface(config.pointer_center_ratio);
        let mut state = GaugeState::new(start);
        for (x, y) in moves {
            let event = PointerEvent::Move { position: Point::new(x, y), surface };
            prop_assert_eq!(controller.handle(&mut state, &event).unwrap(), None);
        }
        prop_assert_eq!(state.current_value, start);
    }

    #[test]
    fn dragging_to_a_mark_reads_its_margin(margin in -10.0f64..=10.0) {
        let config = GaugeConfig::default();
        let quantizer = ValueQuantizer::new(config.bound, config.quantization_step);
        let controller =
            PointerDragController::new(config.bound, quantizer, config.pointer_center_ratio);
        let surface = config.geometry.input_surface(config.pointer_center_ratio);
        let mapper = AngleMapper::new(config.bound, config.geometry.center);
        let position = mapper.margin_to_point(margin, config.geometry.band_mid_radius());
        let read = controller.margin_at(position, &surface).unwrap();
        prop_assert!((read - margin).abs() <= config.quantization_step / 2.0 + 1e-6);
    }

    #[test]
    fn same_ring_labels_keep_minimum_separation(
        points in prop::collection::vec((-10.0f64..=10.0, category()), 1..12),
    ) {
        let config = GaugeConfig::default();
        let dataset = Dataset::new(
            points
                .into_iter()
                .enumerate()
                .map(|(i, (margin, category))| HistoricalPoint::new(1950 + 2 * i as i32, margin, category))
                .collect(),
        );
        let layout = compute_layout(&dataset, &GaugeState::default(), &config, &Theme::classic());
        for outside in [false, true] {
            let mut angles: Vec<f64> = layout
                .markers
                .iter()
                .filter(|m| m.ring.labels_outside() == outside)
                .map(|m| m.label_angle)
                .collect();
            angles.sort_by(f64::total_cmp);
            for pair in angles.windows(2) {
                prop_assert!(pair[1] - pair[0] >= config.labels.min_separation_deg - 1e-6);
            }
        }
    }
}
