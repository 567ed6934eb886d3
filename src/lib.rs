pub mod config;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod quantize;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use cli::run;

pub use config::{Config, GaugeConfig, load_config};
pub use drag::{DragState, GaugeState, PointerDragController, PointerEvent};
pub use error::GaugeError;
pub use geometry::{AngleMapper, GaugeGeometry, Point, Rect};
pub use ir::{Category, Dataset, HistoricalPoint};
pub use layout::{GaugeLayout, Primitive, compute_layout};
pub use parser::{load_dataset, parse_dataset, parse_dataset_auto, parse_dataset_auto_with};
pub use quantize::ValueQuantizer;
pub use render::render_svg;
pub use theme::{ColorPolicy, Theme};

/// Everything needed to turn a dataset into an SVG in one call.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub gauge: GaugeConfig,
    pub value: f64,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self {
            theme: Theme::classic(),
            gauge: GaugeConfig::default(),
            value: 0.0,
        }
    }

    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            ..Self::classic()
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::classic()
    }
}

/// Parse `dataset` (text or JSON; empty means the built-in sample), place the
/// needle at `options.value` and render SVG.
pub fn render_with_options(dataset: &str, options: RenderOptions) -> anyhow::Result<String> {
    options.gauge.validate()?;
    let dataset = if dataset.trim().is_empty() {
        Dataset::sample()
    } else {
        parse_dataset_auto_with(dataset, &options.gauge.parties)?
    };
    let mut state = GaugeState::default();
    let quantizer = ValueQuantizer::new(options.gauge.bound, options.gauge.quantization_step);
    state.set_value(options.value, &quantizer)?;
    let layout = compute_layout(&dataset, &state, &options.gauge, &options.theme);
    Ok(render_svg(&layout, &options.theme))
}
