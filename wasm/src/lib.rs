use serde::Deserialize;
use swing_gauge::{RenderOptions, render_with_options};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GaugeRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    value: Option<f64>,
    bound: Option<f64>,
    quantization_step: Option<f64>,
    fast_text: Option<bool>,
}

fn build_render_options(options: GaugeRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::classic()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    if let Some(bound) = options.bound {
        render_options.gauge.bound = bound;
    }
    if let Some(step) = options.quantization_step {
        render_options.gauge.quantization_step = step;
    }
    if let Some(fast_text) = options.fast_text {
        render_options.gauge.labels.fast_text = fast_text;
    }
    if let Some(value) = options.value {
        render_options = render_options.with_value(value);
    }

    render_options
}

/// Render the gauge for `dataset` (text lines or a JSON array; empty for the
/// built-in results).
#[wasm_bindgen]
pub fn render_gauge_svg(dataset: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<GaugeRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        GaugeRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(dataset, render_options)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
