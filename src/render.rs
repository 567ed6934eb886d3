use crate::config::RenderConfig;
use crate::layout::{
    ArcLayout, GaugeLayout, MarkerLayout, NeedleLayout, Primitive, StrokePattern, TextLayout,
    TickLayout,
};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const BAND_GRADIENT_ID: &str = "gaugeBand";

pub fn render_svg(layout: &GaugeLayout, theme: &Theme) -> String {
    let mut svg = String::new();
    let width = layout.width.max(200.0);
    let height = layout.height.max(120.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    for primitive in layout.primitives() {
        match primitive {
            Primitive::Arc(arc) => svg.push_str(&arc_svg(arc)),
            Primitive::Tick(tick) => svg.push_str(&tick_svg(tick, theme)),
            Primitive::Marker(marker) => svg.push_str(&marker_svg(marker, theme)),
            Primitive::Label(text) => svg.push_str(&text_svg(text, theme, false)),
            Primitive::Needle(needle) => svg.push_str(&needle_svg(needle)),
            Primitive::Readout(readout) => svg.push_str(&text_svg(&readout.text, theme, true)),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn arc_svg(arc: &ArcLayout) -> String {
    let mut out = String::new();
    let left = arc.center.x - arc.outer_radius;
    let right = arc.center.x + arc.outer_radius;
    out.push_str(&format!(
        "<defs><linearGradient id=\"{BAND_GRADIENT_ID}\" gradientUnits=\"userSpaceOnUse\" x1=\"{left:.2}\" y1=\"0\" x2=\"{right:.2}\" y2=\"0\">"
    ));
    for stop in &arc.stops {
        out.push_str(&format!(
            "<stop offset=\"{:.0}%\" stop-color=\"{}\"/>",
            stop.offset * 100.0,
            stop.color
        ));
    }
    out.push_str("</linearGradient></defs>");
    out.push_str(&format!(
        "<path d=\"{}\" fill=\"url(#{BAND_GRADIENT_ID})\" stroke=\"none\"/>",
        arc.path
    ));
    out
}

fn tick_svg(tick: &TickLayout, theme: &Theme) -> String {
    format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"2\"/>",
        tick.inner.x, tick.inner.y, tick.outer.x, tick.outer.y, theme.tick_color
    )
}

fn marker_svg(marker: &MarkerLayout, theme: &Theme) -> String {
    let dash = match marker.stroke {
        StrokePattern::Solid => String::new(),
        StrokePattern::Dashed => format!(" stroke-dasharray=\"{}\"", theme.projected_dasharray),
    };
    let mut out = format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"2.5\"{dash}/>",
        marker.inner.x, marker.inner.y, marker.outer.x, marker.outer.y, marker.color
    );
    out.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        marker.label_anchor.x,
        marker.label_anchor.y,
        escape_xml(&theme.font_family),
        marker.font_size,
        marker.color,
        escape_xml(&marker.label)
    ));
    out
}

fn needle_svg(needle: &NeedleLayout) -> String {
    format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"3\" stroke-linecap=\"round\"/><circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"8\" fill=\"{}\"/>",
        needle.pivot.x,
        needle.pivot.y,
        needle.tip.x,
        needle.tip.y,
        needle.color,
        needle.pivot.x,
        needle.pivot.y,
        needle.color
    )
}

fn text_svg(text: &TextLayout, theme: &Theme, bold: bool) -> String {
    let weight = if bold { " font-weight=\"bold\"" } else { "" };
    format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\"{weight}>{}</text>",
        text.x,
        text.y,
        text.anchor.as_svg(),
        escape_xml(&theme.font_family),
        text.font_size,
        text.color,
        escape_xml(&text.text)
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .or_else(|| usvg::Size::from_wh(400.0, 260.0))
        .ok_or_else(|| anyhow::anyhow!("invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
