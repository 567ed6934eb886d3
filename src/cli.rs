use crate::config::{Config, PartyNames, load_config};
use crate::drag::{GaugeState, PointerDragController, PointerEvent};
use crate::geometry::Point;
use crate::ir::{Category, Dataset};
use crate::layout::compute_layout;
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::parser::{load_dataset, parse_dataset_auto_with};
use crate::quantize::ValueQuantizer;
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::theme::Theme;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "swingr", version, about = "Election swing gauge renderer")]
pub struct Args {
    /// Dataset file (text or JSON), '-' for stdin. Defaults to the built-in results.
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG and JSON.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config file (.json or .json5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Theme name, overrides the config file
    #[arg(short = 't', long = "theme")]
    pub theme: Option<String>,

    /// Needle value
    #[arg(short = 'v', long = "value", allow_hyphen_values = true)]
    pub value: Option<f64>,

    /// Put the needle on a historical result: YEAR or YEAR:CATEGORY
    #[arg(short = 's', long = "select")]
    pub select: Option<String>,

    /// Drag through pointer positions "X,Y" in dial coordinates; repeat for a path
    #[arg(short = 'p', long = "pointer")]
    pub pointer: Vec<String>,

    /// PNG width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// PNG height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(name) = args.theme.as_deref() {
        config.theme =
            Theme::by_name(name).ok_or_else(|| anyhow::anyhow!("unknown theme {name:?}"))?;
        config.render.background = config.theme.background.clone();
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let dataset = read_dataset(args.input.as_deref(), &config.gauge.parties)?;
    for issue in dataset.validate(config.gauge.bound) {
        log::warn!("{issue}");
    }

    let state = drive_state(&args, &config, &dataset)?;
    let layout = compute_layout(&dataset, &state, &config.gauge, &config.theme);

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &config.theme);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&layout, &config.theme);
            write_output_png(&svg, &output, &config.render)?;
        }
        OutputFormat::Json => {
            let dump = LayoutDump::from_layout(&layout, &state, &config.gauge);
            match args.output.as_deref() {
                Some(path) => write_layout_dump(path, &dump)?,
                None => println!("{}", dump.to_json()?),
            }
        }
    }
    Ok(())
}

fn read_dataset(path: Option<&Path>, parties: &PartyNames) -> Result<Dataset> {
    if let Some(path) = path
        && path == Path::new("-")
    {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return parse_dataset_auto_with(&buf, parties);
    }
    load_dataset(path, parties)
}

/// Apply value, selection and pointer path in that order, the same way a
/// host would deliver them.
fn drive_state(args: &Args, config: &Config, dataset: &Dataset) -> Result<GaugeState> {
    let gauge = &config.gauge;
    let quantizer = ValueQuantizer::new(gauge.bound, gauge.quantization_step);
    let mut state = GaugeState::default();

    if let Some(value) = args.value {
        state.set_value(value, &quantizer)?;
    }

    if let Some(spec) = args.select.as_deref() {
        let (year, category) = parse_selection(spec)?;
        let point = dataset
            .find(year, category)
            .ok_or_else(|| anyhow::anyhow!("no historical result for {spec}"))?;
        state.select_point(point, &quantizer)?;
    }

    if !args.pointer.is_empty() {
        let controller =
            PointerDragController::new(gauge.bound, quantizer, gauge.pointer_center_ratio);
        let surface = gauge.geometry.input_surface(gauge.pointer_center_ratio);
        for (idx, raw) in args.pointer.iter().enumerate() {
            let position = parse_point(raw)?;
            let event = if idx == 0 {
                PointerEvent::Down { position, surface }
            } else {
                PointerEvent::Move { position, surface }
            };
            // A bad sample is dropped; the drag keeps its last good value.
            if let Err(err) = controller.handle(&mut state, &event) {
                log::warn!("pointer {raw:?} ignored: {err}");
            }
        }
        controller.handle(&mut state, &PointerEvent::Up)?;
    }

    Ok(state)
}

fn parse_selection(spec: &str) -> Result<(i32, Option<Category>)> {
    let (year, category) = match spec.split_once(':') {
        Some((year, category)) => {
            let category = Category::from_token(category)
                .ok_or_else(|| anyhow::anyhow!("unknown category {category:?}"))?;
            (year, Some(category))
        }
        None => (spec, None),
    };
    Ok((year.trim().parse()?, category))
}

fn parse_point(raw: &str) -> Result<Point> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| anyhow::anyhow!("pointer must be X,Y, got {raw:?}"))?;
    Ok(Point::new(x.trim().parse()?, y.trim().parse()?))
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
