//! cartosvg: extract map layers from Inkscape SVG drawings.
//!
//! Reads one shapes layer (and optionally a background image layer that
//! registers the map canvas) and prints the client JSON export:
//!
//! - shapes projected into the map CRS, with style, titles and handlers;
//! - background image placements;
//! - or, with `--js-only`, one `id<TAB>coordinates` line per shape.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin cartosvg -- [OPTIONS] <SVG_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use cartosvg_export::{LayerExport, js_listing, to_json};
use cartosvg_io::{SvgDocument, read_to_string};
use cartosvg_pipeline::{CrsRegistration, ImageInfo, LayerDefaults, ParseConfig};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Extract map shapes from an Inkscape SVG layer.
///
/// Shapes are projected into the planar coordinate model of the map
/// client and written as JSON.
#[derive(Parser)]
#[command(name = "cartosvg", version)]
struct Cli {
    /// Path to the Inkscape SVG document.
    svg_path: PathBuf,

    /// Label prefix of the shapes layer (empty: root element).
    #[arg(long, default_value = "")]
    layer: String,

    /// Label prefix of the background image layer (empty: every image).
    #[arg(long)]
    images_layer: Option<String>,

    /// Which image of the image layer registers the canvas.
    #[arg(long, default_value_t = 0)]
    image_index: usize,

    /// Register the CRS on the selected background image.
    #[arg(long)]
    register_from_image: bool,

    /// Registration origin, horizontal.
    #[arg(long, allow_hyphen_values = true)]
    origin_x: Option<f64>,

    /// Registration origin, vertical.
    #[arg(long, allow_hyphen_values = true)]
    origin_y: Option<f64>,

    /// Canvas height used for the vertical flip.
    #[arg(long)]
    height: Option<f64>,

    /// Keep shapes with empty or zero-size geometry.
    #[arg(long)]
    allow_empty: bool,

    /// Emit ellipses instead of degrading them to circles.
    #[arg(long)]
    allow_ellipse: bool,

    /// Decimal places kept in output coordinates.
    #[arg(long, default_value_t = ParseConfig::DEFAULT_ROUND_PRECISION)]
    precision: u32,

    /// Read vendor attributes from raw markup only.
    #[arg(long)]
    no_namespaces: bool,

    /// Full parse config as a JSON string.
    ///
    /// When provided, the individual parse flags are ignored.  The JSON
    /// must be a valid `ParseConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,

    /// Layer style defaults as a JSON string, e.g.
    /// `{"empty": {"fill": true, "fillColor": "#cccccc"}}`.
    #[arg(long)]
    defaults_json: Option<String>,

    /// Print `id<TAB>coordinates` lines instead of JSON.
    #[arg(long)]
    js_only: bool,

    /// Compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,

    /// More logging on stderr (`-v` info, `-vv` debug).  `RUST_LOG`
    /// takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Build a [`ParseConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<ParseConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(ParseConfig {
        allow_empty_elements: cli.allow_empty,
        allow_ellipse: cli.allow_ellipse,
        round_precision: cli.precision,
        register_namespaces: !cli.no_namespaces,
    })
}

fn defaults_from_cli(cli: &Cli) -> Result<Option<LayerDefaults>, String> {
    cli.defaults_json
        .as_deref()
        .map(|json| {
            serde_json::from_str(json).map_err(|e| format!("Error parsing --defaults-json: {e}"))
        })
        .transpose()
}

/// Explicit registration wins, then the background image, then zero.
fn registration_from_cli(cli: &Cli, image: Option<&ImageInfo>) -> CrsRegistration {
    if let (Some(ox), Some(oy), Some(height)) = (cli.origin_x, cli.origin_y, cli.height) {
        return CrsRegistration::new(ox, oy, height);
    }
    if cli.origin_x.is_some() || cli.origin_y.is_some() || cli.height.is_some() {
        warn!("--origin-x, --origin-y and --height must be given together; ignoring them");
    }
    if cli.register_from_image {
        match image {
            Some(image) if image.is_present => return CrsRegistration::from_image(image),
            _ => warn!(
                index = cli.image_index,
                "no background image to register on; using zero registration"
            ),
        }
    }
    CrsRegistration::default()
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<String, String> {
    let config = config_from_cli(cli)?;
    let defaults = defaults_from_cli(cli)?;

    let text = read_to_string(&cli.svg_path).map_err(|e| e.to_string())?;
    let doc = SvgDocument::parse(&text).map_err(|e| format!("{}: {e}", cli.svg_path.display()))?;
    info!(path = %cli.svg_path.display(), bytes = text.len(), "loaded document");

    let images = match cli.images_layer.as_deref() {
        Some(name) => match doc.image_layer(name, &config) {
            Some(layer) => layer.image_infos(),
            None => return Err(format!("Image layer not found: {name:?}")),
        },
        None => Vec::new(),
    };
    info!(count = images.len(), "background images");

    let registration = registration_from_cli(cli, images.get(cli.image_index));
    info!(?registration, "CRS registration");

    let layer = doc
        .layer(&cli.layer, &config)
        .ok_or_else(|| format!("Layer not found: {:?}", cli.layer))?;
    let shapes = layer.shapes(registration, &config, defaults.as_ref());
    info!(layer = layer.name(), shapes = shapes.len(), "parsed layer");

    let export = LayerExport::new(layer.name(), &shapes, &images);
    if cli.js_only {
        return Ok(js_listing(&export));
    }
    to_json(&export, !cli.compact)
        .map(|json| json + "\n")
        .map_err(|e| format!("Error serializing export: {e}"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = match run(&cli) {
        Ok(output) => output,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    match cli.output {
        Some(ref path) => {
            if let Err(e) = std::fs::write(path, &output) {
                eprintln!("Error writing {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
            info!(path = %path.display(), bytes = output.len(), "output written");
        }
        None => print!("{output}"),
    }

    ExitCode::SUCCESS
}
