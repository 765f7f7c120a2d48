mod renderer;

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use flamesight_core::controller::ControllerOptions;
use flamesight_core::parsers::parse_tree;
use flamesight_core::svg::SvgSurface;
use flamesight_core::{FlameConfig, FlameController, FlameTree};
use flamesight_protocol::Viewport;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Browse a flame graph in the terminal, or export it as SVG.
#[derive(Debug, Parser)]
#[command(name = "flamesight", version)]
struct Args {
    /// Flame graph levels document (JSON).
    path: PathBuf,

    /// Write an SVG snapshot to this file instead of opening the viewer.
    #[arg(long, value_name = "FILE")]
    svg: Option<PathBuf>,

    /// Highlight frames whose title matches this regular expression.
    #[arg(long, value_name = "PATTERN")]
    search: Option<String>,

    /// Start bottom-up, with the root on the last row.
    #[arg(long)]
    reverse: bool,

    /// SVG canvas width in logical pixels.
    #[arg(long, value_name = "N", default_value_t = 1200.0)]
    width: f64,

    /// JSON file overriding layout and tooltip settings.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Append diagnostics to this file (filtered by RUST_LOG).
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log {
        init_logging(path)?;
    }

    let data = fs::read(&args.path).with_context(|| format!("reading {}", args.path.display()))?;
    let tree = parse_tree(&data).with_context(|| format!("loading {}", args.path.display()))?;
    let config = match &args.config {
        Some(path) => {
            let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            FlameConfig::from_json(&raw).with_context(|| format!("parsing {}", path.display()))?
        }
        None => FlameConfig::default(),
    };
    info!(
        levels = tree.level_count(),
        total = tree.total(),
        "loaded flame graph"
    );

    match &args.svg {
        Some(out) => export_svg(tree, config, &args, out),
        None => renderer::run(tree, config, !args.reverse, args.search.as_deref()),
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    // The terminal belongs to the viewer, so logs only ever go to the file.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(())
}

fn export_svg(tree: FlameTree, config: FlameConfig, args: &Args, out: &Path) -> Result<()> {
    let viewport = Viewport::new(args.width, tree.preferred_height(&config));
    let options = ControllerOptions {
        config,
        reversed: !args.reverse,
        ..ControllerOptions::default()
    };
    let mut controller = FlameController::with_options(tree, SvgSurface::default(), viewport, options);

    if let Some(pattern) = &args.search {
        let coverage = controller.search(pattern)?;
        eprintln!("{pattern}: {coverage}% of samples");
    }

    fs::write(out, controller.surface().document())
        .with_context(|| format!("writing {}", out.display()))?;
    info!(path = %out.display(), "wrote svg");
    Ok(())
}
