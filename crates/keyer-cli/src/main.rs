//! keyer - color-key compositing CLI
//!
//! Burns an overlay image into frames wherever the frame matches a set of HSV
//! color ranges.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use keyer_core::{ColorRange, Rect};
use keyer_ops::Filter;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "keyer")]
#[command(author, version, about = "Color-key compositing CLI")]
#[command(long_about = "
Keys frames by HSV color ranges and composites an overlay where they match.

HSV uses 8-bit components: hue 0-179 (degrees / 2), saturation and value
0-255. Ranges are inclusive and given as lower:upper, e.g. 20,100,100:40,255,255.
Several --range flags are unioned.

Examples:
  keyer key frame.png overlay.png -o out.png --range 20,100,100:40,255,255 --roi 0,0,320,640
  keyer key frame.png overlay.png -o out.png --config keyer.yaml
  keyer mask frame.png -o mask.png --range 20,100,100:40,255,255
  keyer sequence 'shot/frame.*.png' overlay.png -o keyed/frame --config keyer.yaml
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Key one frame and composite the overlay into it
    #[command(visible_alias = "k")]
    Key(KeyArgs),

    /// Write the color-range mask of a frame
    #[command(visible_alias = "m")]
    Mask(MaskArgs),

    /// Key a numbered PNG sequence
    #[command(visible_alias = "seq")]
    Sequence(SequenceArgs),
}

/// Range, region and pipeline settings shared by all commands.
#[derive(Args, Clone, Default)]
pub(crate) struct KeyingArgs {
    /// HSV range lower:upper (repeatable)
    #[arg(short, long = "range", value_name = "H,S,V:H,S,V")]
    ranges: Vec<ColorRange>,

    /// YAML config; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Region of interest x,y,width,height
    #[arg(long, value_name = "X,Y,W,H")]
    roi: Option<Rect>,

    /// Size of the space --roi was picked in (e.g. a preview); the ROI is
    /// scaled to frame pixels
    #[arg(long, value_name = "WxH", value_parser = commands::parse_size, requires = "roi")]
    roi_space: Option<(u32, u32)>,

    /// Overlay working size (defaults to the ROI size, else 320x640)
    #[arg(short, long, value_name = "WxH", value_parser = commands::parse_size)]
    working: Option<(u32, u32)>,

    /// Overlay filter: area, bilinear, nearest
    #[arg(short, long)]
    filter: Option<Filter>,
}

#[derive(Args)]
pub(crate) struct KeyArgs {
    /// Frame image
    frame: PathBuf,

    /// Overlay image
    overlay: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    keying: KeyingArgs,

    /// Write the effective settings as YAML
    #[arg(long)]
    save_config: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct MaskArgs {
    /// Frame image
    frame: PathBuf,

    /// Output mask (grayscale PNG)
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    keying: KeyingArgs,
}

#[derive(Args)]
pub(crate) struct SequenceArgs {
    /// Glob matching the input frames, e.g. 'shot/frame.*.png'
    input: String,

    /// Overlay image
    overlay: PathBuf,

    /// Output prefix; frames are written as PREFIX.0001.png, ...
    #[arg(short, long)]
    output: PathBuf,

    /// Number of the first output frame
    #[arg(long, default_value = "1")]
    start: usize,

    /// Write the previous frame again in place of a dropped one
    #[arg(long)]
    repeat_last: bool,

    #[command(flatten)]
    keying: KeyingArgs,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Key(args) => commands::key::run(args),
        Commands::Mask(args) => commands::mask::run(args),
        Commands::Sequence(args) => commands::sequence::run(args),
    }
}
