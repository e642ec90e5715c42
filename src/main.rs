//! Binary entrypoint for flip-image.
//!
//! Plans a FLIP entry animation for an image file against an in-memory
//! surface and prints what would be applied to the page.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use flip_image::aspect::AspectRatio;
use flip_image::config::FlipOptions;
use flip_image::correction;
use flip_image::geometry::{BoundingBox, CorrectionResult, NaturalSize, Rotation, SizingMode};
use flip_image::meta;
use flip_image::surface::{RecordingSurface, StyleOp};
use flip_image::tasks::flip::{FlipController, PlayOutcome};
use flip_image::tasks::loader::FileLoader;

#[derive(Debug, Parser)]
#[command(name = "flip-image", version, about = "FLIP image entry animation planner")]
struct Cli {
    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a full play against a recording surface and print the style operations
    Plan {
        /// Image file to animate
        image: PathBuf,
        /// Starting box as TOP,LEFT,WIDTH,HEIGHT
        #[arg(long, value_parser = parse_box)]
        first: BoundingBox,
        /// Final box as TOP,LEFT,WIDTH,HEIGHT
        #[arg(long, value_parser = parse_box)]
        last: BoundingBox,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Print only the correction for known natural dimensions
    Correct {
        /// Natural size as WIDTHxHEIGHT
        #[arg(long, value_parser = parse_natural)]
        natural: NaturalSize,
        /// Starting box as TOP,LEFT,WIDTH,HEIGHT
        #[arg(long, value_parser = parse_box)]
        first: BoundingBox,
        /// Final box as TOP,LEFT,WIDTH,HEIGHT
        #[arg(long, value_parser = parse_box)]
        last: BoundingBox,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Print the frame height for a width under an aspect setting
    Frame {
        /// fill, auto, classic, landscape, portrait, square, `W / H`, a number or a percentage
        #[arg(long, default_value = "fill")]
        aspect: AspectRatio,
        /// Frame width in pixels
        #[arg(long)]
        width: f64,
        /// Natural size as WIDTHxHEIGHT, used by `auto`
        #[arg(long, value_parser = parse_natural)]
        natural: Option<NaturalSize>,
    },
}

#[derive(Debug, clap::Args)]
struct Overrides {
    /// Sizing mode (cover or contain)
    #[arg(long, value_parser = parse_sizing)]
    sizing: Option<SizingMode>,
    /// EXIF orientation code; read from the file when omitted
    #[arg(long)]
    orientation: Option<u16>,
}

impl Overrides {
    fn apply(&self, opts: &mut FlipOptions) {
        if let Some(sizing) = self.sizing {
            opts.sizing = sizing;
        }
        if self.orientation.is_some() {
            opts.orientation = self.orientation;
        }
    }
}

#[derive(Debug, Serialize)]
struct Plan {
    natural: NaturalSize,
    rotation: i32,
    correction: Option<CorrectionResult>,
    outcome: PlayOutcome,
    ops: Vec<StyleOp>,
}

fn parse_box(s: &str) -> Result<BoundingBox, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [top, left, width, height] => Ok(BoundingBox::new(*top, *left, *width, *height)),
        _ => Err(format!("expected TOP,LEFT,WIDTH,HEIGHT, got {s:?}")),
    }
}

fn parse_natural(s: &str) -> Result<NaturalSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w = w.trim().parse().map_err(|e| format!("width: {e}"))?;
    let h = h.trim().parse().map_err(|e| format!("height: {e}"))?;
    Ok(NaturalSize::new(w, h))
}

fn parse_sizing(s: &str) -> Result<SizingMode, String> {
    match s {
        "cover" => Ok(SizingMode::Cover),
        "contain" => Ok(SizingMode::Contain),
        other => Err(format!("unknown sizing {other:?} (cover or contain)")),
    }
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(format!("flip_image={level}").parse()?);
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_options(path: Option<&PathBuf>) -> Result<FlipOptions> {
    match path {
        Some(p) => FlipOptions::from_yaml_file(p)
            .with_context(|| format!("loading config from {}", p.display())),
        None => Ok(FlipOptions::default()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    let mut opts = load_options(cli.config.as_ref())?;

    match cli.command {
        Command::Plan {
            image,
            first,
            last,
            overrides,
        } => {
            overrides.apply(&mut opts);
            let image_meta = meta::read_image_meta(&image, opts.orientation.is_none())
                .with_context(|| format!("reading {}", image.display()))?;
            if opts.orientation.is_none() {
                opts.orientation = image_meta.exif_orientation.filter(|o| (1..=8).contains(o));
            }
            let Some(src) = image.to_str() else {
                bail!("image path {} is not valid UTF-8", image.display());
            };

            let surface = RecordingSurface::new(last);
            let mut flip = FlipController::new(surface, FileLoader::new(), opts)
                .context("validating configuration")?;
            flip.set_src(src);
            flip.set_measurements(first);
            let outcome = flip.play().await.context("playing flip")?;

            info!(?outcome, "flip planned");
            let plan = Plan {
                natural: image_meta.natural,
                rotation: flip.options().rotation().degrees(),
                correction: flip.correction(),
                outcome,
                ops: flip.surface().ops(),
            };
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Command::Correct {
            natural,
            first,
            last,
            overrides,
        } => {
            overrides.apply(&mut opts);
            let rotation = Rotation::from_orientation(opts.orientation);
            let result = correction::correct_checked(
                &first.offset_from(&last),
                &last,
                &natural,
                rotation,
                opts.sizing,
            )?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Frame {
            aspect,
            width,
            natural,
        } => match aspect.height_for(width, natural) {
            Some(height) => println!("{height}"),
            None => bail!("aspect {aspect} has no intrinsic height at this point"),
        },
    }
    Ok(())
}
