#![deny(unsafe_code)]
//! CLI host for the morph particle transition engine.
//!
//! Subcommands:
//! - `render`: build a morph, jump to one timestamp, write a PNG
//! - `frames`: drive the tick loop offline and write a PNG sequence
//! - `play`: drive the tick loop in real time, printing status each frame
//! - `inspect`: print load/sample diagnostics and the parameter schema
//! - `list`: print the selection and pairing modes

mod error;

use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use morph_core::{Clock, Engine, ManualClock, PixelSource, RgbaBuffer, Seed, SystemClock};
use morph_render::{snapshot, Previews, DEFAULT_BACKGROUND};
use morph_transition::{Morph, PairingMode, Phase, SelectionMode};
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "morph", about = "Image-to-image particle transitions")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Where the two point sets come from and how they are processed.
#[derive(Args)]
struct SceneArgs {
    /// Start reference image. A spiral is used when absent or unreadable.
    #[arg(long)]
    start: Option<PathBuf>,

    /// End reference image. A heart is used when absent or unreadable.
    #[arg(long)]
    end: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(short = 'W', long, default_value_t = 800)]
    width: usize,

    /// Canvas height in pixels.
    #[arg(short = 'H', long, default_value_t = 600)]
    height: usize,

    /// PRNG seed for particle sizes and fallback shapes.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Transition parameters as a JSON object (see `inspect` for the schema).
    #[arg(long, default_value = "{}")]
    params: String,

    /// Load a saved seed JSON instead of the flags above.
    #[arg(long, conflicts_with_all = ["start", "end", "params"])]
    seed_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Render the frame at one point in the transition.
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Milliseconds after the start; defaults to the full duration.
        #[arg(long)]
        at_ms: Option<f64>,

        /// Background grey level.
        #[arg(long, default_value_t = DEFAULT_BACKGROUND)]
        background: u8,

        /// Overlay thumbnails of the reference images.
        #[arg(long)]
        previews: bool,

        /// Output file path.
        #[arg(short, long, default_value = "morph.png")]
        output: PathBuf,
    },
    /// Render evenly spaced frames covering the whole transition.
    Frames {
        #[command(flatten)]
        scene: SceneArgs,

        /// Number of frames, including the first and last.
        #[arg(short, long, default_value_t = 60)]
        count: usize,

        /// Background grey level.
        #[arg(long, default_value_t = DEFAULT_BACKGROUND)]
        background: u8,

        /// Overlay thumbnails of the reference images.
        #[arg(long)]
        previews: bool,

        /// Output directory.
        #[arg(short, long, default_value = "frames")]
        dir: PathBuf,
    },
    /// Play the transition in real time and print progress.
    Play {
        #[command(flatten)]
        scene: SceneArgs,

        /// Ticks per second.
        #[arg(long, default_value_t = 60)]
        fps: u32,

        /// Also write the final frame here.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overlay thumbnails of the reference images on the final frame.
        #[arg(long)]
        previews: bool,
    },
    /// Print diagnostics and the parameter schema without rendering.
    Inspect {
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// List selection and pairing modes.
    List,
}

/// Loads an image, degrading to `None` (and the fallback shape) on failure.
fn load_optional(path: Option<&Path>) -> Option<RgbaBuffer> {
    let path = path?;
    match snapshot::load_image(path) {
        Ok(img) => Some(img),
        Err(e) => {
            let path = path.display();
            warn!("could not load {path}: {e}; using fallback shape");
            None
        }
    }
}

/// A built morph plus whatever reference images actually loaded.
#[derive(Debug)]
struct Scene {
    seed: Seed,
    morph: Morph,
    start: Option<RgbaBuffer>,
    end: Option<RgbaBuffer>,
}

impl Scene {
    /// Writes the current particles, with thumbnails when `previews` is set.
    fn write_frame(&self, background: u8, previews: bool, path: &Path) -> Result<(), CliError> {
        let previews = previews.then(|| Previews {
            start: self.start.as_ref().map(|img| img as &dyn PixelSource),
            end: self.end.as_ref().map(|img| img as &dyn PixelSource),
        });
        snapshot::write_frame(
            self.morph.particles(),
            self.seed.width,
            self.seed.height,
            background,
            previews,
            path,
        )?;
        Ok(())
    }
}

fn build_scene(args: &SceneArgs) -> Result<Scene, CliError> {
    let seed = match &args.seed_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
            serde_json::from_str::<Seed>(&text)
                .map_err(|e| CliError::Input(format!("invalid seed file: {e}")))?
        }
        None => {
            let mut seed = Seed::new(args.width, args.height, args.seed)
                .with_images(args.start.clone(), args.end.clone());
            seed.params = serde_json::from_str(&args.params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            seed
        }
    };

    let start = load_optional(seed.start_image.as_deref());
    let end = load_optional(seed.end_image.as_deref());
    let morph = Morph::from_seed(
        &seed,
        start.as_ref().map(|img| img as &dyn PixelSource),
        end.as_ref().map(|img| img as &dyn PixelSource),
    )?;
    Ok(Scene {
        seed,
        morph,
        start,
        end,
    })
}

fn report(json: bool, scene: &Scene, extra: serde_json::Value) -> Result<(), CliError> {
    if json {
        let info = serde_json::json!({
            "seed": scene.seed,
            "diagnostics": scene.morph.diagnostics(),
            "result": extra,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!("{}", scene.morph.diagnostics());
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let selection = SelectionMode::names();
            let pairing = PairingMode::names();
            if cli.json {
                let info = serde_json::json!({
                    "selection_modes": selection,
                    "pairing_modes": pairing,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Selection modes:");
                println!("  {}", selection.join(", "));
                println!("Pairing modes:");
                println!("  {}", pairing.join(", "));
            }
        }
        Command::Inspect { scene } => {
            let scene = build_scene(&scene)?;
            let morph = &scene.morph;
            if cli.json {
                let info = serde_json::json!({
                    "params": morph.params(),
                    "schema": morph.param_schema(),
                });
                report(true, &scene, info)?;
            } else {
                println!("{}", morph.diagnostics());
                println!("params: {}", morph.params());
            }
        }
        Command::Render {
            scene,
            at_ms,
            background,
            previews,
            output,
        } => {
            let mut scene = build_scene(&scene)?;
            let at_ms = at_ms.unwrap_or(scene.morph.config().duration_ms);
            if !at_ms.is_finite() {
                return Err(CliError::Input(format!("--at-ms must be finite, got {at_ms}")));
            }
            scene.morph.start(0.0);
            scene.morph.tick(at_ms);
            scene.write_frame(background, previews, &output)?;
            info!(at_ms, output = %output.display(), "rendered frame");
            let extra = serde_json::json!({
                "at_ms": at_ms,
                "output": output.display().to_string(),
            });
            report(cli.json, &scene, extra)?;
            if !cli.json {
                eprintln!("-> {}", output.display());
            }
        }
        Command::Frames {
            scene,
            count,
            background,
            previews,
            dir,
        } => {
            if count == 0 {
                return Err(CliError::Input("--count must be greater than zero".into()));
            }
            let mut scene = build_scene(&scene)?;
            std::fs::create_dir_all(&dir)
                .map_err(|e| CliError::Io(format!("{}: {e}", dir.display())))?;

            let duration = scene.morph.config().duration_ms;
            let clock = ManualClock::new(0.0);
            scene.morph.start(clock.now_ms());
            for i in 0..count {
                let t = if count == 1 {
                    duration
                } else {
                    duration * i as f64 / (count - 1) as f64
                };
                clock.set(t);
                scene.morph.tick(clock.now_ms());
                let path = dir.join(format!("frame_{i:04}.png"));
                scene.write_frame(background, previews, &path)?;
            }
            info!(count, dir = %dir.display(), "rendered frames");
            let extra = serde_json::json!({
                "frames": count,
                "dir": dir.display().to_string(),
            });
            report(cli.json, &scene, extra)?;
        }
        Command::Play {
            scene,
            fps,
            output,
            previews,
        } => {
            if fps == 0 {
                return Err(CliError::Input("--fps must be greater than zero".into()));
            }
            let mut scene = build_scene(&scene)?;
            let frame = Duration::from_secs_f64(1.0 / f64::from(fps));
            let clock = SystemClock::new();

            scene.morph.start(clock.now_ms());
            let mut ticks = 0usize;
            while scene.morph.phase() != Phase::Complete {
                thread::sleep(frame);
                scene.morph.tick(clock.now_ms());
                ticks += 1;
                if !cli.json {
                    let d = scene.morph.diagnostics();
                    eprint!("\rprogress: {:5.1}% ({})", d.progress * 100.0, d.phase);
                }
            }
            if !cli.json {
                eprintln!();
            }
            if let Some(path) = &output {
                scene.write_frame(DEFAULT_BACKGROUND, previews, path)?;
            }
            let extra = serde_json::json!({
                "ticks": ticks,
                "output": output.map(|p| p.display().to_string()),
            });
            report(cli.json, &scene, extra)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
