use avnac::config::{self, EditorConfig};
use avnac::events;
use avnac::export::DownloadSink;
use avnac::imaging::{Adjustment, AdjustmentSet, Axis, FilterPipeline, RustBackend};
use avnac::output;
use avnac::session::Session;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Slider flags shared by `edit` and `pipeline`.
#[derive(clap::Args, Clone, Default)]
struct SliderArgs {
    /// Brightness, -100..100
    #[arg(long, allow_negative_numbers = true)]
    brightness: Option<f64>,
    /// Contrast, -100..100
    #[arg(long, allow_negative_numbers = true)]
    contrast: Option<f64>,
    /// Saturation, -100..100
    #[arg(long, allow_negative_numbers = true)]
    saturation: Option<f64>,
    /// Hue rotation in degrees, -180..180
    #[arg(long, allow_negative_numbers = true)]
    hue: Option<f64>,
    /// Blur radius in pixels, 0..20
    #[arg(long, allow_negative_numbers = true)]
    blur: Option<f64>,
    /// Warm (sepia) amount, 0..100
    #[arg(long, allow_negative_numbers = true)]
    warm: Option<f64>,
    /// Cool (invert) amount, 0..100
    #[arg(long, allow_negative_numbers = true)]
    cool: Option<f64>,
}

impl SliderArgs {
    /// Flags that were given, in slider order.
    fn given(&self) -> Vec<(Adjustment, f64)> {
        [
            (Adjustment::Brightness, self.brightness),
            (Adjustment::Contrast, self.contrast),
            (Adjustment::Saturation, self.saturation),
            (Adjustment::Hue, self.hue),
            (Adjustment::Blur, self.blur),
            (Adjustment::Warm, self.warm),
            (Adjustment::Cool, self.cool),
        ]
        .into_iter()
        .filter_map(|(kind, value)| value.map(|v| (kind, v)))
        .collect()
    }

    fn adjustments(&self) -> AdjustmentSet {
        let mut set = AdjustmentSet::default();
        for (kind, value) in self.given() {
            set.set(kind, value);
        }
        set
    }
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "avnac")]
#[command(about = "Adjust a photo and export it as PNG")]
#[command(long_about = "\
Adjust a photo and export it as PNG

Load one image, set any of the seven sliders, optionally resize, and export.
Filters always apply in this order:

  brightness → contrast → saturation → hue → warm (sepia) → cool (invert) → blur

Slider ranges (out-of-range values are clamped):
  brightness, contrast, saturation   -100..100   (0 = unchanged)
  hue                                -180..180   degrees
  blur                               0..20       pixels
  warm, cool                         0..100

Width and height accept any text; anything that is not a number of at
least 1 becomes 1.

Run 'avnac gen-config' to generate a documented avnac.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file, which must exist (default: ./avnac.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load an image, apply sliders and size, export PNG
    Edit {
        /// Image to edit
        input: PathBuf,
        #[command(flatten)]
        sliders: SliderArgs,
        /// Output width in pixels
        #[arg(long, allow_hyphen_values = true)]
        width: Option<String>,
        /// Output height in pixels
        #[arg(long, allow_hyphen_values = true)]
        height: Option<String>,
        /// Write the PNG to this exact path
        #[arg(short, long, conflicts_with = "out_dir")]
        output: Option<PathBuf>,
        /// Write the PNG into this directory under the configured file name
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Replay an event script against an image
    Run {
        /// Image to load before the script runs
        input: PathBuf,
        /// Script file: one event per line
        script: PathBuf,
        /// Directory for `export` events
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Print the filter pipeline for the given sliders
    Pipeline {
        #[command(flatten)]
        sliders: SliderArgs,
        /// Print as JSON instead of a descriptor string
        #[arg(long)]
        json: bool,
    },
    /// Print a stock avnac.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let cli = Cli::parse();

    match cli.command {
        Command::Edit {
            input,
            sliders,
            width,
            height,
            output: output_path,
            out_dir,
        } => {
            let config = load_editor_config(cli.config.as_deref())?;
            init_thread_pool(&config.processing);
            let mut session = new_session(config);

            // Sliders first: without an image they only store, so the load
            // below renders once with everything set.
            for (kind, value) in sliders.given() {
                session.set_adjustment(kind, value);
            }
            load_input(&mut session, &input)?;

            if width.is_some() || height.is_some() {
                if let Some(raw) = width {
                    session.set_output_size(Axis::Width, &raw);
                }
                if let Some(raw) = height {
                    session.set_output_size(Axis::Height, &raw);
                }
                session.apply_resize();
            }

            output::print_session_summary(&session);

            let mut sink = match output_path {
                Some(path) => DownloadSink::File(path),
                None => DownloadSink::Directory(out_dir),
            };
            let outcome = session.export(&mut sink)?;
            println!("{}", output::format_export_outcome(&outcome));
        }
        Command::Run {
            input,
            script,
            out_dir,
        } => {
            let text = std::fs::read_to_string(&script)?;
            let events = events::parse_script(&text)?;

            let config = load_editor_config(cli.config.as_deref())?;
            init_thread_pool(&config.processing);
            let mut session = new_session(config);
            load_input(&mut session, &input)?;

            let mut sink = DownloadSink::Directory(out_dir);
            for (i, event) in events.into_iter().enumerate() {
                let shown = event.clone();
                let outcome = session.dispatch(event, &mut sink)?;
                output::print_event_step(i + 1, &shown, &outcome);
            }

            println!();
            output::print_session_summary(&session);
        }
        Command::Pipeline { sliders, json } => {
            let pipeline = FilterPipeline::from_adjustments(&sliders.adjustments());
            if json {
                println!("{}", serde_json::to_string_pretty(&pipeline)?);
            } else {
                println!("{}", pipeline);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize `env_logger`: `warn` unless `RUST_LOG` says otherwise.
fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "[{style}{}{style:#} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

/// An explicit `--config` must exist; otherwise `avnac.toml` in the working
/// directory is used when present.
fn load_editor_config(path: Option<&Path>) -> Result<EditorConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}

fn new_session(config: EditorConfig) -> Session<RustBackend> {
    let backend = RustBackend::with_resample(config.render.resample);
    Session::new(backend, config)
}

fn load_input(
    session: &mut Session<RustBackend>,
    input: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(input)?;
    if session.load_image(&bytes).is_none() {
        return Err(format!("{}: not a decodable image", input.display()).into());
    }
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores, so users can constrain down but not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
