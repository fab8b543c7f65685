use album_resize::config::{self, Mode, Overrides, PipelineConfig};
use album_resize::naming::NamingStrategy;
use album_resize::{gallery, output, process};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

fn version_string() -> &'static str {
    let hash = env!("GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("{} ({hash})", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "resize-images")]
#[command(about = "Regenerate web derivatives for photo albums")]
#[command(long_about = "\
Regenerate web derivatives for photo albums

Every subdirectory of the content root is an album. Its originals are read
from <images_root>/<album>-source/; albums without one are skipped.

Layout (defaults):

  src/content/photos/tokyo/                  # album
  src/assets/images/tokyo-source/a.jpg       # original
  src/assets/images/tokyo/<id>-preview.jpg   # preview, width <= 610 (extended)
  public/images/tokyo/<id>.webp              # full size, height <= 900 (extended)
  src/assets/images/tokyo/<id>.jpg           # full size, height <= 900 (basic)

Each run deletes the album's previous derivatives and writes new ones.
With random naming (the default) every run produces new file names.

Run 'resize-images gen-config' to print a documented resize-images.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (default: resize-images.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory whose subdirectories are the albums
    #[arg(long, global = true)]
    content_root: Option<PathBuf>,

    /// Directory holding <album>-source/ inputs and <album>/ outputs
    #[arg(long, global = true)]
    images_root: Option<PathBuf>,

    /// Directory whose images/<album>/ receives full-size WebP output
    #[arg(long, global = true)]
    public_root: Option<PathBuf>,

    /// Output mode
    #[arg(long, value_enum, global = true)]
    mode: Option<Mode>,

    /// How derivative ids are chosen
    #[arg(long, value_enum, global = true)]
    naming: Option<NamingStrategy>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Regenerate derivatives for every album (the default)
    Run,
    /// Report albums and eligible sources without writing anything
    Check,
    /// Count the photos each album currently has in its output tree
    Count {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print a stock resize-images.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    let config_path = cli.config;
    let overrides = Overrides {
        content_root: cli.content_root,
        images_root: cli.images_root,
        public_root: cli.public_root,
        mode: cli.mode,
        naming: cli.naming,
    };
    let load = move || resolve_config(config_path, overrides);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let config = load()?;
            init_thread_pool(&config.processing);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::run(&config, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let summary = result?;
            output::print_run_summary(&summary);
            if summary.has_failures() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Check => {
            let config = load()?;
            println!("==> Checking {}", config.paths.content_root.display());
            let checks = process::check(&config)?;
            output::print_check_output(&checks);
        }
        Command::Count { json } => {
            let counts = gallery::count_albums(&load()?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
            } else {
                output::print_count_output(&counts);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load the config file and apply command-line overrides.
///
/// An explicit `--config` must exist; the default file is optional.
fn resolve_config(
    path: Option<PathBuf>,
    overrides: Overrides,
) -> Result<PipelineConfig, config::ConfigError> {
    let (path, required) = match path {
        Some(p) => (p, true),
        None => (PathBuf::from(config::DEFAULT_CONFIG_FILE), false),
    };
    let config = config::load_config(&path, required)?.with_overrides(overrides);
    log::debug!("Effective config: {:?}", config);
    Ok(config)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
