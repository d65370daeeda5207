use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mibae::assets::{AssetLoader, ConfigSource};
use mibae::models::{AppConfig, FilterOverrides};
use mibae::rendering::{flatten, read_png, write_png};
use mibae::services::{FilterService, RunReport};

#[derive(Parser)]
#[command(name = "mibae")]
#[command(about = "Mibae - halftone tone-pattern filter for PNG images")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a PNG image
    Filter {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Config file (defaults to MIBAE_CONFIG, then the embedded config)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Display pixels per working cell
        #[arg(short, long)]
        zoom: Option<usize>,

        /// Output width budget in pixels
        #[arg(long)]
        max_width: Option<usize>,

        /// Output height budget in pixels
        #[arg(long)]
        max_height: Option<usize>,

        /// Color distance: "perceptual" or "euclidean"
        #[arg(short, long)]
        metric: Option<String>,

        /// Diffusion kernel: floyd-steinberg, atkinson, sierra-lite or none
        #[arg(short, long)]
        dither: Option<String>,

        /// Diffusion intensity (0.0 - 1.0)
        #[arg(long)]
        intensity: Option<f32>,

        /// Color partially transparent input is flattened onto (e.g. "#ffffff")
        #[arg(long)]
        background: Option<String>,

        /// Re-compress the output with oxipng
        #[arg(long)]
        optimize: bool,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Print the enabled tones
    Tones {
        /// Config file (defaults to MIBAE_CONFIG, then the embedded config)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Write the embedded default config to disk for customization
    Init {
        /// Destination path
        #[arg(short, long, default_value = "mibae.yaml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mibae=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Some(Commands::Filter {
            input,
            output,
            config,
            zoom,
            max_width,
            max_height,
            metric,
            dither,
            intensity,
            background,
            optimize,
            report,
        }) => {
            let overrides = FilterOverrides {
                metric,
                dither,
                intensity,
                zoom,
                background,
                max_width,
                max_height,
            };
            run_filter_command(
                &input,
                &output,
                config,
                &overrides,
                optimize,
                report.as_deref(),
            )
            .await
        }
        Some(Commands::Tones { config }) => run_tones_command(config),
        Some(Commands::Init {
            output,
            force,
            list,
        }) => run_init_command(&output, force, list),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// `--config` wins over MIBAE_CONFIG.
fn config_loader(config: Option<PathBuf>) -> AssetLoader {
    let path = config.or_else(|| std::env::var("MIBAE_CONFIG").ok().map(PathBuf::from));
    AssetLoader::new(path)
}

/// Filter one PNG file
async fn run_filter_command(
    input: &Path,
    output: &Path,
    config: Option<PathBuf>,
    overrides: &FilterOverrides,
    optimize: bool,
    report: Option<&Path>,
) -> anyhow::Result<()> {
    let mut app_config =
        AppConfig::load_from_assets(&config_loader(config)).context("Failed to load config")?;
    app_config.apply_overrides(overrides);
    let filter = app_config.build_filter().context("Invalid filter settings")?;
    let background = app_config.background_color()?;

    let source = read_png(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let source = flatten(&source, background);

    // Ctrl-C stops the run after the current row; the partial image is still written.
    let (cancel, flag) = FilterService::cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current row");
            let _ = cancel.send(true);
        }
    });

    let service = FilterService::new(filter);
    let image = service.run(&source, &flag).await?;

    let size = write_png(output, image.buffer(), optimize)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    if image.is_complete() {
        println!(
            "Filtered {} -> {} ({}x{}, {size} bytes)",
            input.display(),
            output.display(),
            image.width(),
            image.height()
        );
    } else {
        println!(
            "Stopped after {} of {} rows; partial image written to {}",
            image.rows_completed(),
            image.layout().working().1,
            output.display()
        );
    }

    if let Some(path) = report {
        RunReport::new(service.filter(), &image)
            .write(path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

/// Print the enabled tone bitmaps in search order
fn run_tones_command(config: Option<PathBuf>) -> anyhow::Result<()> {
    let app_config =
        AppConfig::load_from_assets(&config_loader(config)).context("Failed to load config")?;
    let filter = app_config.build_filter().context("Invalid filter settings")?;
    let library = filter.library();

    for &id in filter.enabled_tones() {
        let tone = library.get(id)?;
        println!("{} ({:.0}% ink)", tone.name(), tone.coverage() * 100.0);
        for row in tone.to_rows() {
            println!("  {row}");
        }
    }
    Ok(())
}

/// Write the embedded config to disk
fn run_init_command(output: &Path, force: bool, list: bool) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        for f in AssetLoader::list_embedded() {
            println!("  {f}");
        }
        return Ok(());
    }

    let report = AssetLoader::init(output, force)?;
    for f in &report.written {
        println!("  + {f}");
    }
    for f in &report.skipped {
        println!("  - {f} exists (use --force to overwrite)");
    }
    Ok(())
}

/// Display status and usage hints
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("Mibae v{VERSION} - halftone tone-pattern filter\n");

    let env_config = std::env::var("MIBAE_CONFIG").ok();
    println!("Environment Variables:");
    println!(
        "  MIBAE_CONFIG = {}",
        env_config.as_deref().unwrap_or("(not set)")
    );

    let source = match config_loader(None).config_source() {
        ConfigSource::File(path) => path.display().to_string(),
        ConfigSource::Embedded if env_config.is_some() => "embedded (file not found)".to_string(),
        ConfigSource::Embedded => "embedded".to_string(),
    };
    println!("\nConfig: {source}");

    println!("\nCommands:");
    println!("  mibae filter   Filter a PNG image");
    println!("  mibae tones    Print the enabled tones");
    println!("  mibae init     Write the default config to disk");
    println!("\nRun 'mibae --help' for more details.");
}
