use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use deckwright::{DeckEngine, EngineConfig, LayoutPreference, SlideDescriptor};

#[derive(Parser, Debug)]
#[command(name = "deckwright", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a .pptx deck from a slide-descriptor JSON file.
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Input descriptor JSON (an array of slide descriptors).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Optional .pptx template whose look the deck inherits.
    #[arg(long)]
    template: Option<PathBuf>,

    /// Deck-wide layout preference.
    #[arg(long, value_enum, default_value = "auto")]
    layout: LayoutPreference,

    /// Output directory for the generated deck.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Seed for file naming and placeholder palettes.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Provider search timeout in seconds.
    #[arg(long, default_value_t = 10)]
    request_timeout: u64,

    /// Image download timeout in seconds.
    #[arg(long, default_value_t = 30)]
    download_timeout: u64,

    /// Slide converter timeout in seconds.
    #[arg(long, default_value_t = 60)]
    raster_timeout: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read descriptors '{}'", args.in_path.display()))?;
    let descriptors: Vec<SlideDescriptor> = serde_json::from_str(&raw)
        .with_context(|| format!("parse descriptors '{}'", args.in_path.display()))?;

    let config = EngineConfig {
        unsplash_key: std::env::var("UNSPLASH_API_KEY").ok(),
        pexels_key: std::env::var("PEXELS_API_KEY").ok(),
        request_timeout: Duration::from_secs(args.request_timeout),
        download_timeout: Duration::from_secs(args.download_timeout),
        raster_timeout: Duration::from_secs(args.raster_timeout),
        output_dir: args.out,
        seed: args.seed,
    };

    let report = DeckEngine::new(config).generate(
        &descriptors,
        args.template.as_deref(),
        args.layout,
    )?;

    eprintln!(
        "wrote {} ({} slides, {} background)",
        report.path.display(),
        report.slide_count,
        report.background
    );
    Ok(())
}
