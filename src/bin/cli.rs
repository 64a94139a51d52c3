//! sitecorpus CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sitecorpus::{error::Result, models::Config, pipeline};

/// sitecorpus - Single-site documentation crawler
#[derive(Parser, Debug)]
#[command(
    name = "sitecorpus",
    version,
    about = "Crawl one site breadth-first into a deduplicated markdown corpus"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "sitecorpus.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site into a markdown corpus
    Crawl {
        /// Seed URL (overrides crawl.seed_url)
        seed: Option<String>,

        /// Corpus output path (overrides crawl.output_path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop after this many successful fetches
        #[arg(long)]
        max_pages: Option<usize>,

        /// Occurrences of a block allowed before it is dropped
        #[arg(long)]
        repeat_threshold: Option<usize>,

        /// Global crawl timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the crawl summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a corpus into a print-styled HTML document
    #[cfg(feature = "render")]
    Render {
        /// Corpus markdown file
        input: PathBuf,

        /// Output path (default: input with an .html extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the configuration
    Validate,

    /// Print the effective configuration as TOML
    Config,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = if cli.config.exists() {
        let config = Config::load(&cli.config)?;
        log::info!("Loaded configuration from {}", cli.config.display());
        config
    } else {
        log::debug!("No config at {}, using defaults", cli.config.display());
        Config::default()
    };

    match cli.command {
        Command::Crawl {
            seed,
            output,
            max_pages,
            repeat_threshold,
            timeout,
            json,
        } => {
            if let Some(seed) = seed {
                config.crawl.seed_url = seed;
            }
            if let Some(output) = output {
                config.crawl.output_path = output.display().to_string();
            }
            if let Some(max_pages) = max_pages {
                config.crawl.max_pages = max_pages;
            }
            if let Some(threshold) = repeat_threshold {
                config.dedup.repeat_threshold = threshold;
            }
            if timeout.is_some() {
                config.crawl.timeout_secs = timeout;
            }

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }

            let summary = pipeline::run_crawler(&config).await?;
            log::info!(
                "Finished in {}s: {} pages persisted to {}",
                summary.elapsed_secs(),
                summary.pages_persisted,
                config.crawl.output_path
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
        }

        #[cfg(feature = "render")]
        Command::Render { input, output } => {
            let output = output.unwrap_or_else(|| input.with_extension("html"));
            pipeline::run_render(&input, &output).await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }

        Command::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
