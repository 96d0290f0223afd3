// feedlab - engine test tooling CLI
// Single entry point for feed generation, verification, run diffing and latency reports

use clap::{Parser, Subcommand};
use feedlab::{Config, FeedResult, GeneratorParams};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

// Load command modules from cli directory
#[path = "../cli/feed_commands.rs"]
mod feed_commands;
#[path = "../cli/report_commands.rs"]
mod report_commands;

#[derive(Parser)]
#[command(name = "feedlab")]
#[command(version)]
#[command(about = "Synthetic order feeds and run analysis for matching-engine testing", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (built-in defaults when absent)
    #[arg(short, long, global = true, default_value = "feedlab.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Generate a synthetic order-event feed
    Gen {
        /// Output CSV path
        #[arg(short, long)]
        out: PathBuf,

        /// Number of Add events (iterations)
        #[arg(short, long)]
        n: Option<usize>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Starting reference price in ticks
        #[arg(long, allow_negative_numbers = true)]
        base_price: Option<i64>,

        /// Probability of a burst gap per iteration
        #[arg(long)]
        burst_p: Option<f64>,

        /// Probability of a cancel per iteration
        #[arg(long)]
        cancel_p: Option<f64>,

        /// Probability of an execution per iteration
        #[arg(long)]
        exec_p: Option<f64>,

        /// Disable the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Check a feed file against the generator invariants
    Verify {
        /// Feed CSV path
        file: PathBuf,
    },

    /// Compare two run outputs byte for byte
    Diff {
        a: PathBuf,
        b: PathBuf,
    },

    /// Summarize per-stage latency samples
    Latency {
        /// Latency table (stage,ns)
        #[arg(long)]
        lat: PathBuf,

        /// Prefix for per-stage histogram files
        #[arg(long)]
        out_prefix: Option<String>,

        /// Histogram bins per stage
        #[arg(long)]
        bins: Option<usize>,

        /// Also write the summary as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Setup logging first (before config load so we can see config errors)
    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("❌ [{}] {}", e.category(), e.user_message());
            1
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> FeedResult<i32> {
    match cli.command {
        // Init doesn't require config (it creates it)
        Commands::Init { force } => {
            init_config(&cli.config, force)?;
            Ok(0)
        }

        Commands::Gen { out, n, seed, base_price, burst_p, cancel_p, exec_p, no_progress } => {
            let config = Config::load_or_default(&cli.config)?;
            let defaults = config.generator.params();
            let params = GeneratorParams {
                base_price: base_price.unwrap_or(defaults.base_price),
                burst_probability: burst_p.unwrap_or(defaults.burst_probability),
                cancel_probability: cancel_p.unwrap_or(defaults.cancel_probability),
                execute_probability: exec_p.unwrap_or(defaults.execute_probability),
            };
            let count = n.unwrap_or(config.generator.count);
            let seed = seed.unwrap_or(config.generator.seed);
            let show_progress = config.output.progress && !no_progress;

            feed_commands::generate_feed(&out, count, seed, params, show_progress)?;
            Ok(0)
        }

        Commands::Verify { file } => {
            let config = Config::load_or_default(&cli.config)?;
            feed_commands::verify_feed(&file, config.output.progress)?;
            Ok(0)
        }

        Commands::Diff { a, b } => {
            let config = Config::load_or_default(&cli.config)?;
            report_commands::diff_runs(&a, &b, config.output.progress)
        }

        Commands::Latency { lat, out_prefix, bins, json } => {
            let config = Config::load_or_default(&cli.config)?;
            let prefix = out_prefix.unwrap_or_else(|| config.latency.out_prefix.clone());
            let bins = bins.unwrap_or(config.latency.bins);
            if bins == 0 {
                return Err(feedlab::FeedError::InvalidParameter(
                    "bins".to_string(),
                    "must be greater than 0".to_string(),
                ));
            }
            report_commands::analyze_latency(&lat, &prefix, bins, json.as_deref(), config.output.progress)?;
            Ok(0)
        }
    }
}

fn init_config(path: &Path, force: bool) -> FeedResult<()> {
    info!("🔧 Initializing configuration...");

    if path.exists() && !force {
        warn!("⚠️  {} already exists, skipping (use --force to overwrite)", path.display());
        return Ok(());
    }

    let default_config = include_str!("../../config.toml.example");
    std::fs::write(path, default_config)
        .map_err(|e| feedlab::FeedError::FileWrite(format!("{}: {}", path.display(), e)))?;
    info!("📝 Created {}", path.display());

    info!("💡 Next steps:");
    info!("   1. Tune [generator] in {}", path.display());
    info!("   2. Run: feedlab gen --out feed.csv");
    info!("   3. Run: feedlab verify feed.csv");

    Ok(())
}
