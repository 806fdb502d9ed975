// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tiergate - cost-aware tiered request routing.
//!
//! This is the binary entry point. It loads configuration, installs the
//! tracing subscriber and runs one subcommand against a dispatcher backed by
//! the simulated backend.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod batch;
mod classify;
mod config;
mod output;
mod route;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tiergate_config::TiergateConfig;
use tiergate_core::Tier;
use tiergate_router::{Dispatcher, SimulatedBackend};

/// Tiergate - route requests to the cheapest tier that can handle them.
#[derive(Parser, Debug)]
#[command(name = "tiergate", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    /// Artificial latency of the simulated backend, in milliseconds.
    #[arg(long, global = true, value_name = "MS")]
    latency_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a request without dispatching it.
    Classify {
        /// Request text.
        text: String,
        /// Print the analysis as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Route a single request through the tier chain.
    Route {
        /// Request text.
        text: String,
        /// Start at this tier instead of the classifier's recommendation.
        #[arg(long, value_parser = parse_tier)]
        tier: Option<Tier>,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Route one request per line from a file (or stdin) and print the report.
    Batch {
        /// Input file; stdin when omitted.
        file: Option<PathBuf>,
        /// Start every request at this tier.
        #[arg(long, value_parser = parse_tier)]
        tier: Option<Tier>,
        /// Write the usage ledger to this CSV file.
        #[arg(long, value_name = "CSV")]
        export: Option<PathBuf>,
        /// Print results and statistics as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn parse_tier(value: &str) -> Result<Tier, String> {
    Tier::parse(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let loaded = match &cli.config {
        Some(path) => tiergate_config::load_and_validate_path(path),
        None => tiergate_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            tiergate_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);

    let result = match cli.command {
        Some(Commands::Classify { text, json }) => {
            classify::run_classify(&text, json, cli.plain);
            Ok(())
        }
        Some(Commands::Route { text, tier, json }) => {
            let dispatcher = build_dispatcher(&config, cli.latency_ms);
            route::run_route(&dispatcher, &text, tier, json, cli.plain).await
        }
        Some(Commands::Batch {
            file,
            tier,
            export,
            json,
        }) => {
            let dispatcher = build_dispatcher(&config, cli.latency_ms);
            let options = batch::BatchOptions {
                input: file,
                tier,
                export,
                json,
                plain: cli.plain,
            };
            batch::run_batch(&dispatcher, &options).await
        }
        Some(Commands::Config) => config::run_config(&config),
        None => {
            println!("tiergate: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Dispatcher over the simulated backend, configured from `config`.
fn build_dispatcher(config: &TiergateConfig, latency_ms: Option<u64>) -> Dispatcher {
    let backend = match latency_ms {
        Some(ms) => SimulatedBackend::with_latency(Duration::from_millis(ms)),
        None => SimulatedBackend::new(),
    };
    Dispatcher::from_config(config, Arc::new(backend))
}

/// Initialize the tracing subscriber. Logs go to stderr so stdout stays parseable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tiergate={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
