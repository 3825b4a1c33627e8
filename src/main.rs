//! Seedline command-line entry point
//!
//! Loads a crawl configuration and prints the normalized start URLs.

use anyhow::Context;
use clap::Parser;
use seedline::config::{load_config, NormalizedConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Seedline: start-url normalization for documentation crawls
///
/// Validates a JSON or TOML crawl configuration, expands seeds flagged for
/// automatic tagging and prints the seeds the crawler would start from.
#[derive(Parser, Debug)]
#[command(name = "seedline")]
#[command(version)]
#[command(about = "Normalize and expand crawl start URLs", long_about = None)]
struct Cli {
    /// Path to a JSON or TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the normalized start URLs as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&config.start_urls)?);
    } else {
        print_summary(&config);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seedline=info,warn"),
            1 => EnvFilter::new("seedline=debug,info"),
            2 => EnvFilter::new("seedline=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(config: &NormalizedConfig) {
    if let Some(index_name) = &config.index_name {
        println!("Index: {}", index_name);
    }
    if let Some(hash) = &config.config_hash {
        println!("Config hash: {}", hash);
    }
    println!("Allowed domains: {}", config.allowed_domains.join(", "));
    if !config.stop_urls.is_empty() {
        println!("Stop URLs: {}", config.stop_urls.join(", "));
    }

    println!("\nStart URLs ({}):", config.start_urls.len());
    for seed in &config.start_urls {
        println!(
            "  - {} [rank {}] tags={:?} selectors_key={}",
            seed.url,
            seed.page_rank,
            seed.tags,
            seed.selectors_key.as_deref().unwrap_or("-")
        );
    }
}
