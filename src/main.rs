//! Boilerhub CLI
//!
//! Serves the boiler telemetry hub or inspects a sensor CSV from the
//! command line.

use anyhow::Context;
use boilerhub::config::Config;
use boilerhub::core::range::{slice_by_range, TimeRange, UnknownRangePolicy};
use boilerhub::core::series::FeatureStore;
use boilerhub::core::stats::stats_of;
use boilerhub::ingest::loader::{load_or_demo, LoadOptions};
use boilerhub::server::{self, ServerConfig};
use boilerhub::VERSION;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "boilerhub")]
#[command(version = VERSION)]
#[command(about = "Boiler sensor telemetry hub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP/WebSocket server
    Serve {
        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        /// Sensor CSV path (defaults to the configured candidates)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Restrict ingestion to the calendar day of the first row
        #[arg(long)]
        first_day_only: bool,

        /// Reject unknown range specifiers instead of treating them as "all"
        #[arg(long)]
        strict_ranges: bool,
    },

    /// Load a CSV and print its catalog and per-feature statistics
    Inspect {
        /// Sensor CSV path (defaults to the configured candidates)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Range to compute statistics over (15m, 1h, 8h, 24h, all)
        #[arg(long, default_value = "all")]
        range: String,

        /// Restrict ingestion to the calendar day of the first row
        #[arg(long)]
        first_day_only: bool,
    },

    /// Show the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            csv,
            first_day_only,
            strict_ranges,
        } => cmd_serve(port, csv, first_day_only, strict_ranges).await,
        Commands::Inspect {
            csv,
            range,
            first_day_only,
        } => cmd_inspect(csv, &range, first_day_only).await,
        Commands::Config => cmd_config(),
    }
}

async fn cmd_serve(
    port: Option<u16>,
    csv: Option<PathBuf>,
    first_day_only: bool,
    strict_ranges: bool,
) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut config = Config::load().unwrap_or_default();
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(csv) = csv {
        config.csv_path = Some(csv);
    }
    if first_day_only {
        config.first_day_only = true;
    }
    if strict_ranges {
        config.unknown_range_policy = UnknownRangePolicy::Reject;
    }

    let table = load_snapshot(&config).await?;
    if table.real_data {
        tracing::info!(rows = table.rows.len(), "serving real sensor data");
    } else {
        tracing::warn!("serving synthetic demo data");
    }

    let store = FeatureStore::from_table(&table).shared();
    let server_config = ServerConfig {
        port: config.port,
        unknown_range_policy: config.unknown_range_policy,
        ticker: Default::default(),
    };
    let (addr, shutdown_tx) = server::run(server_config, store).await?;
    println!("boilerhub v{VERSION} listening on http://{addr}");
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    let _ = shutdown_tx.send(());
    println!();
    println!("Shutting down.");
    Ok(())
}

async fn cmd_inspect(
    csv: Option<PathBuf>,
    range: &str,
    first_day_only: bool,
) -> anyhow::Result<()> {
    let mut config = Config::load().unwrap_or_default();
    if let Some(csv) = csv {
        config.csv_path = Some(csv);
    }
    config.first_day_only = first_day_only;

    let range = TimeRange::parse(range, config.unknown_range_policy)
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let table = load_snapshot(&config).await?;
    let store = FeatureStore::from_table(&table);

    println!("Source: {}", if table.real_data { "csv" } else { "demo data" });
    println!(
        "Rows: {} usable, {} dropped",
        store.rows_loaded(),
        store.rows_dropped()
    );
    match store.latest_instant() {
        Some(latest) => println!("Latest observation: {latest}"),
        None => println!("Latest observation: none"),
    }
    println!();

    println!(
        "{:<40} {:>7} {:>10} {:>10} {:>10} {:>10}",
        "FEATURE", "POINTS", "MIN", "MAX", "MEAN", "LATEST"
    );
    let anchor = Utc::now();
    let fallback = store.latest_instant();
    for feature in store.features() {
        let series = store.series(feature).unwrap_or(&[]);
        let slice = slice_by_range(series, range, anchor, fallback);
        let stats = stats_of(&slice.points);
        let fmt = |v: Option<f64>| match v {
            Some(v) => format!("{v:.2}"),
            None => "-".to_string(),
        };
        println!(
            "{:<40} {:>7} {:>10} {:>10} {:>10} {:>10}{}",
            feature,
            slice.points.len(),
            fmt(stats.min),
            fmt(stats.max),
            fmt(stats.mean),
            fmt(stats.latest),
            if slice.used_fallback { "  (fallback anchor)" } else { "" },
        );
    }

    Ok(())
}

async fn load_snapshot(config: &Config) -> anyhow::Result<boilerhub::ingest::LoadedTable> {
    let candidates = config.csv_candidates();
    let options = LoadOptions {
        time_column: config.time_column.clone(),
        first_day_only: config.first_day_only,
    };
    tokio::task::spawn_blocking(move || load_or_demo(&candidates, &options))
        .await
        .context("csv load task failed")
}

fn cmd_config() -> anyhow::Result<()> {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
    Ok(())
}
