// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vitalbarn-rs

//! VitalBarn - Wearable Biometric Telemetry Simulator
//!
//! Runs the reading generator and the HTTP API in one process.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use vitalbarn::{api, Config, ReadingStore, SimulatorEngine, SqliteStore, VERSION};

/// VitalBarn - Wearable Biometric Telemetry Simulator
#[derive(Parser, Debug)]
#[command(name = "vitalbarn")]
#[command(author = "VitalBarn Project")]
#[command(version = VERSION)]
#[command(about = "Simulated wearable telemetry generator and API")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,

    /// HTTP API port
    #[arg(long)]
    port: Option<u16>,

    /// Seconds between generated readings
    #[arg(long)]
    interval: Option<u64>,

    /// Data output directory
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("VitalBarn v{} - Wearable Biometric Telemetry Simulator", VERSION);

    // Load or create configuration
    let config_path = args.config.unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)?;

    // Override with command line args
    if let Some(port) = args.port {
        config.http.port = port;
    }
    if let Some(interval) = args.interval {
        config.simulator.tick_interval_secs = interval;
    }
    if let Some(data_dir) = args.data_dir {
        config.database.path = data_dir.join("vitalbarn.db");
        config.data_dir = data_dir;
    }

    info!("Configuration loaded from {:?}", config_path);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(config))
}

async fn run(config: Config) -> Result<()> {
    // A store that never opened is a startup failure, not something to
    // limp past
    let store = SqliteStore::open(&config.database)
        .context("persistence layer unavailable, refusing to start the simulator")?;
    let store: Arc<dyn ReadingStore> = Arc::new(store);

    let config = Arc::new(config);
    let engine = Arc::new(SimulatorEngine::new(&config, store.clone()));
    engine.start().await;

    let routes = api::routes(engine.clone(), store, config.clone());

    let ip: IpAddr = config
        .http
        .host
        .parse()
        .with_context(|| format!("invalid HTTP bind address {:?}", config.http.host))?;
    let addr = SocketAddr::new(ip, config.http.port);

    let (bound, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
        let _ = tokio::signal::ctrl_c().await;
    });
    info!("HTTP API listening on http://{bound}");
    info!("Press Ctrl+C to shutdown");

    server.await;

    info!("Shutdown signal received, cleaning up...");
    engine.stop().await;

    info!("VitalBarn shutdown complete");
    Ok(())
}
