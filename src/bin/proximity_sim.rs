// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vitalbarn-rs

//! Standalone proximity-sensor simulator.
//!
//! Plays the role of the external microcontroller: pushes one random
//! proximity reading to the VitalBarn ingest endpoint per interval until
//! interrupted.

use anyhow::Result;
use clap::Parser;
use rand::prelude::*;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Proximity sensor simulator for the VitalBarn ingest endpoint
#[derive(Parser, Debug)]
#[command(name = "proximity-sim")]
#[command(about = "Pushes simulated proximity readings to a VitalBarn server")]
struct Args {
    /// Ingest endpoint URL
    #[arg(long, default_value = "http://127.0.0.1:5000/api/sensor/proximidad")]
    url: String,

    /// Sensor identifier reported with each reading
    #[arg(long, default_value = "proximidad_01")]
    sensor_id: String,

    /// Seconds between pushes
    #[arg(long, default_value_t = 5)]
    interval: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Proximity sensor simulation started, pushing to {}", args.url);

    let client = reqwest::Client::new();
    let mut rng = StdRng::from_entropy();
    let interval = Duration::from_secs(args.interval);

    loop {
        let distance_cm = (rng.gen_range(5.0..=40.0) * 100.0_f64).round() / 100.0;
        let payload = json!({
            "sensor_id": args.sensor_id,
            "distancia_cm": distance_cm,
        });

        match client.post(&args.url).json(&payload).send().await {
            Ok(response) => {
                info!("Sent {distance_cm}cm, server replied {}", response.status());
            }
            Err(e) => {
                warn!("Failed to push reading: {e}");
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Proximity sensor simulation stopped");
                break;
            }
        }
    }

    Ok(())
}
