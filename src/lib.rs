// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vitalbarn-rs

//! VitalBarn - Wearable Biometric Telemetry Simulator
//!
//! A native service that simulates a wearable fitness device:
//! - Continuous generation of correlated biometric readings (heart rate,
//!   steps, SpO2, body temperature) driven by a probabilistic activity model
//! - SQLite persistence of every reading
//! - HTTP API for the latest reading, bounded history, derived metrics
//!   (heart-rate zone, step total), and simulator control
//! - Ingest endpoint for externally pushed proximity-sensor readings
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                   VitalBarn Service                     │
//! ├─────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌────────────┐   ┌──────────────────┐   │
//! │  │ Activity │ → │   Signal   │ → │ SimulatorEngine  │   │
//! │  │  Model   │   │ Generators │   │   (tick loop)    │   │
//! │  └──────────┘   └────────────┘   └──────────────────┘   │
//! │                                          ↓              │
//! │  ┌──────────┐                    ┌──────────────────┐   │
//! │  │ HTTP API │ ←───────────────── │  ReadingStore    │   │
//! │  │  (warp)  │                    │   (SQLite)       │   │
//! │  └──────────┘                    └──────────────────┘   │
//! └─────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![allow(dead_code)]

pub mod api;
pub mod config;
pub mod db;
pub mod model;
pub mod simulator;

// Re-exports for convenience
pub use config::Config;
pub use db::{ReadingStore, SqliteStore, StoreError};
pub use model::{BiometricReading, HeartRateZone, ProximityEvent};
pub use simulator::{ActivityState, SimulatorEngine, SimulatorStatus};

/// VitalBarn version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VitalBarn name
pub const NAME: &str = "VitalBarn";
