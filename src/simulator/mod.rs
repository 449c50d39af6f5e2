//! Simulator module - activity model, signal generators, and the engine

mod activity;
mod engine;
mod signals;

pub use activity::{ActivityState, ActivityStateMachine};
pub use engine::SimulatorEngine;
pub use signals::{body_temperature, heart_rate, oxygen_saturation, step_increment};

use serde::Serialize;

/// Immutable snapshot of the engine state returned to callers
#[derive(Debug, Clone, Serialize)]
pub struct SimulatorStatus {
    /// Whether the tick loop is active
    pub running: bool,
    /// Current coarse activity level
    pub activity_state: ActivityState,
    /// Cumulative step count for the current run
    pub total_steps: u64,
    /// Baseline heart rate in bpm
    pub baseline_heart_rate: u16,
    /// Seconds between readings
    pub interval_secs: u64,
    /// Readings generated since start
    pub tick_count: u64,
    /// Persistence failures observed by the loop
    pub persist_failures: u64,
    /// Most recent persistence error, if any
    pub last_error: Option<String>,
}
