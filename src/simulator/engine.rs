// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vitalbarn-rs

//! Simulator engine - owns the activity model and the periodic tick loop

use parking_lot::Mutex;
use rand::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::signals;
use super::{ActivityStateMachine, SimulatorStatus};
use crate::config::{Config, SensorsConfig};
use crate::db::ReadingStore;
use crate::model::BiometricReading;

/// Bound on how long `stop` waits for the loop to observe the shutdown signal
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Consecutive persistence failures before the loop backs off
const BACKOFF_STREAK: u32 = 3;

/// Maximum backoff multiple of the tick interval
const BACKOFF_CAP: u32 = 6;

struct EngineState {
    running: bool,
    activity: ActivityStateMachine,
    total_steps: u64,
    tick_count: u64,
    persist_failures: u64,
    failure_streak: u32,
    last_error: Option<String>,
}

struct LoopHandle {
    shutdown_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

/// Generates one biometric reading per tick and writes it through the store.
///
/// All mutable state sits behind a single lock taken only briefly, so status
/// queries and step resets from request handlers never wait on a tick in
/// progress. Lifecycle calls serialize through their own async lock.
pub struct SimulatorEngine {
    tick_interval: Duration,
    baseline_heart_rate: u16,
    ranges: SensorsConfig,
    store: Arc<dyn ReadingStore>,
    state: Arc<Mutex<EngineState>>,
    lifecycle: tokio::sync::Mutex<Option<LoopHandle>>,
}

impl SimulatorEngine {
    /// Create a stopped engine from the application configuration
    pub fn new(config: &Config, store: Arc<dyn ReadingStore>) -> Self {
        Self {
            tick_interval: Duration::from_secs(config.simulator.tick_interval_secs),
            baseline_heart_rate: config.simulator.baseline_heart_rate,
            ranges: config.sensors.clone(),
            store,
            state: Arc::new(Mutex::new(EngineState {
                running: false,
                activity: ActivityStateMachine::new(config.simulator.transition_probability),
                total_steps: 0,
                tick_count: 0,
                persist_failures: 0,
                failure_streak: 0,
                last_error: None,
            })),
            lifecycle: tokio::sync::Mutex::new(None),
        }
    }

    /// Start the tick loop on a background task.
    ///
    /// Idempotent: a second call while running logs a warning and does
    /// nothing. Returns as soon as the task is spawned.
    pub async fn start(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        if lifecycle.is_some() {
            warn!("Simulator is already running");
            return;
        }

        self.state.lock().running = true;

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let join = tokio::spawn(run_loop(
            self.state.clone(),
            self.store.clone(),
            self.ranges.clone(),
            self.tick_interval,
            shutdown_rx,
        ));

        *lifecycle = Some(LoopHandle { shutdown_tx, join });
        info!("Simulator started, generating readings every {:?}", self.tick_interval);
    }

    /// Stop the tick loop.
    ///
    /// Signals the loop, waits up to [`STOP_TIMEOUT`] for it to exit, and
    /// marks the engine stopped regardless; a loop that misses the window
    /// exits at its next shutdown check. No-op when already stopped.
    pub async fn stop(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        let handle = match lifecycle.take() {
            Some(handle) => handle,
            None => {
                warn!("Simulator is not running");
                return;
            }
        };

        self.state.lock().running = false;
        let _ = handle.shutdown_tx.send(());

        if tokio::time::timeout(STOP_TIMEOUT, handle.join).await.is_err() {
            warn!("Tick loop did not exit within {STOP_TIMEOUT:?}; it will stop at its next check");
        }

        info!("Simulator stopped");
    }

    /// Zero the cumulative step counter.
    ///
    /// Takes effect on the next generated reading; the activity state and
    /// running flag are untouched.
    pub fn reset_steps(&self) {
        self.state.lock().total_steps = 0;
        info!("Step counter reset");
    }

    /// Snapshot the current engine state
    pub fn status(&self) -> SimulatorStatus {
        let state = self.state.lock();
        SimulatorStatus {
            running: state.running,
            activity_state: state.activity.current(),
            total_steps: state.total_steps,
            baseline_heart_rate: self.baseline_heart_rate,
            interval_secs: self.tick_interval.as_secs(),
            tick_count: state.tick_count,
            persist_failures: state.persist_failures,
            last_error: state.last_error.clone(),
        }
    }
}

async fn run_loop(
    state: Arc<Mutex<EngineState>>,
    store: Arc<dyn ReadingStore>,
    ranges: SensorsConfig,
    tick_interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut rng = StdRng::from_entropy();

    loop {
        // Generate under the lock, persist outside it
        let reading = {
            let mut state = state.lock();
            let activity = state.activity.maybe_transition();

            let heart_rate = signals::heart_rate(&mut rng, activity, &ranges.heart_rate);
            state.total_steps += signals::step_increment(&mut rng, activity);
            let oxygen = signals::oxygen_saturation(&mut rng, activity, &ranges.oxygen);
            let temperature = signals::body_temperature(&mut rng, activity, &ranges.temperature);
            state.tick_count += 1;

            BiometricReading::new(heart_rate, state.total_steps, oxygen, temperature)
        };

        debug!(
            "Generated reading: {reading} | Zone: {} | Status: {}",
            reading.heart_rate_zone(),
            reading.health_status().overall
        );

        match store.save(&reading).await {
            Ok(_) => {
                state.lock().failure_streak = 0;
            }
            Err(e) => {
                warn!("Failed to persist reading: {e}");
                let mut state = state.lock();
                state.persist_failures += 1;
                state.failure_streak = state.failure_streak.saturating_add(1);
                state.last_error = Some(e.to_string());
            }
        }

        // A failing store is retried on schedule, then progressively less
        // often once the streak passes BACKOFF_STREAK
        let delay = {
            let state = state.lock();
            if state.failure_streak >= BACKOFF_STREAK {
                tick_interval * state.failure_streak.min(BACKOFF_CAP)
            } else {
                tick_interval
            }
        };

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.recv() => {
                info!("Tick loop shutting down");
                break;
            }
        }
    }
}
