// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vitalbarn-rs

//! Signal generators - map the activity state to plausible sensor values.
//!
//! Per-state base ranges overlap between neighboring states so transitions
//! read as continuous on a dashboard. Noise is added before clamping, so the
//! configured device limits hold no matter the state.

use rand::prelude::*;
use rand_distr::Uniform;

use super::ActivityState;
use crate::config::{HeartRateLimits, RangeLimits};

/// Generate a heart rate in bpm for the current activity state.
///
/// Draws from the per-state target range, adds ±5 bpm of noise, and clamps
/// to the device limits.
pub fn heart_rate(rng: &mut impl Rng, activity: ActivityState, limits: &HeartRateLimits) -> u16 {
    let target: i32 = match activity {
        ActivityState::Resting => rng.gen_range(60..=80),
        ActivityState::Light => rng.gen_range(90..=110),
        ActivityState::Moderate => rng.gen_range(120..=140),
        ActivityState::Intense => rng.gen_range(150..=175),
    };

    let noise: i32 = rng.sample(Uniform::new_inclusive(-5, 5));

    (target + noise).clamp(i32::from(limits.min), i32::from(limits.max)) as u16
}

/// Generate the step increment for one tick.
///
/// The cumulative accumulator lives in the engine; this returns only the
/// per-tick delta.
pub fn step_increment(rng: &mut impl Rng, activity: ActivityState) -> u64 {
    match activity {
        ActivityState::Resting => rng.gen_range(0..=2),
        ActivityState::Light => rng.gen_range(3..=8),
        ActivityState::Moderate => rng.gen_range(10..=20),
        ActivityState::Intense => rng.gen_range(25..=40),
    }
}

/// Generate an oxygen saturation percentage, one decimal.
///
/// Hard exercise pulls the base range down slightly.
pub fn oxygen_saturation(rng: &mut impl Rng, activity: ActivityState, limits: &RangeLimits) -> f64 {
    let base = if activity == ActivityState::Intense {
        rng.gen_range(95.0..=98.0)
    } else {
        rng.gen_range(97.0..=100.0)
    };

    let noise: f64 = rng.sample(Uniform::new_inclusive(-0.5, 0.5));

    round_one_decimal((base + noise).clamp(limits.min, limits.max))
}

/// Generate a body temperature in °C, one decimal.
pub fn body_temperature(rng: &mut impl Rng, activity: ActivityState, limits: &RangeLimits) -> f64 {
    let base = match activity {
        ActivityState::Resting => rng.gen_range(36.3..=36.8),
        ActivityState::Light => rng.gen_range(36.6..=37.0),
        ActivityState::Moderate => rng.gen_range(36.9..=37.3),
        ActivityState::Intense => rng.gen_range(37.0..=37.5),
    };

    let noise: f64 = rng.sample(Uniform::new_inclusive(-0.1, 0.1));

    round_one_decimal((base + noise).clamp(limits.min, limits.max))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
