// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vitalbarn-rs

//! Activity level model for the simulated wearer

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Coarse activity level of the simulated wearer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityState {
    /// Sitting still or sleeping
    Resting,
    /// Walking, household activity
    Light,
    /// Brisk walking, cycling
    Moderate,
    /// Running, hard exercise
    Intense,
}

impl ActivityState {
    /// All states, in draw order
    pub const ALL: [ActivityState; 4] = [
        ActivityState::Resting,
        ActivityState::Light,
        ActivityState::Moderate,
        ActivityState::Intense,
    ];

    /// Draw weights biased toward rest
    pub const WEIGHTS: [f64; 4] = [0.4, 0.3, 0.2, 0.1];
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Resting => "resting",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Intense => "intense",
        };
        write!(f, "{name}")
    }
}

/// Markov-like model of how the wearer's activity level drifts over time.
///
/// Most ticks leave the state unchanged; with `transition_probability` a new
/// state is drawn from the weighted distribution in [`ActivityState::WEIGHTS`],
/// so the wearer spends most of the day at rest and changes pace rarely.
pub struct ActivityStateMachine {
    state: ActivityState,
    transition_probability: f64,
    weights: WeightedIndex<f64>,
    rng: StdRng,
}

impl ActivityStateMachine {
    /// Create a state machine starting at rest
    pub fn new(transition_probability: f64) -> Self {
        Self::with_state(ActivityState::Resting, transition_probability)
    }

    /// Create a state machine starting from a specific state
    pub fn with_state(state: ActivityState, transition_probability: f64) -> Self {
        Self {
            state,
            transition_probability,
            weights: WeightedIndex::new(ActivityState::WEIGHTS).unwrap(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Possibly transition, then return the current state
    pub fn maybe_transition(&mut self) -> ActivityState {
        if self.rng.gen::<f64>() < self.transition_probability {
            let next = ActivityState::ALL[self.weights.sample(&mut self.rng)];
            if next != self.state {
                debug!("Activity state changed to {next}");
            }
            self.state = next;
        }
        self.state
    }

    /// Current state without transitioning
    pub fn current(&self) -> ActivityState {
        self.state
    }
}
