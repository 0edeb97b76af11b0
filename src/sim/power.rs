//! Charge minigame: rapid interactions build power, each interaction rolls for success
//!
//! Every interaction adds a fixed amount of power and then succeeds with
//! probability `power / 100`. Odds never decrease during a session, and once
//! power saturates the next interaction always succeeds.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{CRIT_RATE, POWER_MAX, POWER_PER_INTERACTION, RATE_WINDOW_MS};

/// Result of the probability roll for one interaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    /// Session won; no further interactions are accepted
    Success,
    /// Roll failed; the location hint is passed through for feedback effects
    Miss { location: Vec2 },
}

/// Everything one interaction produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionOutcome {
    /// Power after this interaction
    pub power: u32,
    /// Interactions in the trailing window, including this one
    pub rate: usize,
    /// True only on the interaction that first crossed the crit rate this session
    pub crit_unlocked: bool,
    pub verdict: Verdict,
}

/// Power and click-rate tracking for one charge session
#[derive(Debug, Clone, Default)]
pub struct PowerAccumulator {
    power: u32,
    window: VecDeque<f64>,
    crit_unlocked: bool,
    finished: bool,
}

impl PowerAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh session
    pub fn reset(&mut self) {
        self.power = 0;
        self.window.clear();
        self.crit_unlocked = false;
        self.finished = false;
    }

    pub fn power(&self) -> u32 {
        self.power
    }

    /// Current win chance in [0, 1]
    pub fn probability(&self) -> f64 {
        f64::from(self.power) / f64::from(POWER_MAX)
    }

    pub fn crit_unlocked(&self) -> bool {
        self.crit_unlocked
    }

    /// Whether this session already succeeded
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Register one interaction at `now_ms`.
    ///
    /// Returns `None` once the session has succeeded.
    pub fn register_interaction(
        &mut self,
        now_ms: f64,
        location: Vec2,
        rng: &mut impl Rng,
    ) -> Option<InteractionOutcome> {
        if self.finished {
            return None;
        }

        self.window.push_back(now_ms);
        // Timestamps may arrive out of order, so filter the whole window
        self.window.retain(|&t| now_ms - t <= RATE_WINDOW_MS);
        let rate = self.window.len();

        let crit_unlocked = rate > CRIT_RATE && !self.crit_unlocked;
        if crit_unlocked {
            self.crit_unlocked = true;
        }

        self.power = (self.power + POWER_PER_INTERACTION).min(POWER_MAX);
        let verdict = if rng.random::<f64>() < self.probability() {
            self.finished = true;
            Verdict::Success
        } else {
            Verdict::Miss { location }
        };

        Some(InteractionOutcome {
            power: self.power,
            rate,
            crit_unlocked,
            verdict,
        })
    }
}
