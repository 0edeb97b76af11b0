//! Fry Fortune - a toss, season and charge fortune ritual
//!
//! Core modules:
//! - `sim`: Per-tick simulation (toss physics, particles, charge power)
//! - `ritual`: Phase orchestrator driving the simulations
//! - `schedule`: One-shot timed tasks guarded by session generation
//! - `ledger`: Persistent achievements and result collection
//! - `content`: Immutable result and achievement tables
//! - `persistence`: Key-value storage backends
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Timings and effect preferences

pub mod content;
pub mod events;
pub mod ledger;
pub mod persistence;
pub mod platform;
pub mod ritual;
pub mod schedule;
pub mod settings;
pub mod sim;

pub use content::{AchievementDef, ContentError, ContentTables};
pub use events::{RitualEvent, Toast};
pub use ledger::AchievementLedger;
pub use persistence::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use ritual::{Phase, Ritual, RitualView, SeasonStage};
pub use settings::{QualityPreset, Settings, Timings};

/// Simulation constants. All physics values are per tick (one tick per frame).
pub mod consts {
    /// Gravity added to a toss object's vertical velocity each tick
    pub const GRAVITY: f32 = 0.5;

    /// Fallback viewport for malformed (non-positive or non-finite) sizes
    pub const MIN_VIEWPORT_WIDTH: f32 = 320.0;
    pub const MIN_VIEWPORT_HEIGHT: f32 = 240.0;

    /// Zone layout
    pub const ZONE_MAX_WIDTH: f32 = 130.0;
    pub const ZONE_WIDTH_FRACTION: f32 = 0.35;
    pub const ZONE_HEIGHT: f32 = 70.0;
    pub const ZONE_SPACING: f32 = 30.0;
    pub const ZONE_TOP_FRACTION: f32 = 0.55;
    /// Hit-box shrink applied to every zone edge
    pub const ZONE_HIT_INSET: f32 = 10.0;
    /// Landed objects keep this far from the zone's side walls
    pub const ZONE_REST_MARGIN: f32 = 20.0;

    /// Toss object defaults
    pub const OBJECT_WIDTH: f32 = 65.0;
    pub const OBJECT_HEIGHT: f32 = 45.0;
    pub const OBJECT_PARK_Y: f32 = -100.0;
    pub const OBJECT_PARK_SPREAD: f32 = 30.0;
    pub const LAUNCH_Y: f32 = -60.0;
    pub const LAUNCH_MAX_OFFSET: f32 = 20.0;
    pub const LAUNCH_MAX_VX: f32 = 3.0;
    pub const LAUNCH_MAX_VY: f32 = 5.0;
    pub const LAUNCH_MAX_SPIN: f32 = 0.1;
    /// Distance below the viewport at which a falling object counts as missed
    pub const MISS_DEPTH: f32 = 100.0;

    /// Charge minigame
    pub const POWER_PER_INTERACTION: u32 = 2;
    pub const POWER_MAX: u32 = 100;
    pub const RATE_WINDOW_MS: f64 = 1000.0;
    /// Interactions within the window must exceed this to crit
    pub const CRIT_RATE: usize = 7;

    /// Particle bursts
    pub const LANDING_BURST: usize = 15;
    pub const LANDING_BURST_SPEED: f32 = 5.0;
    pub const CELEBRATION_BURST: usize = 30;
    pub const CELEBRATION_BURST_SPEED: f32 = 8.0;
    pub const SEASONING_PER_TICK: usize = 6;

    /// Colors (0xRRGGBB)
    pub const GOLD: u32 = 0xFF_D7_00;
    pub const CHILI: u32 = 0xE3_42_34;
}

/// Sanitize a requested viewport.
///
/// Real sizes pass through unchanged, however small. Non-finite or
/// non-positive dimensions fall back to the minimum.
#[inline]
pub fn clamp_viewport(width: f32, height: f32) -> glam::Vec2 {
    use consts::{MIN_VIEWPORT_HEIGHT, MIN_VIEWPORT_WIDTH};
    let usable = |v: f32| v.is_finite() && v > 0.0;
    let w = if usable(width) { width } else { MIN_VIEWPORT_WIDTH };
    let h = if usable(height) { height } else { MIN_VIEWPORT_HEIGHT };
    glam::Vec2::new(w, h)
}

/// Deterministic helpers shared by unit tests
#[cfg(test)]
pub(crate) mod testkit {
    use rand::RngCore;

    /// Yields all-ones words, so `random::<f64>()` is always just below 1.0
    /// and only a saturated charge can win
    pub struct NeverLucky;

    impl RngCore for NeverLucky {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0xFF);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_viewport() {
        assert_eq!(clamp_viewport(800.0, 600.0), glam::Vec2::new(800.0, 600.0));
        assert_eq!(clamp_viewport(0.0, -5.0), glam::Vec2::new(320.0, 240.0));
        assert_eq!(clamp_viewport(f32::NAN, f32::INFINITY), glam::Vec2::new(320.0, 240.0));
    }

    #[test]
    fn test_small_viewport_kept() {
        assert_eq!(clamp_viewport(200.0, 150.0), glam::Vec2::new(200.0, 150.0));
        assert_eq!(clamp_viewport(200.0, 0.0), glam::Vec2::new(200.0, 240.0));
    }
}
