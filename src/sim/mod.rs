//! Per-tick simulation module
//!
//! Gameplay logic that runs inside the frame loop:
//! - Fixed per-tick physics (no wall-clock dt)
//! - RNG passed in by the caller
//! - Each simulator exclusively owns its state
//! - No rendering or platform dependencies

pub mod collision;
pub mod particles;
pub mod power;
pub mod rect;
pub mod state;
pub mod toss;

pub use collision::{Landing, check_landing};
pub use particles::{Particle, ParticleEmitter, ParticleKind};
pub use power::{InteractionOutcome, PowerAccumulator, Verdict};
pub use rect::Rect;
pub use state::{RoundState, TossObject, Zone, layout_zones, round_succeeded};
pub use toss::TossSimulator;
