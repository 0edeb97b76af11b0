//! Cosmetic particle emitter
//!
//! Particles never feed back into gameplay. The emitter is ticked once per
//! frame alongside the toss simulation.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{CHILI, GOLD, SEASONING_PER_TICK};

/// How a particle ages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Landing/celebration burst
    Splash,
    /// Seasoning powder falling during the season phase
    Seasoning,
}

impl ParticleKind {
    fn decay(self) -> f32 {
        match self {
            ParticleKind::Splash => 0.02,
            ParticleKind::Seasoning => 0.015,
        }
    }

    fn gravity(self) -> f32 {
        match self {
            ParticleKind::Splash => 0.2,
            ParticleKind::Seasoning => 0.15,
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: u32,
    /// Starts at 1.0 (splash) or 1.2 (seasoning), removed at 0
    pub life: f32,
    pub kind: ParticleKind,
}

/// Owns and ages all live particles
#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    particles: Vec<Particle>,
    cap: usize,
}

impl Default for ParticleEmitter {
    fn default() -> Self {
        Self::new(crate::settings::QualityPreset::default().max_particles())
    }
}

impl ParticleEmitter {
    /// Emitter that never holds more than `cap` particles (0 disables particles)
    pub fn new(cap: usize) -> Self {
        Self {
            particles: Vec::with_capacity(cap.min(512)),
            cap,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
        self.particles.truncate(cap);
    }

    fn room(&self) -> usize {
        self.cap.saturating_sub(self.particles.len())
    }

    /// Radial splash: `count` particles flung out from `pos`, biased upward
    pub fn burst(&mut self, rng: &mut impl Rng, pos: Vec2, color: u32, count: usize, speed: f32) {
        for _ in 0..count.min(self.room()) {
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let v = rng.random::<f32>() * speed + 1.0;
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos() * v, angle.sin() * v - 2.0),
                radius: rng.random::<f32>() * 3.0 + 2.0,
                color,
                life: 1.0,
                kind: ParticleKind::Splash,
            });
        }
    }

    /// One tick worth of seasoning powder poured from above the zones
    pub fn sprinkle(&mut self, rng: &mut impl Rng, viewport: Vec2) {
        let spawn = Vec2::new(viewport.x / 2.0, viewport.y * 0.15 + 180.0);
        for _ in 0..SEASONING_PER_TICK.min(self.room()) {
            let color = if rng.random::<f32>() > 0.4 { CHILI } else { GOLD };
            self.particles.push(Particle {
                pos: spawn
                    + Vec2::new(
                        (rng.random::<f32>() - 0.5) * 160.0,
                        rng.random::<f32>() * 10.0,
                    ),
                vel: Vec2::new(rng.random::<f32>() * 2.0 - 1.0, rng.random::<f32>() * 5.0 + 5.0),
                radius: rng.random::<f32>() * 2.0 + 1.5,
                color,
                life: 1.2,
                kind: ParticleKind::Seasoning,
            });
        }
    }

    /// Age and move every particle, dropping dead or off-screen ones
    pub fn tick(&mut self, viewport: Vec2) {
        for p in &mut self.particles {
            p.life -= p.kind.decay();
            p.pos += p.vel;
            p.vel.y += p.kind.gravity();
            if p.kind == ParticleKind::Seasoning {
                // Turbulence
                p.pos.x += (p.pos.y * 0.05).sin() * 0.5;
            }
        }
        self.particles.retain(|p| {
            p.life > 0.0
                && p.pos.y - p.radius <= viewport.y
                && p.pos.x + p.radius >= 0.0
                && p.pos.x - p.radius <= viewport.x
        });
    }
}
