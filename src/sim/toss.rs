//! Toss round simulation
//!
//! Two objects are thrown from above the viewport and fall under a fixed
//! per-tick gravity. A round succeeds when they come to rest in different
//! zones. The simulator owns its objects and zones exclusively; callers only
//! see them through read-only accessors.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::collision::{Landing, check_landing};
use super::particles::ParticleEmitter;
use super::state::{RoundState, TossObject, Zone, layout_zones, park_positions, round_succeeded};
use crate::clamp_viewport;
use crate::consts::*;

/// Objects and zones of an initialized toss field
#[derive(Debug, Clone)]
struct Field {
    zones: [Zone; 2],
    objects: [TossObject; 2],
}

/// Owns the toss objects and landing zones and advances them each tick
#[derive(Debug, Clone)]
pub struct TossSimulator {
    viewport: Vec2,
    field: Option<Field>,
    round: RoundState,
}

impl Default for TossSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl TossSimulator {
    pub fn new() -> Self {
        Self {
            viewport: clamp_viewport(0.0, 0.0),
            field: None,
            round: RoundState::Idle,
        }
    }

    /// Lay out zones for the viewport and park two hidden objects above it
    pub fn initialize(&mut self, width: f32, height: f32) {
        self.viewport = clamp_viewport(width, height);
        let parks = park_positions(self.viewport);
        self.field = Some(Field {
            zones: layout_zones(self.viewport),
            objects: [TossObject::parked(parks[0]), TossObject::parked(parks[1])],
        });
        self.round = RoundState::Idle;
        log::debug!(
            "Toss field initialized for {}x{}",
            self.viewport.x,
            self.viewport.y
        );
    }

    /// Re-derive zones for a new viewport.
    ///
    /// Idle objects are re-parked for the new width; objects in flight or at
    /// rest in a zone keep their position.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = clamp_viewport(width, height);
        let idle = self.round == RoundState::Idle;
        if let Some(field) = &mut self.field {
            field.zones = layout_zones(self.viewport);
            if idle {
                let parks = park_positions(self.viewport);
                for (obj, park) in field.objects.iter_mut().zip(parks) {
                    *obj = TossObject::parked(park);
                }
            }
        }
    }

    /// Discard objects and zones
    pub fn clear(&mut self) {
        self.field = None;
        self.round = RoundState::Idle;
    }

    pub fn is_initialized(&self) -> bool {
        self.field.is_some()
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn zones(&self) -> &[Zone] {
        self.field.as_ref().map(|f| f.zones.as_slice()).unwrap_or(&[])
    }

    pub fn objects(&self) -> &[TossObject] {
        self.field.as_ref().map(|f| f.objects.as_slice()).unwrap_or(&[])
    }

    pub fn round(&self) -> RoundState {
        self.round
    }

    /// A launch is accepted only when no round is in flight or resolving
    pub fn can_launch(&self) -> bool {
        self.field.is_some() && self.round == RoundState::Idle
    }

    /// Throw both objects. Returns false if a round is already in progress.
    pub fn launch(&mut self, rng: &mut impl Rng, particles: &mut ParticleEmitter) -> bool {
        if !self.can_launch() {
            return false;
        }
        let Some(field) = &mut self.field else {
            return false;
        };

        let cx = self.viewport.x / 2.0;
        for obj in &mut field.objects {
            let side = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
            let offset = side * rng.random::<f32>() * LAUNCH_MAX_OFFSET;
            obj.pos = Vec2::new(cx + offset, LAUNCH_Y);
            obj.vel = Vec2::new(
                rng.random_range(-LAUNCH_MAX_VX..LAUNCH_MAX_VX),
                rng.random::<f32>() * LAUNCH_MAX_VY,
            );
            obj.angle = rng.random::<f32>() * TAU;
            obj.spin = rng.random_range(-LAUNCH_MAX_SPIN..LAUNCH_MAX_SPIN);
            obj.zone_index = None;
            obj.visible = true;
            obj.resting = false;
        }
        particles.clear();
        self.round = RoundState::Active;
        true
    }

    /// Advance one tick.
    ///
    /// Returns `Some(success)` on the tick where both objects came to rest,
    /// and `None` on every other tick.
    pub fn tick(&mut self, rng: &mut impl Rng, particles: &mut ParticleEmitter) -> Option<bool> {
        if self.round != RoundState::Active {
            return None;
        }
        let field = self.field.as_mut()?;
        let Field { zones, objects } = field;

        for obj in objects.iter_mut() {
            if obj.resting || !obj.visible {
                continue;
            }
            obj.vel.y += GRAVITY;
            obj.pos += obj.vel;
            obj.angle = (obj.angle + obj.spin).rem_euclid(TAU);

            match check_landing(obj.pos, zones.as_slice(), self.viewport.y) {
                Landing::Zone(index) => {
                    let zone = &zones[index];
                    obj.settle(index, zone);
                    particles.burst(rng, obj.pos, zone.color, LANDING_BURST, LANDING_BURST_SPEED);
                }
                Landing::Missed => obj.resting = true,
                Landing::Airborne => {}
            }
        }

        if !objects.iter().all(|o| o.resting) {
            return None;
        }

        let success = round_succeeded(objects);
        if success {
            for obj in objects.iter().filter(|o| o.landed()) {
                particles.burst(rng, obj.pos, GOLD, CELEBRATION_BURST, CELEBRATION_BURST_SPEED);
            }
        }
        log::debug!(
            "Toss resolved: zones {:?}/{:?}, success={}",
            objects[0].zone_index,
            objects[1].zone_index,
            success
        );
        self.round = RoundState::Resolving { success };
        Some(success)
    }

    /// Close a resolved round once its settle delay has passed.
    ///
    /// A failed round hides both objects and re-arms launching; a successful
    /// round stays resolved so the landed objects remain on screen.
    pub fn finish_round(&mut self, success: bool) {
        if !matches!(self.round, RoundState::Resolving { .. }) {
            return;
        }
        if success {
            return;
        }
        if let Some(field) = &mut self.field {
            for obj in &mut field.objects {
                obj.visible = false;
            }
        }
        self.round = RoundState::Idle;
    }

    /// Direct access for tests that stage exact trajectories
    #[cfg(test)]
    pub(crate) fn objects_mut(&mut self) -> &mut [TossObject] {
        self.field.as_mut().map(|f| f.objects.as_mut_slice()).unwrap_or(&mut [])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Drop `objects[i]` straight down onto `targets[i]` (None = far outside any zone)
    fn stage(sim: &mut TossSimulator, targets: [Option<usize>; 2]) {
        let zone_centers: Vec<Vec2> = sim.zones().iter().map(|z| z.rect.center()).collect();
        let height = sim.viewport().y;
        for (obj, target) in sim.objects_mut().iter_mut().zip(targets) {
            obj.visible = true;
            obj.resting = false;
            obj.zone_index = None;
            obj.spin = 0.0;
            match target {
                Some(i) => {
                    obj.pos = zone_centers[i] - Vec2::new(0.0, 1.0);
                    obj.vel = Vec2::ZERO;
                }
                None => {
                    obj.pos = Vec2::new(5.0, height + MISS_DEPTH - 1.0);
                    obj.vel = Vec2::new(0.0, 5.0);
                }
            }
        }
    }

    fn launched(seed: u64) -> (TossSimulator, Pcg32, ParticleEmitter) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut particles = ParticleEmitter::new(1000);
        let mut sim = TossSimulator::new();
        sim.initialize(800.0, 600.0);
        assert!(sim.launch(&mut rng, &mut particles));
        (sim, rng, particles)
    }

    fn run_until_resolved(
        sim: &mut TossSimulator,
        rng: &mut Pcg32,
        particles: &mut ParticleEmitter,
    ) -> bool {
        for _ in 0..10_000 {
            if let Some(success) = sim.tick(rng, particles) {
                return success;
            }
        }
        panic!("toss never resolved");
    }

    #[test]
    fn test_initialize_parks_hidden_objects() {
        let mut sim = TossSimulator::new();
        assert!(!sim.is_initialized());
        assert!(sim.zones().is_empty());

        sim.initialize(800.0, 600.0);
        assert_eq!(sim.zones().len(), 2);
        assert_eq!(sim.objects().len(), 2);
        for obj in sim.objects() {
            assert!(obj.resting);
            assert!(!obj.visible);
            assert!(obj.zone_index.is_none());
            assert!(obj.pos.y < 0.0);
        }
        assert!(sim.can_launch());
    }

    #[test]
    fn test_initialize_clamps_bad_viewport() {
        let mut sim = TossSimulator::new();
        sim.initialize(-10.0, 0.0);
        assert_eq!(sim.viewport(), Vec2::new(MIN_VIEWPORT_WIDTH, MIN_VIEWPORT_HEIGHT));
        assert!(sim.zones().iter().all(|z| z.rect.width > 0.0));
    }

    #[test]
    fn test_launch_sets_objects_in_motion() {
        let (sim, _, particles) = launched(7);
        assert_eq!(sim.round(), RoundState::Active);
        assert!(particles.is_empty());
        for obj in sim.objects() {
            assert!(obj.visible);
            assert!(!obj.resting);
            assert!((obj.pos.x - 400.0).abs() <= LAUNCH_MAX_OFFSET);
            assert_eq!(obj.pos.y, LAUNCH_Y);
            assert!(obj.vel.y >= 0.0 && obj.vel.y < LAUNCH_MAX_VY);
            assert!(obj.vel.x.abs() <= LAUNCH_MAX_VX);
            assert!(obj.spin.abs() <= LAUNCH_MAX_SPIN);
        }
    }

    #[test]
    fn test_launch_refused_while_in_flight_or_resolving() {
        let (mut sim, mut rng, mut particles) = launched(8);
        assert!(!sim.launch(&mut rng, &mut particles));

        run_until_resolved(&mut sim, &mut rng, &mut particles);
        assert!(matches!(sim.round(), RoundState::Resolving { .. }));
        assert!(!sim.launch(&mut rng, &mut particles));
    }

    #[test]
    fn test_uninitialized_launch_refused() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut particles = ParticleEmitter::new(10);
        let mut sim = TossSimulator::new();
        assert!(!sim.launch(&mut rng, &mut particles));
        assert_eq!(sim.tick(&mut rng, &mut particles), None);
    }

    #[test]
    fn test_gravity_integrates_each_tick() {
        let (mut sim, mut rng, mut particles) = launched(9);
        let before: Vec<(Vec2, Vec2)> = sim.objects().iter().map(|o| (o.pos, o.vel)).collect();
        sim.tick(&mut rng, &mut particles);
        for (obj, (pos, vel)) in sim.objects().iter().zip(before) {
            assert!((obj.vel.y - (vel.y + GRAVITY)).abs() < 1e-5);
            assert!((obj.pos - (pos + obj.vel)).length() < 1e-4);
        }
    }

    #[test]
    fn test_different_zones_succeeds() {
        let (mut sim, mut rng, mut particles) = launched(10);
        stage(&mut sim, [Some(0), Some(1)]);
        assert!(run_until_resolved(&mut sim, &mut rng, &mut particles));
        assert_eq!(sim.objects()[0].zone_index, Some(0));
        assert_eq!(sim.objects()[1].zone_index, Some(1));
        assert_eq!(sim.round(), RoundState::Resolving { success: true });
        // Two landing splashes plus two celebration bursts
        assert_eq!(particles.len(), 2 * LANDING_BURST + 2 * CELEBRATION_BURST);
    }

    #[test]
    fn test_same_zone_fails() {
        let (mut sim, mut rng, mut particles) = launched(11);
        stage(&mut sim, [Some(0), Some(0)]);
        assert!(!run_until_resolved(&mut sim, &mut rng, &mut particles));
        assert_eq!(particles.len(), 2 * LANDING_BURST);
    }

    #[test]
    fn test_one_missed_fails() {
        let (mut sim, mut rng, mut particles) = launched(12);
        stage(&mut sim, [None, Some(1)]);
        assert!(!run_until_resolved(&mut sim, &mut rng, &mut particles));
        let objs = sim.objects();
        assert!(objs[0].resting);
        assert_eq!(objs[0].zone_index, None);
        assert_eq!(objs[1].zone_index, Some(1));
    }

    #[test]
    fn test_resolution_reported_once() {
        let (mut sim, mut rng, mut particles) = launched(13);
        stage(&mut sim, [Some(0), Some(1)]);
        run_until_resolved(&mut sim, &mut rng, &mut particles);
        assert_eq!(sim.tick(&mut rng, &mut particles), None);
    }

    #[test]
    fn test_landed_object_rests_inside_zone() {
        let (mut sim, mut rng, mut particles) = launched(14);
        stage(&mut sim, [Some(0), Some(1)]);
        run_until_resolved(&mut sim, &mut rng, &mut particles);
        for obj in sim.objects() {
            let zone = &sim.zones()[obj.zone_index.unwrap()];
            assert_eq!(obj.pos.y, zone.rect.center().y);
            assert!(obj.pos.x >= zone.rect.x + ZONE_REST_MARGIN);
            assert!(obj.pos.x <= zone.rect.right() - ZONE_REST_MARGIN);
            assert_eq!(obj.vel, Vec2::ZERO);
        }
    }

    #[test]
    fn test_random_launches_always_resolve() {
        for seed in 0..50 {
            let (mut sim, mut rng, mut particles) = launched(seed);
            let success = run_until_resolved(&mut sim, &mut rng, &mut particles);
            let objs = sim.objects();
            assert!(objs.iter().all(|o| o.resting));
            assert_eq!(
                success,
                objs[0].zone_index.is_some()
                    && objs[1].zone_index.is_some()
                    && objs[0].zone_index != objs[1].zone_index
            );
        }
    }

    #[test]
    fn test_failed_round_hides_and_rearms() {
        let (mut sim, mut rng, mut particles) = launched(15);
        stage(&mut sim, [Some(0), Some(0)]);
        run_until_resolved(&mut sim, &mut rng, &mut particles);
        sim.finish_round(false);
        assert!(sim.objects().iter().all(|o| !o.visible));
        assert!(sim.can_launch());
        assert!(sim.launch(&mut rng, &mut particles));
    }

    #[test]
    fn test_successful_round_stays_visible() {
        let (mut sim, mut rng, mut particles) = launched(16);
        stage(&mut sim, [Some(0), Some(1)]);
        run_until_resolved(&mut sim, &mut rng, &mut particles);
        sim.finish_round(true);
        assert!(sim.objects().iter().all(|o| o.visible));
        assert!(!sim.can_launch());
    }

    #[test]
    fn test_resize_reparks_idle_objects() {
        let mut sim = TossSimulator::new();
        sim.initialize(800.0, 600.0);
        sim.resize(1200.0, 900.0);
        assert_eq!(sim.zones()[0].rect.y, 900.0 * ZONE_TOP_FRACTION);
        assert_eq!(sim.objects()[0].pos.x, 600.0 - OBJECT_PARK_SPREAD);
    }

    #[test]
    fn test_resize_keeps_objects_in_flight() {
        let (mut sim, _, _) = launched(17);
        let before: Vec<Vec2> = sim.objects().iter().map(|o| o.pos).collect();
        sim.resize(1024.0, 768.0);
        let after: Vec<Vec2> = sim.objects().iter().map(|o| o.pos).collect();
        assert_eq!(before, after);
        assert_eq!(sim.round(), RoundState::Active);
    }

    #[test]
    fn test_clear_discards_field() {
        let (mut sim, _, _) = launched(18);
        sim.clear();
        assert!(sim.objects().is_empty());
        assert!(sim.zones().is_empty());
        assert_eq!(sim.round(), RoundState::Idle);
    }
}
