//! Ritual orchestrator
//!
//! Drives one session through Petition -> Toss -> Season -> Charge -> Result
//! and back to Petition on restart. Owns the simulators, the achievement
//! ledger and the task queue; the presentation layer feeds it input and
//! frame ticks and drains [`RitualEvent`]s.
//!
//! All delayed transitions go through the [`Scheduler`]. A task is bound to
//! the session it was scheduled in and, where it matters, to the phase that
//! must still be current when it fires, so a restart never lets an old
//! timer act on the new session.

use std::sync::Arc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::clamp_viewport;
use crate::content::ContentTables;
use crate::events::{RitualEvent, Toast};
use crate::ledger::AchievementLedger;
use crate::persistence::KeyValueStore;
use crate::schedule::{Scheduler, Scope};
use crate::settings::Settings;
use crate::sim::{
    Particle, ParticleEmitter, PowerAccumulator, TossObject, TossSimulator, Verdict, Zone,
};

/// Ritual phases, in the order a session visits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Petition,
    Toss,
    Season,
    Charge,
    Result,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Petition => "petition",
            Phase::Toss => "toss",
            Phase::Season => "season",
            Phase::Charge => "charge",
            Phase::Result => "result",
        }
    }
}

/// Sub-steps of the Season phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonStage {
    /// Objects shown in their zones, nothing poured yet
    Enter,
    /// Seasoning particles pouring
    Sprinkle,
    /// Pouring done; proceeding to Charge is allowed
    Idle,
}

/// Borrowed snapshot of everything the presentation layer draws
#[derive(Debug, Serialize)]
pub struct RitualView<'a> {
    pub phase: Phase,
    pub season_stage: SeasonStage,
    pub power: u32,
    pub fail_count: u32,
    pub can_launch: bool,
    pub proceed_enabled: bool,
    /// Charge won; the result is revealed after the reveal delay
    pub charge_won: bool,
    pub zones: &'a [Zone],
    pub objects: &'a [TossObject],
    pub particles: &'a [Particle],
    pub toast: Option<&'a Toast>,
    pub result: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
enum TaskKind {
    RoundComplete { success: bool },
    EnterSeason,
    Season(SeasonStage),
    Reveal,
    DismissToast { id: String },
}

#[derive(Debug, Clone)]
struct Task {
    /// Phase that must still be current when the task fires
    phase: Option<Phase>,
    kind: TaskKind,
}

/// One fortune session and everything it owns
#[derive(Debug)]
pub struct Ritual<S: KeyValueStore, R: Rng = Pcg32> {
    phase: Phase,
    petition: String,
    result: Option<String>,
    /// Failed tosses since the last restart
    fail_count: u32,
    season_stage: SeasonStage,
    /// Set between a successful round and the Season transition
    launch_suppressed: bool,
    toast: Option<Toast>,

    now_ms: f64,
    viewport: Vec2,

    toss: TossSimulator,
    power: PowerAccumulator,
    particles: ParticleEmitter,
    ledger: AchievementLedger<S>,
    content: Arc<ContentTables>,
    settings: Settings,
    scheduler: Scheduler<Task>,
    rng: R,

    events: Vec<RitualEvent>,
}

impl<S: KeyValueStore> Ritual<S> {
    /// Create a ritual seeded from the thread RNG
    pub fn new(
        store: S,
        content: Arc<ContentTables>,
        settings: Settings,
        width: f32,
        height: f32,
    ) -> Self {
        Self::with_seed(store, content, settings, width, height, rand::random())
    }

    /// Create a ritual with a reproducible RNG
    pub fn with_seed(
        store: S,
        content: Arc<ContentTables>,
        settings: Settings,
        width: f32,
        height: f32,
        seed: u64,
    ) -> Self {
        Self::with_rng(store, content, settings, width, height, Pcg32::seed_from_u64(seed))
    }
}

impl<S: KeyValueStore, R: Rng> Ritual<S, R> {
    pub fn with_rng(
        store: S,
        content: Arc<ContentTables>,
        settings: Settings,
        width: f32,
        height: f32,
        rng: R,
    ) -> Self {
        let ledger = AchievementLedger::load(store, content.clone());
        Self {
            phase: Phase::Petition,
            petition: String::new(),
            result: None,
            fail_count: 0,
            season_stage: SeasonStage::Enter,
            launch_suppressed: false,
            toast: None,
            now_ms: 0.0,
            viewport: clamp_viewport(width, height),
            toss: TossSimulator::new(),
            power: PowerAccumulator::new(),
            particles: ParticleEmitter::new(settings.max_particles()),
            ledger,
            content,
            settings,
            scheduler: Scheduler::new(),
            rng,
            events: Vec::new(),
        }
    }

    // === Input ===

    /// Submit the petition text and start tossing. Blank text is rejected.
    pub fn submit_petition(&mut self, text: &str) -> bool {
        if self.phase != Phase::Petition || text.trim().is_empty() {
            return false;
        }
        self.petition = text.to_string();
        self.toss.initialize(self.viewport.x, self.viewport.y);
        self.set_phase(Phase::Toss);
        true
    }

    /// Throw the toss objects
    pub fn request_launch(&mut self) -> bool {
        if self.phase != Phase::Toss || self.launch_suppressed {
            return false;
        }
        let launched = self.toss.launch(&mut self.rng, &mut self.particles);
        if launched {
            log::debug!("Toss launched");
        }
        launched
    }

    /// Leave the Season phase once seasoning has finished
    pub fn request_proceed(&mut self) -> bool {
        if !self.proceed_enabled() {
            return false;
        }
        self.toss.clear();
        self.particles.clear();
        self.power.reset();
        self.set_phase(Phase::Charge);
        true
    }

    /// One charge interaction; `location` is where feedback should appear.
    /// Returns false if the interaction was ignored.
    ///
    /// `timestamp_ms` only feeds the click-rate window and may come from any
    /// clock (e.g. `Date.now()`) as long as it is consistent across
    /// interactions. Delays started here count from the last [`tick`] time.
    ///
    /// [`tick`]: Self::tick
    pub fn charge_interaction(&mut self, timestamp_ms: f64, location: Vec2) -> bool {
        if self.phase != Phase::Charge {
            return false;
        }
        let Some(outcome) = self
            .power
            .register_interaction(timestamp_ms, location, &mut self.rng)
        else {
            return false;
        };

        if outcome.crit_unlocked {
            log::info!("Charge crit at {} interactions/s", outcome.rate);
            self.events.push(RitualEvent::ChargeCrit);
            if let Some(toast) = self.ledger.record_crit() {
                self.show_toast(toast);
            }
        }

        match outcome.verdict {
            Verdict::Success => {
                log::info!("Charge succeeded at power {}", outcome.power);
                self.events.push(RitualEvent::ChargeWon {
                    power: outcome.power,
                });
                self.schedule(
                    self.settings.timings.reveal_ms,
                    Some(Phase::Charge),
                    TaskKind::Reveal,
                );
            }
            Verdict::Miss { location } => {
                self.events.push(RitualEvent::ChargeMiss {
                    location,
                    power: outcome.power,
                    shake: self.settings.effective_screen_shake(),
                });
            }
        }
        true
    }

    /// Abandon the session and return to Petition.
    ///
    /// Pending session tasks are cancelled. Achievements and the collection
    /// are kept. Ignored while already at Petition.
    pub fn request_restart(&mut self) -> bool {
        if self.phase == Phase::Petition {
            return false;
        }
        let session = self.scheduler.advance_session();
        log::info!("Restarting ritual (session {session})");

        self.petition.clear();
        self.result = None;
        self.fail_count = 0;
        self.season_stage = SeasonStage::Enter;
        self.launch_suppressed = false;
        self.toss.clear();
        self.power.reset();
        self.particles.clear();
        self.set_phase(Phase::Petition);
        true
    }

    /// Viewport changed
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = clamp_viewport(width, height);
        if self.toss.is_initialized() {
            self.toss.resize(width, height);
        }
    }

    /// Replace and persist settings; the particle cap takes effect immediately
    pub fn set_settings(&mut self, settings: Settings) {
        self.particles.set_cap(settings.max_particles());
        settings.save(self.ledger.store_mut());
        self.settings = settings;
    }

    // === Frame ===

    /// Advance one frame. `now_ms` is the frame timestamp; time never runs
    /// backwards, so an earlier timestamp is treated as the latest one seen.
    pub fn tick(&mut self, now_ms: f64) {
        self.now_ms = self.now_ms.max(now_ms);

        match self.phase {
            Phase::Toss => {
                if let Some(success) = self.toss.tick(&mut self.rng, &mut self.particles) {
                    self.schedule(
                        self.settings.timings.settle_ms,
                        Some(Phase::Toss),
                        TaskKind::RoundComplete { success },
                    );
                }
            }
            Phase::Season if self.season_stage == SeasonStage::Sprinkle => {
                self.particles.sprinkle(&mut self.rng, self.viewport);
            }
            _ => {}
        }
        self.particles.tick(self.viewport);

        while let Some(task) = self.scheduler.pop_due(self.now_ms) {
            if task.phase.is_some_and(|p| p != self.phase) {
                log::debug!("Dropping {:?}: phase is now {:?}", task.kind, self.phase);
                continue;
            }
            self.run_task(task.kind);
        }
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<RitualEvent> {
        std::mem::take(&mut self.events)
    }

    // === Queries ===

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn petition(&self) -> &str {
        &self.petition
    }

    /// Result drawn this session, once revealed
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn fail_count(&self) -> u32 {
        self.fail_count
    }

    pub fn season_stage(&self) -> SeasonStage {
        self.season_stage
    }

    pub fn proceed_enabled(&self) -> bool {
        self.phase == Phase::Season && self.season_stage == SeasonStage::Idle
    }

    /// Charge succeeded and the reveal is pending
    pub fn charge_won(&self) -> bool {
        self.phase == Phase::Charge && self.power.is_finished()
    }

    pub fn can_launch(&self) -> bool {
        self.phase == Phase::Toss && !self.launch_suppressed && self.toss.can_launch()
    }

    /// Toast currently on screen
    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn toss(&self) -> &TossSimulator {
        &self.toss
    }

    pub fn power(&self) -> &PowerAccumulator {
        &self.power
    }

    pub fn particles(&self) -> &ParticleEmitter {
        &self.particles
    }

    pub fn ledger(&self) -> &AchievementLedger<S> {
        &self.ledger
    }

    pub fn content(&self) -> &ContentTables {
        &self.content
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn view(&self) -> RitualView<'_> {
        RitualView {
            phase: self.phase,
            season_stage: self.season_stage,
            power: self.power.power(),
            fail_count: self.fail_count,
            can_launch: self.can_launch(),
            proceed_enabled: self.proceed_enabled(),
            charge_won: self.charge_won(),
            zones: self.toss.zones(),
            objects: self.toss.objects(),
            particles: self.particles.particles(),
            toast: self.toast.as_ref(),
            result: self.result.as_deref(),
        }
    }

    // === Internals ===

    fn set_phase(&mut self, phase: Phase) {
        log::info!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.events.push(RitualEvent::PhaseChanged { phase });
    }

    fn schedule(&mut self, delay_ms: f64, phase: Option<Phase>, kind: TaskKind) {
        self.scheduler
            .schedule(self.now_ms + delay_ms, Scope::Session, Task { phase, kind });
    }

    fn show_toast(&mut self, toast: Toast) {
        self.scheduler.schedule(
            self.now_ms + self.settings.timings.toast_ms,
            Scope::Global,
            Task {
                phase: None,
                kind: TaskKind::DismissToast {
                    id: toast.id.clone(),
                },
            },
        );
        self.toast = Some(toast.clone());
        self.events.push(RitualEvent::AchievementUnlocked { toast });
    }

    fn run_task(&mut self, kind: TaskKind) {
        match kind {
            TaskKind::RoundComplete { success } => {
                self.toss.finish_round(success);
                self.events.push(RitualEvent::RoundComplete { success });
                if success {
                    self.launch_suppressed = true;
                    self.schedule(
                        self.settings.timings.success_transition_ms,
                        Some(Phase::Toss),
                        TaskKind::EnterSeason,
                    );
                } else {
                    self.fail_count += 1;
                    log::debug!("Toss failed ({} this session)", self.fail_count);
                    if let Some(toast) = self.ledger.record_failure(self.fail_count) {
                        self.show_toast(toast);
                    }
                }
            }
            TaskKind::EnterSeason => {
                self.launch_suppressed = false;
                self.season_stage = SeasonStage::Enter;
                self.set_phase(Phase::Season);
                self.events.push(RitualEvent::SeasonStage {
                    stage: SeasonStage::Enter,
                });
                let timings = self.settings.timings;
                self.schedule(
                    timings.sprinkle_at_ms,
                    Some(Phase::Season),
                    TaskKind::Season(SeasonStage::Sprinkle),
                );
                self.schedule(
                    timings.season_total_ms,
                    Some(Phase::Season),
                    TaskKind::Season(SeasonStage::Idle),
                );
            }
            TaskKind::Season(stage) => {
                self.season_stage = stage;
                self.events.push(RitualEvent::SeasonStage { stage });
            }
            TaskKind::Reveal => {
                let result = self.content.draw(&mut self.rng).to_string();
                let recorded = self.ledger.record_result(&result);
                log::info!("Revealed result (new: {}): {}", recorded.is_new, result);
                if let Some(toast) = recorded.unlocked {
                    self.show_toast(toast);
                }
                self.result = Some(result.clone());
                self.events.push(RitualEvent::ChargeSuccess { result });
                self.set_phase(Phase::Result);
            }
            TaskKind::DismissToast { id } => {
                if self.toast.as_ref().is_some_and(|t| t.id == id) {
                    self.toast = None;
                    self.events.push(RitualEvent::ToastDismissed { id });
                }
            }
        }
    }

    /// Direct access for tests that stage exact trajectories
    #[cfg(test)]
    pub(crate) fn toss_mut(&mut self) -> &mut TossSimulator {
        &mut self.toss
    }
}
