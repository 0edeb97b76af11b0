//! Fry Fortune entry point
//!
//! On the web the page drives `WebRitual` directly. Natively this runs one
//! ritual headless in demo mode: the driver launches, proceeds and clicks on
//! its own, logs every event, and prints the revealed fortune.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::PathBuf;
    use std::sync::Arc;

    use fry_fortune::consts::POWER_MAX;
    use fry_fortune::platform::init_logging;
    use fry_fortune::{
        ContentTables, FileStore, KeyValueStore, MemoryStore, Phase, Ritual, RitualEvent, Settings,
    };
    use glam::Vec2;

    /// Simulated frame length
    const FRAME_MS: f64 = 16.0;
    /// Gap between auto-clicks during Charge
    const CLICK_MS: f64 = 60.0;
    /// Give up after this much simulated time
    const MAX_SIM_MS: f64 = 10.0 * 60.0 * 1000.0;
    const VIEWPORT: (f32, f32) = (800.0, 600.0);

    fn data_dir() -> PathBuf {
        std::env::var_os("FRY_FORTUNE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".fry-fortune"))
    }

    fn open_store() -> Box<dyn KeyValueStore> {
        let dir = data_dir();
        match FileStore::open(dir.clone()) {
            Ok(store) => {
                log::info!("Saving progress to {}", dir.display());
                Box::new(store)
            }
            Err(e) => {
                log::warn!("{e}; progress will not be saved");
                Box::new(MemoryStore::new())
            }
        }
    }

    fn log_event(event: &RitualEvent) {
        match event {
            RitualEvent::PhaseChanged { phase } => log::info!("-> {}", phase.as_str()),
            RitualEvent::RoundComplete { success } => {
                log::info!("Round complete: {}", if *success { "split!" } else { "miss" })
            }
            RitualEvent::AchievementUnlocked { toast } => {
                log::info!("Achievement: {} {} - {}", toast.icon, toast.title, toast.description)
            }
            RitualEvent::ChargeCrit => log::info!("Crit!"),
            RitualEvent::ChargeWon { power } => log::info!("Charge won at {power}/{POWER_MAX}"),
            RitualEvent::ChargeMiss { power, .. } => log::debug!("Charge {power}/{POWER_MAX}"),
            other => log::debug!("{other:?}"),
        }
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        init_logging();

        let petition = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
        let petition = if petition.trim().is_empty() {
            "What does today hold?".to_string()
        } else {
            petition
        };

        let content = Arc::new(ContentTables::builtin()?);
        let store = open_store();
        let settings = Settings::load(&store);
        let mut ritual = Ritual::new(store, content, settings, VIEWPORT.0, VIEWPORT.1);

        log::info!("Petition: {petition}");
        ritual.submit_petition(&petition);

        let click_at = Vec2::new(VIEWPORT.0 / 2.0, VIEWPORT.1 / 2.0);
        let mut now = 0.0;
        let mut next_click = 0.0;
        while ritual.phase() != Phase::Result {
            if now > MAX_SIM_MS {
                return Err("ritual did not finish".into());
            }
            match ritual.phase() {
                Phase::Toss if ritual.can_launch() => {
                    ritual.request_launch();
                }
                Phase::Season if ritual.proceed_enabled() => {
                    ritual.request_proceed();
                }
                Phase::Charge if now >= next_click => {
                    ritual.charge_interaction(now, click_at);
                    next_click = now + CLICK_MS;
                }
                _ => {}
            }

            now += FRAME_MS;
            ritual.tick(now);
            for event in ritual.drain_events() {
                log_event(&event);
            }
        }

        let result = ritual.result().unwrap_or_default();
        let parts = ritual.content().split(result);
        println!();
        println!("  {}", ritual.petition());
        match parts.tier {
            Some(tier) => println!("  [{tier}] {}", parts.body),
            None => println!("  {}", parts.body),
        }
        println!();

        let ledger = ritual.ledger();
        let (unlocked, total) = ledger.progress();
        println!(
            "  {} fortunes collected, {unlocked}/{total} achievements, {} tosses failed",
            ledger.collection().len(),
            ritual.fail_count()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = demo::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The page constructs `WebRitual`; nothing to do here
}
