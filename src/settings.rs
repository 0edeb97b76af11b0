//! Ritual settings and preferences
//!
//! Persisted in the key-value store under `settings`, separately from the ledger.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, load_json, save_json};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

/// Delays between ritual steps, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Both toss objects at rest -> round outcome delivered
    pub settle_ms: f64,
    /// Successful round delivered -> season phase
    pub success_transition_ms: f64,
    /// Season entered -> seasoning starts pouring
    pub sprinkle_at_ms: f64,
    /// Season entered -> proceed enabled
    pub season_total_ms: f64,
    /// Charge won -> result revealed
    pub reveal_ms: f64,
    /// Achievement toast lifetime
    pub toast_ms: f64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            settle_ms: 800.0,
            success_transition_ms: 1000.0,
            sprinkle_at_ms: 500.0,
            season_total_ms: 1500.0,
            reveal_ms: 1500.0,
            toast_ms: 3000.0,
        }
    }
}

/// Ritual settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Particle effects (landing splashes, seasoning)
    pub particles: bool,
    /// Shake feedback on missed charge interactions
    pub screen_shake: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,

    pub timings: Timings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            screen_shake: true,
            reduced_motion: false,
            timings: Timings::default(),
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "settings";

    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        log::info!("Quality preset: {}", preset.as_str());
        self.quality = preset;

        // Low preset drops the shake effect for performance
        if preset == QualityPreset::Low {
            self.screen_shake = false;
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Load settings, falling back to defaults on any storage problem
    pub fn load(store: &impl KeyValueStore) -> Self {
        match load_json(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to load settings, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged and otherwise ignored
    pub fn save(&self, store: &mut impl KeyValueStore) {
        match save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::error!("Failed to save settings: {e}"),
        }
    }
}
