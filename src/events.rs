//! Events raised to the presentation layer
//!
//! The ritual queues these as it runs; the presentation layer drains them
//! once per frame and maps them to animations, toasts and sounds.

use glam::Vec2;
use serde::Serialize;

use crate::content::AchievementDef;
use crate::ritual::{Phase, SeasonStage};

/// Achievement notification payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
}

impl Toast {
    /// Toast for a known definition
    pub fn from_def(def: &AchievementDef) -> Self {
        Self {
            id: def.id.clone(),
            title: def.title.clone(),
            description: def.description.clone(),
            icon: def.icon.clone(),
        }
    }

    /// Toast for an id missing from the content table
    pub fn bare(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            icon: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RitualEvent {
    PhaseChanged { phase: Phase },
    /// A toss round finished (delivered after the settle delay)
    RoundComplete { success: bool },
    AchievementUnlocked { toast: Toast },
    /// The toast for `id` timed out
    ToastDismissed { id: String },
    SeasonStage { stage: SeasonStage },
    /// Click rate crossed the crit threshold this charge session
    ChargeCrit,
    /// A charge interaction that did not win; `shake` requests feedback at `location`
    ChargeMiss { location: Vec2, power: u32, shake: bool },
    /// The winning charge interaction; the result follows after the reveal delay
    ChargeWon { power: u32 },
    /// Charge won and the result has been drawn
    ChargeSuccess { result: String },
}
