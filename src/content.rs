//! Immutable content tables: drawable results and achievement definitions
//!
//! Loaded once at startup and shared by reference (`Arc<ContentTables>`).
//! Result strings may carry a tier tag: `<tag><separator><body>`.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Content shipped with the crate
const BUILTIN: &str = include_str!("../content/fortunes.json");

/// Achievement ids the ledger unlocks on its own
pub mod ids {
    /// Ten failed tosses before a restart
    pub const FAIL_10: &str = "FAIL_10";
    /// Click rate above the crit threshold during a charge
    pub const CPS_8: &str = "CPS_8";
    /// Five distinct top-tier results collected
    pub const COLLECT_5: &str = "COLLECT_5";
}

/// Display data for one achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementDef {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("content document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("content has no results to draw from")]
    NoResults,

    #[error("content separator must not be empty")]
    EmptySeparator,

    #[error("achievement \"{0}\" is defined twice")]
    DuplicateAchievement(String),
}

/// A result string split into its tier tag and body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultParts<'a> {
    pub tier: Option<&'a str>,
    pub body: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct RawContent {
    top_tier_tag: String,
    separator: String,
    results: Vec<String>,
    #[serde(default)]
    achievements: Vec<AchievementDef>,
}

/// Result and achievement tables
#[derive(Debug, Clone)]
pub struct ContentTables {
    top_tier_tag: String,
    separator: String,
    results: Vec<String>,
    achievements: Vec<AchievementDef>,
    by_id: HashMap<String, usize>,
}

impl ContentTables {
    /// The embedded default tables
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_json(BUILTIN)
    }

    /// Parse and validate a content document
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let raw: RawContent = serde_json::from_str(json)?;
        if raw.results.is_empty() {
            return Err(ContentError::NoResults);
        }
        if raw.separator.is_empty() {
            return Err(ContentError::EmptySeparator);
        }

        let mut by_id = HashMap::with_capacity(raw.achievements.len());
        for (i, def) in raw.achievements.iter().enumerate() {
            if by_id.insert(def.id.clone(), i).is_some() {
                return Err(ContentError::DuplicateAchievement(def.id.clone()));
            }
        }

        Ok(Self {
            top_tier_tag: raw.top_tier_tag,
            separator: raw.separator,
            results: raw.results,
            achievements: raw.achievements,
            by_id,
        })
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn achievements(&self) -> &[AchievementDef] {
        &self.achievements
    }

    pub fn achievement(&self, id: &str) -> Option<&AchievementDef> {
        self.by_id.get(id).map(|&i| &self.achievements[i])
    }

    pub fn top_tier_tag(&self) -> &str {
        &self.top_tier_tag
    }

    /// Split a result into tier tag and body. Untagged text has no tier.
    pub fn split<'a>(&self, text: &'a str) -> ResultParts<'a> {
        match text.split_once(self.separator.as_str()) {
            Some((tier, body)) => ResultParts {
                tier: Some(tier),
                body,
            },
            None => ResultParts {
                tier: None,
                body: text,
            },
        }
    }

    /// Whether a result carries the top-tier tag
    pub fn is_top_tier(&self, text: &str) -> bool {
        self.split(text).tier == Some(self.top_tier_tag.as_str())
    }

    /// Draw one result uniformly at random
    pub fn draw(&self, rng: &mut impl Rng) -> &str {
        // Never empty: from_json rejects an empty table
        self.results
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }
}
