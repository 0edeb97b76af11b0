//! Achievement and collection ledger
//!
//! Persisted to the key-value store under `achievements` and `collection`.
//! Both only ever grow: unlocking an achievement or recording a result twice
//! is a no-op.

use std::collections::HashSet;
use std::sync::Arc;

use crate::content::{ContentTables, ids};
use crate::events::Toast;
use crate::persistence::{KeyValueStore, load_json, save_json};

/// Top-tier results needed for the collection achievement
pub const COLLECT_TARGET: usize = 5;

/// Failed tosses needed for the persistence achievement
pub const FAIL_TARGET: u32 = 10;

/// Outcome of recording a drawn result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    /// False if the result was already in the collection
    pub is_new: bool,
    /// Achievement unlocked as a consequence, if any
    pub unlocked: Option<Toast>,
}

/// Persistent achievements and collected results
#[derive(Debug)]
pub struct AchievementLedger<S: KeyValueStore> {
    store: S,
    content: Arc<ContentTables>,
    unlocked: HashSet<String>,
    /// Persisted form of `unlocked`, in unlock order
    unlock_order: Vec<String>,
    collection: Vec<String>,
    collected: HashSet<String>,
    top_tier_count: usize,
}

impl<S: KeyValueStore> AchievementLedger<S> {
    /// Storage keys
    pub const ACHIEVEMENTS_KEY: &'static str = "achievements";
    pub const COLLECTION_KEY: &'static str = "collection";

    /// Load both ledgers. Missing or unreadable data starts empty.
    pub fn load(store: S, content: Arc<ContentTables>) -> Self {
        let unlock_order = dedup(read_list(&store, Self::ACHIEVEMENTS_KEY));
        let collection = dedup(read_list(&store, Self::COLLECTION_KEY));
        let top_tier_count = collection.iter().filter(|r| content.is_top_tier(r)).count();
        log::info!(
            "Ledger loaded: {} achievements, {} collected",
            unlock_order.len(),
            collection.len()
        );

        Self {
            store,
            content,
            unlocked: unlock_order.iter().cloned().collect(),
            unlock_order,
            collected: collection.iter().cloned().collect(),
            collection,
            top_tier_count,
        }
    }

    /// Unlock an achievement. Returns the toast only on the first unlock.
    pub fn unlock(&mut self, id: &str) -> Option<Toast> {
        if !self.unlocked.insert(id.to_string()) {
            return None;
        }
        self.unlock_order.push(id.to_string());
        self.persist_achievements();

        let toast = match self.content.achievement(id) {
            Some(def) => Toast::from_def(def),
            None => {
                log::warn!("Unlocked achievement {id} has no definition");
                Toast::bare(id)
            }
        };
        log::info!("Achievement unlocked: {} ({})", toast.title, id);
        Some(toast)
    }

    /// Add a drawn result to the collection and evaluate collection triggers
    pub fn record_result(&mut self, text: &str) -> Recorded {
        if !self.collected.insert(text.to_string()) {
            return Recorded {
                is_new: false,
                unlocked: None,
            };
        }
        self.collection.push(text.to_string());
        self.persist_collection();

        if self.content.is_top_tier(text) {
            self.top_tier_count += 1;
        }
        let unlocked = if self.top_tier_count >= COLLECT_TARGET {
            self.unlock(ids::COLLECT_5)
        } else {
            None
        };
        Recorded {
            is_new: true,
            unlocked,
        }
    }

    /// Report the current failure count of this round-cycle
    pub fn record_failure(&mut self, fail_count: u32) -> Option<Toast> {
        if fail_count >= FAIL_TARGET {
            self.unlock(ids::FAIL_10)
        } else {
            None
        }
    }

    /// Report a crit during a charge
    pub fn record_crit(&mut self) -> Option<Toast> {
        self.unlock(ids::CPS_8)
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// Unlocked ids in unlock order
    pub fn unlocked_ids(&self) -> &[String] {
        &self.unlock_order
    }

    /// Collected results in first-seen order
    pub fn collection(&self) -> &[String] {
        &self.collection
    }

    pub fn is_collected(&self, text: &str) -> bool {
        self.collected.contains(text)
    }

    /// Distinct top-tier results collected
    pub fn top_tier_count(&self) -> usize {
        self.top_tier_count
    }

    /// (unlocked, total) over the achievements defined in the content table
    pub fn progress(&self) -> (usize, usize) {
        let defs = self.content.achievements();
        let unlocked = defs.iter().filter(|d| self.unlocked.contains(&d.id)).count();
        (unlocked, defs.len())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Shared store access for other persisted documents (settings)
    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn persist_achievements(&mut self) {
        if let Err(e) = save_json(&mut self.store, Self::ACHIEVEMENTS_KEY, &self.unlock_order) {
            log::error!("Failed to save achievements: {e}");
        }
    }

    fn persist_collection(&mut self) {
        if let Err(e) = save_json(&mut self.store, Self::COLLECTION_KEY, &self.collection) {
            log::error!("Failed to save collection: {e}");
        }
    }
}

fn read_list(store: &impl KeyValueStore, key: &str) -> Vec<String> {
    match load_json::<Vec<String>>(store, key) {
        Ok(list) => list.unwrap_or_default(),
        Err(e) => {
            log::warn!("Failed to load {key}, starting empty: {e}");
            Vec::new()
        }
    }
}

/// Keep the first occurrence of each entry
fn dedup(list: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(list.len());
    list.into_iter().filter(|s| seen.insert(s.clone())).collect()
}
