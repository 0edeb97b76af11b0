//! Browser bindings: LocalStorage backend and the JS-facing ritual handle

use std::sync::Arc;

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::content::ContentTables;
use crate::persistence::{KeyValueStore, MemoryStore, StorageError};
use crate::ritual::Ritual;
use crate::settings::{QualityPreset, Settings};

/// Key prefix so the ritual's documents don't collide with other pages on the origin
const KEY_PREFIX: &str = "fry_fortune_";

/// `window.localStorage` with prefixed keys
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StorageError::Unavailable("localStorage is not available".into()))?;
        Ok(Self { storage })
    }
}

fn js_error(e: JsValue) -> StorageError {
    StorageError::Unavailable(format!("{e:?}"))
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(&format!("{KEY_PREFIX}{key}"))
            .map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(&format!("{KEY_PREFIX}{key}"), value)
            .map_err(js_error)
    }
}

/// Ritual handle exported to JavaScript.
///
/// The page forwards input and `requestAnimationFrame` timestamps, then
/// drains events and reads the view as JSON each frame.
#[wasm_bindgen]
pub struct WebRitual {
    inner: Ritual<Box<dyn KeyValueStore>>,
}

#[wasm_bindgen]
impl WebRitual {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<WebRitual, JsValue> {
        super::init_logging();

        let content =
            ContentTables::builtin().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let store: Box<dyn KeyValueStore> = match LocalStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{e}; progress will not be saved");
                Box::new(MemoryStore::new())
            }
        };
        let settings = Settings::load(&store);
        let seed = js_sys::Date::now() as u64;
        log::info!("Fry Fortune ready ({width}x{height})");

        Ok(Self {
            inner: Ritual::with_seed(store, Arc::new(content), settings, width, height, seed),
        })
    }

    pub fn submit_petition(&mut self, text: &str) -> bool {
        self.inner.submit_petition(text)
    }

    pub fn request_launch(&mut self) -> bool {
        self.inner.request_launch()
    }

    pub fn request_proceed(&mut self) -> bool {
        self.inner.request_proceed()
    }

    pub fn charge_interaction(&mut self, timestamp_ms: f64, x: f32, y: f32) -> bool {
        self.inner.charge_interaction(timestamp_ms, Vec2::new(x, y))
    }

    pub fn request_restart(&mut self) -> bool {
        self.inner.request_restart()
    }

    pub fn tick(&mut self, now_ms: f64) {
        self.inner.tick(now_ms);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.inner.resize(width, height);
    }

    /// Switch quality preset by name ("low", "medium", "high")
    pub fn set_quality(&mut self, name: &str) -> bool {
        let Some(preset) = QualityPreset::from_str(name) else {
            return false;
        };
        let mut settings = self.inner.settings().clone();
        settings.apply_preset(preset);
        self.inner.set_settings(settings);
        true
    }

    /// Current quality preset name
    pub fn quality(&self) -> String {
        self.inner.settings().quality.as_str().to_string()
    }

    pub fn phase(&self) -> String {
        self.inner.phase().as_str().to_string()
    }

    pub fn result(&self) -> Option<String> {
        self.inner.result().map(str::to_string)
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events_json(&mut self) -> String {
        let events = self.inner.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::error!("Failed to encode events: {e}");
            "[]".to_string()
        })
    }

    /// Current frame state as JSON
    pub fn view_json(&self) -> String {
        serde_json::to_string(&self.inner.view()).unwrap_or_else(|e| {
            log::error!("Failed to encode view: {e}");
            "null".to_string()
        })
    }

    /// Collected results, in first-seen order, as a JSON array
    pub fn collection_json(&self) -> String {
        serde_json::to_string(self.inner.ledger().collection()).unwrap_or_else(|_| "[]".into())
    }

    /// Unlocked achievement ids as a JSON array
    pub fn achievements_json(&self) -> String {
        serde_json::to_string(self.inner.ledger().unlocked_ids()).unwrap_or_else(|_| "[]".into())
    }
}
