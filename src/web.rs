//! JavaScript bindings for the browser front end
//!
//! The page owns the real clock: it runs a one-second `setInterval` while
//! `clockRunning()` is true, and a `setTimeout` for each mismatch, passing the
//! handle back to `resolveMismatch`. State crosses the boundary as JSON.

use wasm_bindgen::prelude::*;

use crate::persistence::LocalStorage;
use crate::settings::Settings;
use crate::sim::{Catalog, Engine, TimerHandle};

#[wasm_bindgen]
pub struct MemoryGame {
    engine: Engine<LocalStorage>,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
impl MemoryGame {
    /// Load settings, gamertag and leaderboard from LocalStorage and deal
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<MemoryGame, JsValue> {
        crate::platform::init_logging();
        let store = LocalStorage::open();
        let settings = Settings::load(&store);
        let engine = Engine::new(settings, Catalog::baseball(), store)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Memoray Match ready");
        Ok(Self { engine })
    }

    /// Reveal a card; returns the outcome as JSON
    #[wasm_bindgen(js_name = revealCard)]
    pub fn reveal_card(&mut self, card_id: usize) -> Result<String, JsValue> {
        to_json(&self.engine.reveal_card(card_id))
    }

    /// Deal again; returns the cancelled timer handle, if any
    #[wasm_bindgen(js_name = resetRound)]
    pub fn reset_round(&mut self) -> Option<u32> {
        self.engine.reset_round().map(|h| h.0)
    }

    #[wasm_bindgen(js_name = grantConsent)]
    pub fn grant_consent(&mut self) {
        self.engine.grant_consent();
    }

    pub fn tick(&mut self) {
        self.engine.tick();
    }

    #[wasm_bindgen(js_name = resolveMismatch)]
    pub fn resolve_mismatch(&mut self, handle: u32) -> bool {
        self.engine.resolve_mismatch(TimerHandle(handle))
    }

    /// Drop any armed timer before the page goes away
    #[wasm_bindgen(js_name = cancelPendingTimer)]
    pub fn cancel_pending_timer(&mut self) -> Option<u32> {
        self.engine.cancel_pending_timer().map(|h| h.0)
    }

    #[wasm_bindgen(js_name = clockRunning)]
    pub fn clock_running(&self) -> bool {
        self.engine.clock_running()
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        to_json(&self.engine.snapshot())
    }

    /// Image path and description for a card face
    pub fn face(&self, card_id: usize) -> Result<String, JsValue> {
        to_json(&self.engine.face(card_id))
    }

    #[wasm_bindgen(js_name = topScores)]
    pub fn top_scores(&self) -> Result<String, JsValue> {
        to_json(&self.engine.top_scores())
    }

    #[wasm_bindgen(js_name = clearScores)]
    pub fn clear_scores(&mut self) {
        self.engine.clear_scores();
    }
}
