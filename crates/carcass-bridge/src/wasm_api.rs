//! WASM entry points for the web worker.
//!
//! This module is only compiled for the `wasm32` target. It provides the
//! `#[wasm_bindgen]` functions that JavaScript calls from the web worker.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::engine_state::{BridgeError, EngineState};
use crate::{dispatch, process_json, to_json};

// Global engine state, single-threaded in the web worker.
thread_local! {
    static ENGINE_STATE: RefCell<Option<EngineState>> = const { RefCell::new(None) };
}

/// Initialize the bridge. Must be called once before any other function.
#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();

    ENGINE_STATE.with(|cell| {
        *cell.borrow_mut() = Some(EngineState::new());
    });
}

/// Process a JSON `UiToEngine` message and return a JSON `EngineToUi`
/// response.
#[wasm_bindgen]
pub fn process_message(json_input: &str) -> String {
    ENGINE_STATE.with(|cell| match cell.borrow_mut().as_mut() {
        Some(state) => process_json(state, json_input),
        None => to_json(&dispatch::error_response(&BridgeError::Serialization {
            reason: "bridge not initialized, call init() first".to_string(),
        })),
    })
}

/// Get the current space tree as JSON, or `null` before a carcass exists.
#[wasm_bindgen]
pub fn get_space_tree() -> String {
    ENGINE_STATE.with(|cell| {
        let state = cell.borrow();
        match state.as_ref().and_then(|s| s.engine.as_ref()) {
            Some(engine) => serde_json::to_string(engine.tree()).unwrap_or_default(),
            None => "null".to_string(),
        }
    })
}
