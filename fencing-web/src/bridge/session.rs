//! Session storage and control entry points
//!
//! The engine lives in a thread-local (WASM is single-threaded), so frames
//! are processed strictly in call order.

use std::cell::RefCell;

use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::session::SessionEngine;

thread_local! {
    static SESSION: RefCell<SessionEngine> = RefCell::new(SessionEngine::default());
}

/// Run `f` against the shared session engine
pub(crate) fn with_session<R>(f: impl FnOnce(&mut SessionEngine) -> R) -> R {
    SESSION.with(|cell| f(&mut cell.borrow_mut()))
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Replace the engine configuration from a JSON document
///
/// Missing fields keep their defaults. On rejection the running
/// configuration is left untouched.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    apply_config(json).map_err(|err| {
        web_sys::console::error_1(&format!("Configuration rejected: {err}").into());
        JsValue::from(err)
    })
}

/// Current configuration as JSON
#[wasm_bindgen]
pub fn current_config() -> Result<String, JsValue> {
    let json = with_session(|engine| engine.config().to_json()).map_err(EngineError::from)?;
    Ok(json)
}

/// Abandon every in-flight action and return to Idle
#[wasm_bindgen]
pub fn reset_session() {
    with_session(SessionEngine::reset);
}

/// JSON array of every action the engine can recognize
#[wasm_bindgen]
pub fn supported_actions() -> Result<String, JsValue> {
    Ok(supported_actions_json()?)
}

/// JSON array of the in-progress results from the last frame
#[wasm_bindgen]
pub fn in_progress_actions() -> Result<String, JsValue> {
    let json = with_session(|engine| serde_json::to_string(&engine.in_progress_actions()))
        .map_err(EngineError::from)?;
    Ok(json)
}

/// Display name of the current session state
#[wasm_bindgen]
pub fn session_state() -> String {
    with_session(|engine| engine.state().name().to_string())
}

#[wasm_bindgen]
pub fn last_attempt_form_ok() -> bool {
    with_session(|engine| engine.last_attempt_form_ok())
}

// ============================================================================
// INTERNAL API (no wasm_bindgen)
// ============================================================================

pub(crate) fn apply_config(json: &str) -> Result<(), EngineError> {
    let config = EngineConfig::from_json(json).inspect_err(|err| {
        warn!(%err, "configuration rejected, keeping the running one");
    })?;
    with_session(|engine| engine.reconfigure(config));
    Ok(())
}

pub(crate) fn supported_actions_json() -> Result<String, EngineError> {
    let actions = with_session(|engine| engine.supported_actions());
    Ok(serde_json::to_string(&actions)?)
}
