//! Fencing Web - real-time fencing action recognition from pose landmarks
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

pub mod config;
pub mod detection;
pub mod error;
pub mod physics;
pub mod pose;
pub mod session;
pub mod synthetic;

mod bridge;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    configure, current_config, in_progress_actions, last_attempt_form_ok, reset_session,
    session_state, supported_actions, update_landmarks,
};

pub use config::EngineConfig;
pub use detection::{Action, ActionQuality, ActionResult, DetectorManager};
pub use error::{ConfigError, EngineError};
pub use pose::{Landmark, PoseFrame};
pub use session::{FormFeedback, FrameOutput, SessionEngine, SessionEvent, SessionState};

// ============================================================================
// CONSOLE LOGGING
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads: panic hook, then tracing output
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    bridge::init_logging();
    console_log!(
        "Fencing engine loaded ({} landmarks per frame, {} floats per payload)",
        pose::LANDMARK_COUNT,
        bridge::POSE_PAYLOAD_LEN
    );
}
