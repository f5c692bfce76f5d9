//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod landmarks;
mod logging;
mod session;

pub use landmarks::{
    // WASM entry points
    update_landmarks,
    // Constants
    POSE_PAYLOAD_LEN,
};

pub(crate) use logging::init_logging;

pub use session::{
    configure,
    current_config,
    in_progress_actions,
    last_attempt_form_ok,
    reset_session,
    session_state,
    supported_actions,
};
