//! Error types
//!
//! The frame path never fails (missing data is reported as "nothing
//! detected"). Errors only come from configuration and host payloads.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Configuration rejected by [`crate::config::EngineConfig::validate`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{lower} ({lower_value}) must be below {upper} ({upper_value})")]
    Ordering {
        lower: &'static str,
        lower_value: f32,
        upper: &'static str,
        upper_value: f32,
    },

    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be a fraction in (0, 1) (got {value})")]
    Fraction { field: &'static str, value: f32 },

    #[error("history capacity {capacity} must exceed the minimum history {min_history}")]
    HistoryCapacity { capacity: usize, min_history: usize },
}

/// Errors surfaced to the browser host
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to serialize engine output: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<EngineError> for JsValue {
    fn from(err: EngineError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
