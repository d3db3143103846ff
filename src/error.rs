//! Error types for the fatigue engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the scoring engine and its collaborators.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("payload encryption failed")]
    Encrypt,

    #[error("payload decryption failed: {0}")]
    Decrypt(String),

    #[error("invalid record payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("model bundle at {path}: {reason}")]
    BundleLoad { path: PathBuf, reason: String },

    #[error("model inference failed: {0}")]
    Inference(String),

    #[error("reconstruction shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },
}
