//! Behavioral feature windows: the periodic typing/mouse telemetry record
//! and its canonical vectorization for model input.

mod baseline;

pub use baseline::{BaselineEstimator, FeatureBaseline, FeatureStats};

use serde::{Deserialize, Serialize};

/// Canonical model feature order. Normalization constants and trained models
/// assume exactly this layout; `window_duration` is metadata, not a feature.
pub const FEATURES: [&str; 7] = [
    "typing_speed",
    "typing_variance",
    "backspace_rate",
    "backspace_burst_rate",
    "ctrl_z_rate",
    "mouse_speed",
    "mouse_distance",
];

/// Number of model features per window.
pub const FEATURE_DIM: usize = FEATURES.len();

/// One periodic summary of user input behavior over a short duration.
/// Immutable once received; `timestamp` is caller-supplied and not validated
/// for monotonicity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureWindow {
    pub timestamp: String,
    pub typing_speed: f64,
    pub typing_variance: f64,
    pub backspace_rate: f64,
    pub backspace_burst_rate: f64,
    pub ctrl_z_rate: f64,
    pub mouse_speed: f64,
    pub mouse_distance: f64,
    /// Seconds covered by this window.
    pub window_duration: f64,
}

impl FeatureWindow {
    /// Value of a named model feature.
    pub fn feature(&self, name: &str) -> Option<f64> {
        match name {
            "typing_speed" => Some(self.typing_speed),
            "typing_variance" => Some(self.typing_variance),
            "backspace_rate" => Some(self.backspace_rate),
            "backspace_burst_rate" => Some(self.backspace_burst_rate),
            "ctrl_z_rate" => Some(self.ctrl_z_rate),
            "mouse_speed" => Some(self.mouse_speed),
            "mouse_distance" => Some(self.mouse_distance),
            _ => None,
        }
    }

    /// Encode to a fixed-dim f32 vector in [`FEATURES`] order for model input.
    pub fn to_vector(&self) -> [f32; FEATURE_DIM] {
        [
            self.typing_speed as f32,
            self.typing_variance as f32,
            self.backspace_rate as f32,
            self.backspace_burst_rate as f32,
            self.ctrl_z_rate as f32,
            self.mouse_speed as f32,
            self.mouse_distance as f32,
        ]
    }
}
