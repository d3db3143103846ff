//! Engine configuration. All scoring tunables (weights, thresholds, sequence
//! length) live here so deployments can retune without rebuilding.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Data directory (history store)
    pub data_dir: PathBuf,
    /// Trained model bundle locations
    pub models: ModelsConfig,
    /// Baseline estimation parameters
    pub baseline: BaselineConfig,
    /// Per-feature weights for the rule-based deviation score
    pub rule_weights: RuleWeights,
    /// Score fusion weights
    pub fusion: FusionWeights,
    /// Alert policy
    pub alert: AlertConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Directory holding the static (point-wise) autoencoder bundle
    pub static_bundle: PathBuf,
    /// Directory holding the temporal (sequence) autoencoder bundle
    pub temporal_bundle: PathBuf,
    /// Sequence length L the temporal model was trained on
    pub sequence_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// Minimum stored windows before a baseline is considered ready
    pub min_windows: usize,
}

/// Per-feature weights for the rule-based scorer. Must sum to 1.0 for the
/// score to stay in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleWeights {
    pub typing_speed: f64,
    pub typing_variance: f64,
    pub backspace_rate: f64,
    pub backspace_burst_rate: f64,
    pub ctrl_z_rate: f64,
    pub mouse_speed: f64,
    pub mouse_distance: f64,
}

impl RuleWeights {
    /// (feature, weight) pairs in canonical feature order.
    pub fn pairs(&self) -> [(&'static str, f64); 7] {
        [
            ("typing_speed", self.typing_speed),
            ("typing_variance", self.typing_variance),
            ("backspace_rate", self.backspace_rate),
            ("backspace_burst_rate", self.backspace_burst_rate),
            ("ctrl_z_rate", self.ctrl_z_rate),
            ("mouse_speed", self.mouse_speed),
            ("mouse_distance", self.mouse_distance),
        ]
    }

    pub fn sum(&self) -> f64 {
        self.pairs().iter().map(|(_, w)| w).sum()
    }
}

/// Fusion weights for the final score. Must sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionWeights {
    pub rule: f64,
    pub static_anomaly: f64,
    pub temporal_anomaly: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Fused score at or above this raises an alert (0.0–1.0)
    pub threshold: f64,
    /// Consecutive qualifying windows required by the sustained policy
    pub sustained_windows: usize,
    /// Which predicate the live scoring path alerts on
    pub policy: AlertPolicy,
}

/// Alert decision policy. `SingleWindow` fires on a single threshold
/// crossing; `Sustained` requires the last `sustained_windows` persisted
/// scores of the session to each qualify (hysteresis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPolicy {
    SingleWindow,
    Sustained,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".fatigue"),
            models: ModelsConfig::default(),
            baseline: BaselineConfig::default(),
            rule_weights: RuleWeights::default(),
            fusion: FusionWeights::default(),
            alert: AlertConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            static_bundle: PathBuf::from("models/static"),
            temporal_bundle: PathBuf::from("models/temporal"),
            sequence_len: 5,
        }
    }
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self { min_windows: 10 }
    }
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            typing_speed: 0.15,
            typing_variance: 0.20,
            backspace_rate: 0.15,
            backspace_burst_rate: 0.15,
            ctrl_z_rate: 0.10,
            mouse_speed: 0.15,
            mouse_distance: 0.10,
        }
    }
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            rule: 0.4,
            static_anomaly: 0.2,
            temporal_anomaly: 0.4,
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            threshold: 0.40,
            sustained_windows: 2,
            policy: AlertPolicy::SingleWindow,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl EngineConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<EngineConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }
}
