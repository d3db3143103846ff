//! Score fusion and alert decision.

use super::round3;
use crate::config::{AlertConfig, AlertPolicy, FusionWeights};

/// Weighted combination of the three scores into the final fatigue score.
/// Pure and deterministic; with weights summing to 1 the result stays in
/// [0, 1]. Rounded to 3 decimals.
pub fn fuse(rule: f64, static_score: f64, temporal_score: f64, weights: &FusionWeights) -> f64 {
    round3(
        weights.rule * rule
            + weights.static_anomaly * static_score
            + weights.temporal_anomaly * temporal_score,
    )
}

/// Informational ML score reported alongside fusion: the unweighted average
/// of the two anomaly scores. Not used in the fused score itself.
pub fn combined_ml_score(static_score: f64, temporal_score: f64) -> f64 {
    round3((static_score + temporal_score) / 2.0)
}

/// Applies the configured alert policy to fused scores.
pub struct AlertEngine {
    config: AlertConfig,
}

impl AlertEngine {
    pub fn new(config: AlertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// Single-window policy: one threshold crossing is sufficient.
    pub fn single_window(&self, fatigue_score: f64) -> bool {
        fatigue_score >= self.config.threshold
    }

    /// Sustained policy over persisted fatigue scores, newest first: true
    /// only when the most recent `sustained_windows` scores each qualify.
    /// Fewer stored scores than required is never an alert.
    pub fn sustained(&self, recent_scores: &[f64]) -> bool {
        let n = self.config.sustained_windows;
        if recent_scores.len() < n {
            return false;
        }
        recent_scores[..n].iter().all(|s| *s >= self.config.threshold)
    }

    /// Decide under the configured policy. `recent_scores` must be the
    /// session's persisted fatigue scores, newest first, including the
    /// window just scored.
    pub fn evaluate(&self, fatigue_score: f64, recent_scores: &[f64]) -> bool {
        match self.config.policy {
            AlertPolicy::SingleWindow => self.single_window(fatigue_score),
            AlertPolicy::Sustained => self.sustained(recent_scores),
        }
    }
}
