//! Scoring components: rule-based deviation, learned anomaly scorers, and
//! score fusion with alert policy.

mod anomaly;
mod fusion;
mod rule;

pub use anomaly::{StaticScorer, TemporalBuffer, TemporalScorer};
pub use fusion::{combined_ml_score, fuse, AlertEngine};
pub use rule::rule_score;

/// Scores are reported to 3 decimal places throughout the engine.
pub(crate) fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
