//! Rule-based deviation scorer: weighted, clamped per-feature z-scores
//! against the historical baseline.

use super::round3;
use crate::config::RuleWeights;
use crate::features::{FeatureBaseline, FeatureWindow};

/// Weighted deviation of `window` from `baseline`, in [0, 1].
///
/// Per feature: `z = |value - mean| / std`, clamped as `min(z/3, 1)` so a
/// deviation of 3 sigma or more saturates that feature's contribution to its
/// full weight. Weights sum to 1.0, so the total stays bounded. Rounded to
/// 3 decimals.
///
/// Callers without a ready baseline must substitute 0.0 rather than invoke
/// this — there is no meaningful no-baseline deviation.
///
/// A ready baseline from [`crate::features::BaselineEstimator`] covers every
/// feature in [`crate::features::FEATURES`]; a hand-built baseline missing a
/// feature contributes nothing for it, under-weighting the total.
pub fn rule_score(window: &FeatureWindow, baseline: &FeatureBaseline, weights: &RuleWeights) -> f64 {
    let mut score = 0.0;
    for (feature, weight) in weights.pairs() {
        let Some(stats) = baseline.get(feature) else {
            continue;
        };
        let Some(value) = window.feature(feature) else {
            continue;
        };
        let std = if stats.std > 0.0 { stats.std } else { 1.0 };
        let z = (value - stats.mean).abs() / std;
        score += (z / 3.0).min(1.0) * weight;
    }
    round3(score)
}
