//! Baseline estimation: per-feature mean/std over stored history.
//! The baseline is the "normal" reference for deviation scoring; it is
//! recomputed on demand from the full history (soft consistency — a
//! momentarily stale baseline is acceptable).

use super::{FeatureWindow, FEATURES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Historical mean and sample standard deviation of one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub mean: f64,
    pub std: f64,
}

/// Per-feature historical statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureBaseline {
    stats: BTreeMap<String, FeatureStats>,
}

impl FeatureBaseline {
    pub fn get(&self, feature: &str) -> Option<FeatureStats> {
        self.stats.get(feature).copied()
    }

    pub fn insert(&mut self, feature: impl Into<String>, stats: FeatureStats) {
        self.stats.insert(feature.into(), stats);
    }
}

/// Computes a [`FeatureBaseline`] from stored feature windows. Read-only over
/// history; returns `None` ("not ready") until `min_windows` samples exist.
pub struct BaselineEstimator {
    min_windows: usize,
}

impl BaselineEstimator {
    pub fn new(min_windows: usize) -> Self {
        Self { min_windows }
    }

    pub fn min_windows(&self) -> usize {
        self.min_windows
    }

    /// Per-feature arithmetic mean and sample standard deviation across all
    /// historical values. Std with fewer than 2 samples is defined as 1.0.
    pub fn estimate(&self, history: &[FeatureWindow]) -> Option<FeatureBaseline> {
        if history.len() < self.min_windows {
            return None;
        }

        let mut baseline = FeatureBaseline::default();
        for feature in FEATURES {
            let values: Vec<f64> = history
                .iter()
                .filter_map(|w| w.feature(feature))
                .collect();
            baseline.insert(feature, Self::stats(&values));
        }
        Some(baseline)
    }

    fn stats(values: &[f64]) -> FeatureStats {
        let n = values.len();
        if n == 0 {
            return FeatureStats { mean: 0.0, std: 1.0 };
        }
        let mean = values.iter().sum::<f64>() / n as f64;
        let std = if n < 2 {
            1.0
        } else {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        };
        FeatureStats { mean, std }
    }
}
