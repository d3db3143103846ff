//! Scoring properties: rule-score bounds, anomaly scorer cold start and
//! disabled modes, fusion determinism, alert predicates.

use fatigue_engine::config::{AlertConfig, AlertPolicy, FusionWeights, RuleWeights};
use fatigue_engine::error::EngineError;
use fatigue_engine::features::{FeatureBaseline, FeatureStats, FeatureWindow, FEATURES};
use fatigue_engine::model::{ModelBundle, Reconstructor};
use fatigue_engine::scoring::{
    combined_ml_score, fuse, rule_score, AlertEngine, StaticScorer, TemporalBuffer,
    TemporalScorer,
};
use ndarray::ArrayD;

fn window(typing_speed: f64) -> FeatureWindow {
    FeatureWindow {
        timestamp: "2026-08-29T10:00:00Z".to_string(),
        typing_speed,
        typing_variance: 0.0,
        backspace_rate: 0.0,
        backspace_burst_rate: 0.0,
        ctrl_z_rate: 0.0,
        mouse_speed: 0.0,
        mouse_distance: 0.0,
        window_duration: 60.0,
    }
}

/// Baseline with typing_speed at (60, 10) and every other feature at (0, 1).
fn reference_baseline() -> FeatureBaseline {
    let mut baseline = FeatureBaseline::default();
    for feature in FEATURES {
        baseline.insert(feature, FeatureStats { mean: 0.0, std: 1.0 });
    }
    baseline.insert("typing_speed", FeatureStats { mean: 60.0, std: 10.0 });
    baseline
}

/// Reconstruction is the input itself (error 0).
struct Identity;

impl Reconstructor for Identity {
    fn reconstruct(&self, input: &ArrayD<f32>) -> Result<ArrayD<f32>, EngineError> {
        Ok(input.clone())
    }
}

/// Reconstruction is input + bias on every element (error = bias^2).
struct Biased(f32);

impl Reconstructor for Biased {
    fn reconstruct(&self, input: &ArrayD<f32>) -> Result<ArrayD<f32>, EngineError> {
        Ok(input + self.0)
    }
}

/// Reconstruction is all zeros (error = mean of the squared normalized input).
struct Zeroed;

impl Reconstructor for Zeroed {
    fn reconstruct(&self, input: &ArrayD<f32>) -> Result<ArrayD<f32>, EngineError> {
        Ok(ArrayD::zeros(input.raw_dim()))
    }
}

fn bundle(reconstructor: Box<dyn Reconstructor>, threshold: f32) -> ModelBundle {
    ModelBundle::new(reconstructor, vec![0.0; 7], vec![1.0; 7], threshold)
}

#[test]
fn rule_weights_sum_to_one() {
    let weights = RuleWeights::default();
    assert!((weights.sum() - 1.0).abs() < 1e-12);
}

#[test]
fn rule_score_zero_at_baseline_mean() {
    let mut baseline = reference_baseline();
    baseline.insert("typing_speed", FeatureStats { mean: 0.0, std: 10.0 });
    let score = rule_score(&window(0.0), &baseline, &RuleWeights::default());
    assert_eq!(score, 0.0);
}

#[test]
fn rule_score_three_sigma_saturates_feature_weight() {
    // typing_speed 90 vs (60, 10) is exactly 3 sigma: full 0.15 weight.
    let score = rule_score(&window(90.0), &reference_baseline(), &RuleWeights::default());
    assert_eq!(score, 0.15);
}

#[test]
fn rule_score_clamped_under_extreme_deviation() {
    let mut w = window(1e9);
    w.typing_variance = -1e9;
    w.mouse_distance = 1e12;
    let score = rule_score(&w, &reference_baseline(), &RuleWeights::default());
    assert!(score >= 0.0);
    assert!(score <= 1.0);
}

#[test]
fn rule_score_floors_degenerate_std() {
    let mut baseline = reference_baseline();
    baseline.insert("typing_speed", FeatureStats { mean: 90.0, std: 0.0 });
    // std 0 is treated as 1, so the z-score is finite.
    let score = rule_score(&window(90.0), &baseline, &RuleWeights::default());
    assert_eq!(score, 0.0);
}

#[test]
fn static_scorer_without_bundle_is_zero() {
    let scorer = StaticScorer::new(None);
    assert!(!scorer.is_enabled());
    assert_eq!(scorer.score(&window(42.0)).unwrap(), 0.0);
}

#[test]
fn static_scorer_perfect_reconstruction_is_zero() {
    let scorer = StaticScorer::new(Some(bundle(Box::new(Identity), 0.5)));
    assert_eq!(scorer.score(&window(42.0)).unwrap(), 0.0);
}

#[test]
fn static_scorer_error_normalized_by_threshold() {
    // bias 1 -> MSE 1; threshold 2 -> score 0.5
    let scorer = StaticScorer::new(Some(bundle(Box::new(Biased(1.0)), 2.0)));
    assert_eq!(scorer.score(&window(42.0)).unwrap(), 0.5);
}

#[test]
fn static_scorer_applies_bundle_normalization() {
    // typing_speed 90 normalizes to (90 - 60) / 10 = 3; every other feature
    // sits at its mean and normalizes to 0. Against a zero reconstruction the
    // MSE is 9/7, so threshold 9 gives round(1/7) = 0.143.
    let mut mean = vec![0.0; 7];
    let mut std = vec![1.0; 7];
    mean[0] = 60.0;
    std[0] = 10.0;
    let bundle = ModelBundle::new(Box::new(Zeroed), mean, std, 9.0);
    let scorer = StaticScorer::new(Some(bundle));
    assert_eq!(scorer.score(&window(90.0)).unwrap(), 0.143);
}

#[test]
fn static_scorer_clamps_above_threshold() {
    // bias 2 -> MSE 4; threshold 1 -> clamped to 1.0
    let scorer = StaticScorer::new(Some(bundle(Box::new(Biased(2.0)), 1.0)));
    assert_eq!(scorer.score(&window(42.0)).unwrap(), 1.0);
}

#[test]
fn temporal_scorer_without_bundle_leaves_buffer_untouched() {
    let scorer = TemporalScorer::new(None, 5);
    let mut buffer = TemporalBuffer::new(5);
    for _ in 0..10 {
        assert_eq!(scorer.score(&window(42.0), &mut buffer).unwrap(), 0.0);
    }
    assert!(buffer.is_empty());
}

#[test]
fn temporal_scorer_cold_start_then_scores() {
    let scorer = TemporalScorer::new(Some(bundle(Box::new(Biased(1.0)), 2.0)), 5);
    let mut buffer = TemporalBuffer::new(5);
    for i in 0..4 {
        assert_eq!(
            scorer.score(&window(i as f64), &mut buffer).unwrap(),
            0.0,
            "call {} must be cold-start zero",
            i
        );
    }
    assert_eq!(scorer.score(&window(4.0), &mut buffer).unwrap(), 0.5);
}

#[test]
fn temporal_scorer_perfect_reconstruction_is_zero() {
    let scorer = TemporalScorer::new(Some(bundle(Box::new(Identity), 0.5)), 5);
    let mut buffer = TemporalBuffer::new(5);
    let mut last = 0.0;
    for _ in 0..5 {
        last = scorer.score(&window(42.0), &mut buffer).unwrap();
    }
    assert_eq!(last, 0.0);
}

#[test]
fn temporal_buffer_never_exceeds_capacity() {
    let scorer = TemporalScorer::new(Some(bundle(Box::new(Identity), 0.5)), 5);
    let mut buffer = TemporalBuffer::new(5);
    for i in 0..20 {
        scorer.score(&window(i as f64), &mut buffer).unwrap();
        assert!(buffer.len() <= 5);
    }
    assert!(buffer.is_full());
}

#[test]
fn fusion_is_deterministic_and_weight_preserving() {
    let weights = FusionWeights::default();
    assert_eq!(fuse(0.5, 0.5, 0.5, &weights), 0.5);
    assert_eq!(fuse(0.15, 0.0, 0.0, &weights), 0.06);
    assert_eq!(fuse(1.0, 1.0, 1.0, &weights), 1.0);
    assert_eq!(fuse(0.0, 0.0, 0.0, &weights), 0.0);
}

#[test]
fn combined_ml_score_is_unweighted_average() {
    assert_eq!(combined_ml_score(0.4, 0.6), 0.5);
    assert_eq!(combined_ml_score(0.0, 0.0), 0.0);
    assert_eq!(combined_ml_score(1.0, 0.0), 0.5);
}

#[test]
fn single_window_alert_at_threshold() {
    let engine = AlertEngine::new(AlertConfig::default());
    assert!(engine.single_window(0.40));
    assert!(engine.single_window(0.9));
    assert!(!engine.single_window(0.399));
}

#[test]
fn sustained_alert_requires_every_recent_window() {
    let engine = AlertEngine::new(AlertConfig::default());
    assert!(!engine.sustained(&[0.5, 0.3]));
    assert!(engine.sustained(&[0.5, 0.45]));
    assert!(!engine.sustained(&[0.5]));
    assert!(!engine.sustained(&[]));
}

#[test]
fn alert_policy_dispatch() {
    let single = AlertEngine::new(AlertConfig::default());
    assert!(single.evaluate(0.5, &[0.5, 0.1]));

    let sustained = AlertEngine::new(AlertConfig {
        policy: AlertPolicy::Sustained,
        ..AlertConfig::default()
    });
    assert!(!sustained.evaluate(0.5, &[0.5, 0.1]));
    assert!(sustained.evaluate(0.5, &[0.5, 0.5]));
}
