//! Learned anomaly scorers. Both normalize the current window with their
//! bundle's training constants, run a reconstruction model, and report mean
//! squared reconstruction error normalized by the bundle threshold.
//!
//! The threshold is chosen offline (a high percentile of reconstruction
//! error on normal training data), so error/threshold ≈ 1 marks the boundary
//! of normal behavior; anything above is clamped to 1.0.

use super::round3;
use crate::error::EngineError;
use crate::features::{FeatureWindow, FEATURE_DIM};
use crate::model::ModelBundle;
use ndarray::{s, Array1, Array2, Array3, ArrayD};
use std::collections::VecDeque;

/// Ordered FIFO of the most recent normalized feature vectors for one
/// session. Length never exceeds capacity; the temporal scorer cannot score
/// until it has filled once.
#[derive(Debug)]
pub struct TemporalBuffer {
    seq: VecDeque<Array1<f32>>,
    capacity: usize,
}

impl TemporalBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            seq: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.seq.len() >= self.capacity
    }

    fn push(&mut self, vector: Array1<f32>) {
        self.seq.push_back(vector);
        while self.seq.len() > self.capacity {
            self.seq.pop_front();
        }
    }
}

fn reconstruction_score(
    bundle: &ModelBundle,
    input: &ArrayD<f32>,
) -> Result<f64, EngineError> {
    let recon = bundle.reconstruct(input)?;
    if recon.shape() != input.shape() {
        return Err(EngineError::ShapeMismatch {
            expected: input.shape().to_vec(),
            got: recon.shape().to_vec(),
        });
    }
    let n = input.len() as f64;
    let err = input
        .iter()
        .zip(recon.iter())
        .map(|(a, b)| {
            let d = (*a - *b) as f64;
            d * d
        })
        .sum::<f64>()
        / n;
    Ok(round3((err / bundle.threshold() as f64).min(1.0)))
}

/// Point-wise anomaly scorer: one normalized `[1, dim]` vector per window.
/// Without a bundle it contributes 0.0 unconditionally.
pub struct StaticScorer {
    bundle: Option<ModelBundle>,
}

impl StaticScorer {
    pub fn new(bundle: Option<ModelBundle>) -> Self {
        Self { bundle }
    }

    pub fn is_enabled(&self) -> bool {
        self.bundle.is_some()
    }

    pub fn score(&self, window: &FeatureWindow) -> Result<f64, EngineError> {
        let Some(bundle) = &self.bundle else {
            return Ok(0.0);
        };
        let normalized = bundle.normalize(&window.to_vector());
        let input = Array2::from_shape_vec((1, FEATURE_DIM), normalized.to_vec())
            .map_err(|e| EngineError::Inference(e.to_string()))?
            .into_dyn();
        reconstruction_score(bundle, &input)
    }
}

/// Sequence anomaly scorer. Each call with a loaded bundle appends the
/// normalized window to the session's buffer (evicting the oldest beyond L),
/// so scoring is not idempotent: replaying a window shifts the sequence.
/// Returns 0.0 until the buffer first reaches capacity (cold start).
pub struct TemporalScorer {
    bundle: Option<ModelBundle>,
    sequence_len: usize,
}

impl TemporalScorer {
    pub fn new(bundle: Option<ModelBundle>, sequence_len: usize) -> Self {
        Self {
            bundle,
            sequence_len,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.bundle.is_some()
    }

    pub fn sequence_len(&self) -> usize {
        self.sequence_len
    }

    pub fn score(
        &self,
        window: &FeatureWindow,
        buffer: &mut TemporalBuffer,
    ) -> Result<f64, EngineError> {
        let Some(bundle) = &self.bundle else {
            // Disabled scorer leaves session state untouched.
            return Ok(0.0);
        };

        buffer.push(bundle.normalize(&window.to_vector()));
        if buffer.len() < self.sequence_len {
            return Ok(0.0);
        }

        let mut seq = Array3::<f32>::zeros((1, self.sequence_len, FEATURE_DIM));
        for (i, vector) in buffer.seq.iter().enumerate() {
            seq.slice_mut(s![0, i, ..]).assign(vector);
        }
        reconstruction_score(bundle, &seq.into_dyn())
    }
}
