//! Trained model bundles: an opaque reconstruction model plus the
//! normalization constants and error threshold it was trained with.
//!
//! A bundle directory holds `model.onnx` and `scaler.json`
//! (`{"mean": [...], "std": [...], "threshold": x}`). A missing directory or
//! model file means the corresponding scorer is disabled — that is a
//! degraded mode, not an error.

mod onnx;

pub use onnx::OnnxReconstructor;

use crate::error::EngineError;
use ndarray::{Array1, ArrayD};
use serde::Deserialize;
use std::path::Path;

const MODEL_FILE: &str = "model.onnx";
const SCALER_FILE: &str = "scaler.json";

/// Reconstruction model seam. Input and output share the same shape:
/// `[1, dim]` for point-wise models, `[1, L, dim]` for sequence models.
pub trait Reconstructor: Send + Sync {
    fn reconstruct(&self, input: &ArrayD<f32>) -> Result<ArrayD<f32>, EngineError>;
}

/// Normalization constants and error threshold produced by offline training,
/// stored alongside the model weights.
#[derive(Debug, Deserialize)]
struct Scaler {
    mean: Vec<f32>,
    std: Vec<f32>,
    threshold: f32,
}

/// Immutable trained artifact consumed by an anomaly scorer.
pub struct ModelBundle {
    reconstructor: Box<dyn Reconstructor>,
    mean: Array1<f32>,
    std: Array1<f32>,
    threshold: f32,
}

impl ModelBundle {
    pub fn new(
        reconstructor: Box<dyn Reconstructor>,
        mean: Vec<f32>,
        std: Vec<f32>,
        threshold: f32,
    ) -> Self {
        Self {
            reconstructor,
            mean: Array1::from_vec(mean),
            std: Array1::from_vec(std),
            threshold,
        }
    }

    /// Load a bundle from a directory. Missing directory or model file
    /// disables the scorer (`Ok(None)`); a model with a malformed or
    /// mismatched scaler sidecar is a load error.
    pub fn load(dir: &Path, expected_dim: usize) -> Result<Option<Self>, EngineError> {
        let model_path = dir.join(MODEL_FILE);
        if !model_path.exists() {
            tracing::warn!(path = %model_path.display(), "model bundle not found; scorer disabled");
            return Ok(None);
        }

        let scaler_path = dir.join(SCALER_FILE);
        let raw = std::fs::read_to_string(&scaler_path).map_err(|e| EngineError::BundleLoad {
            path: scaler_path.clone(),
            reason: e.to_string(),
        })?;
        let scaler: Scaler = serde_json::from_str(&raw).map_err(|e| EngineError::BundleLoad {
            path: scaler_path.clone(),
            reason: e.to_string(),
        })?;
        if scaler.mean.len() != expected_dim || scaler.std.len() != expected_dim {
            return Err(EngineError::BundleLoad {
                path: scaler_path,
                reason: format!(
                    "scaler dim {}/{} does not match feature dim {}",
                    scaler.mean.len(),
                    scaler.std.len(),
                    expected_dim
                ),
            });
        }

        let reconstructor = OnnxReconstructor::load(&model_path)?;
        Ok(Some(Self::new(
            Box::new(reconstructor),
            scaler.mean,
            scaler.std,
            scaler.threshold,
        )))
    }

    /// Elementwise `(x - mean) / std` with this bundle's training constants.
    pub fn normalize(&self, raw: &[f32]) -> Array1<f32> {
        (&Array1::from_vec(raw.to_vec()) - &self.mean) / &self.std
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn reconstruct(&self, input: &ArrayD<f32>) -> Result<ArrayD<f32>, EngineError> {
        self.reconstructor.reconstruct(input)
    }
}
