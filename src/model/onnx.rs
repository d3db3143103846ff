//! ONNX Runtime backend for [`Reconstructor`]. Autoencoder models take an
//! f32 tensor and return a reconstruction of the same shape.

use super::Reconstructor;
use crate::error::EngineError;
use ndarray::{ArrayD, CowArray};
use ort::{Environment, GraphOptimizationLevel, Session, SessionBuilder, Value};
use std::path::Path;
use std::sync::{Arc, OnceLock};

static ORT_ENV: OnceLock<Arc<Environment>> = OnceLock::new();

fn ort_env() -> &'static Arc<Environment> {
    ORT_ENV.get_or_init(|| {
        Environment::builder()
            .with_name("fatigue-engine")
            .build()
            .expect("ORT environment")
            .into_arc()
    })
}

pub struct OnnxReconstructor {
    session: Session,
}

impl OnnxReconstructor {
    /// Load a session from an existing model file. Callers handle the
    /// missing-file case before reaching here.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let session = SessionBuilder::new(ort_env())
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.with_model_from_file(path))
            .map_err(|e| EngineError::BundleLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(Self { session })
    }
}

impl Reconstructor for OnnxReconstructor {
    fn reconstruct(&self, input: &ArrayD<f32>) -> Result<ArrayD<f32>, EngineError> {
        let cow = CowArray::from(input.view());
        let value = Value::from_array(self.session.allocator(), &cow)
            .map_err(|e| EngineError::Inference(e.to_string()))?;
        let outputs = self
            .session
            .run(vec![value])
            .map_err(|e| EngineError::Inference(e.to_string()))?;
        let output = outputs
            .first()
            .ok_or_else(|| EngineError::Inference("model produced no outputs".to_string()))?;
        let tensor = output
            .try_extract::<f32>()
            .map_err(|e| EngineError::Inference(e.to_string()))?;
        Ok(tensor.view().to_owned())
    }
}
