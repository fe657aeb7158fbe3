//! Classifier inference.
//!
//! The runner turns an image path into a confidence vector and a bottleneck
//! feature vector:
//!
//! ```text
//! read + validate → decode → resize/normalize → classify
//! ```
//!
//! The classifier itself sits behind the [`Classifier`] trait so the rest of
//! the pipeline can be exercised without a model file.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tally_core::{Config, InferenceRunner};
//!
//! let config = Config::load()?;
//! let runner = InferenceRunner::load(&config)?;
//! let inference = runner.infer(Path::new("test/daisy/001.jpg")).await?;
//! ```

pub(crate) mod onnx;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use ndarray::Array4;
use tokio::time::timeout;

use crate::config::{Config, LimitsConfig};
use crate::error::PipelineError;
use crate::pipeline::{preprocess, ImageDecoder, PreprocessParams, Validator};
use crate::types::Inference;

pub use self::onnx::OnnxClassifier;

/// A frozen classification graph.
pub trait Classifier: Send + Sync {
    /// Classify one preprocessed `[1, H, W, D]` tensor.
    fn classify(&self, tensor: &Array4<f32>, path: &Path) -> Result<Inference, PipelineError>;
}

/// Runs single images through the decode pipeline and the classifier.
pub struct InferenceRunner {
    validator: Validator,
    decoder: ImageDecoder,
    params: PreprocessParams,
    classifier: Arc<dyn Classifier>,
    inference_timeout_ms: u64,
}

impl InferenceRunner {
    /// Create a runner around an already-loaded classifier.
    pub fn new(
        classifier: Arc<dyn Classifier>,
        params: PreprocessParams,
        limits: &LimitsConfig,
    ) -> Self {
        Self {
            validator: Validator::new(limits.clone()),
            decoder: ImageDecoder::new(limits.clone()),
            params,
            classifier,
            inference_timeout_ms: limits.inference_timeout_ms,
        }
    }

    /// Load the ONNX classifier described by `config` and build a runner.
    pub fn load(config: &Config) -> Result<Self, PipelineError> {
        let params = PreprocessParams::from_model(&config.model)?;
        let model_path = config.model_path();

        tracing::info!("Loading classifier graph from {:?}", model_path);
        let classifier = OnnxClassifier::load(&model_path, &config.model)?;
        tracing::info!("Classifier graph loaded");

        Ok(Self::new(Arc::new(classifier), params, &config.limits))
    }

    /// Classify a single image file.
    pub async fn infer(&self, path: &Path) -> Result<Inference, PipelineError> {
        let start = std::time::Instant::now();

        let bytes = self.validator.read_checked(path)?;
        let decoded = self.decoder.decode_from_bytes(bytes, path).await?;
        tracing::trace!(
            "  Decode: {:?} ({}x{})",
            start.elapsed(),
            decoded.width,
            decoded.height
        );

        let classifier = Arc::clone(&self.classifier);
        let params = self.params;
        let path_owned = path.to_path_buf();
        let task = tokio::task::spawn_blocking(move || {
            let tensor = preprocess(&decoded.image, &params)?;
            classifier.classify(&tensor, &path_owned)
        });

        let result = timeout(Duration::from_millis(self.inference_timeout_ms), task).await;
        let inference = match result {
            Ok(Ok(inference)) => inference?,
            Ok(Err(e)) => {
                return Err(PipelineError::Inference {
                    path: path.to_path_buf(),
                    message: format!("Task join error: {e}"),
                })
            }
            Err(_) => {
                return Err(PipelineError::Timeout {
                    path: path.to_path_buf(),
                    stage: "inference".to_string(),
                    timeout_ms: self.inference_timeout_ms,
                })
            }
        };

        tracing::trace!("  Classified {:?} in {:?}", path, start.elapsed());
        Ok(inference)
    }
}
