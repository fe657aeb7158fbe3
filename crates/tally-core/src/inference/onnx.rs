//! ONNX Runtime session for the exported classifier graph.
//!
//! The retrained graph has one image input and two outputs of interest: the
//! softmax over classes and the pooled bottleneck features feeding it.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use crate::config::ModelConfig;
use crate::error::PipelineError;
use crate::types::Inference;

use super::Classifier;

/// Wraps an ONNX Runtime session for classification.
///
/// Uses a `Mutex` because `Session::run` requires `&mut self`.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    /// Name of the input tensor (detected from model metadata).
    input_name: String,
    result_output: String,
    bottleneck_output: String,
}

impl OnnxClassifier {
    /// Load a classifier graph from an ONNX file.
    pub fn load(model_path: &Path, model: &ModelConfig) -> Result<Self, PipelineError> {
        if !model_path.exists() {
            return Err(PipelineError::Inference {
                path: model_path.to_path_buf(),
                message: "Model graph not found. Export the retrained graph to ONNX first."
                    .to_string(),
            });
        }

        let session = Session::builder()
            .map_err(|e| PipelineError::Inference {
                path: model_path.to_path_buf(),
                message: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_file(model_path)
            .map_err(|e| PipelineError::Inference {
                path: model_path.to_path_buf(),
                message: format!("Failed to load ONNX model: {e}"),
            })?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .ok_or_else(|| PipelineError::Inference {
                path: model_path.to_path_buf(),
                message: "Model declares no inputs".to_string(),
            })?;

        let output_names: Vec<String> = session
            .outputs()
            .iter()
            .map(|o| o.name().to_string())
            .collect();
        for wanted in [&model.result_output, &model.bottleneck_output] {
            if !output_names.iter().any(|name| name == wanted) {
                return Err(PipelineError::Inference {
                    path: model_path.to_path_buf(),
                    message: format!(
                        "Model has no output named {wanted:?} (outputs: {output_names:?})"
                    ),
                });
            }
        }

        tracing::debug!(
            "Loaded classifier from {:?} (input: {:?}, outputs: {:?})",
            model_path,
            input_name,
            output_names
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            result_output: model.result_output.clone(),
            bottleneck_output: model.bottleneck_output.clone(),
        })
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, tensor: &Array4<f32>, path: &Path) -> Result<Inference, PipelineError> {
        let shape: Vec<i64> = tensor.shape().iter().map(|&d| d as i64).collect();
        let flat_data: Vec<f32> = tensor.iter().copied().collect();

        let input_value =
            Value::from_array((shape, flat_data)).map_err(|e| PipelineError::Inference {
                path: path.to_path_buf(),
                message: format!("Failed to create input tensor: {e}"),
            })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_value];

        let mut session = self.session.lock().map_err(|e| PipelineError::Inference {
            path: path.to_path_buf(),
            message: format!("Session lock poisoned: {e}"),
        })?;

        let outputs = session.run(inputs).map_err(|e| PipelineError::Inference {
            path: path.to_path_buf(),
            message: format!("ONNX inference failed: {e}"),
        })?;

        let mut confidences = None;
        let mut bottleneck = None;
        for (name, value) in outputs.iter() {
            let slot = if name == self.result_output {
                &mut confidences
            } else if name == self.bottleneck_output {
                &mut bottleneck
            } else {
                continue;
            };
            let (shape, data) =
                value
                    .try_extract_tensor::<f32>()
                    .map_err(|e| PipelineError::Inference {
                        path: path.to_path_buf(),
                        message: format!("Failed to extract {name} tensor: {e}"),
                    })?;
            *slot = Some(first_row(&shape, data, name, path)?);
        }

        match (confidences, bottleneck) {
            (Some(confidences), Some(bottleneck)) => Ok(Inference {
                confidences,
                bottleneck,
            }),
            _ => Err(PipelineError::Inference {
                path: path.to_path_buf(),
                message: format!(
                    "Model did not produce both {} and {}",
                    self.result_output, self.bottleneck_output
                ),
            }),
        }
    }
}

/// Take the single batch row out of a `[1, N]` (or flat `[N]`) output.
fn first_row(shape: &[i64], data: &[f32], name: &str, path: &Path) -> Result<Vec<f32>, PipelineError> {
    match shape.len() {
        1 => Ok(data.to_vec()),
        2 => {
            let dim = shape[1] as usize;
            Ok(data[..dim.min(data.len())].to_vec())
        }
        _ => Err(PipelineError::Inference {
            path: path.to_path_buf(),
            message: format!("Unexpected {name} shape: {shape:?}"),
        }),
    }
}
