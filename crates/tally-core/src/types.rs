//! Core data types for the Tally evaluation pipeline.
//!
//! These types flow between the sampler, the inference runner and the
//! aggregator. `TestResult` is also the unit persisted in result files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::math::ratio_or;
use crate::metrics::UNDEFINED;

/// One test image picked by the sampler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSample {
    /// Label folder name the file was found in
    pub label: String,

    /// Index of `label` in the label file
    pub index: usize,

    /// Path to the image file
    pub path: PathBuf,
}

/// Raw classifier output for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inference {
    /// Per-class confidence vector (softmax output)
    pub confidences: Vec<f32>,

    /// Penultimate-layer feature vector
    pub bottleneck: Vec<f32>,
}

/// Outcome of comparing a confidence vector against the ground truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the top-scoring class matches the ground truth
    pub prediction: bool,

    /// Ground-truth label name
    pub correct_label: String,

    /// Top-scoring label name
    pub predicted_label: String,
}

/// The evaluation record for a single image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Whether the prediction was correct
    pub prediction: bool,

    /// Ground-truth label name
    pub correct_label: String,

    /// Predicted label name
    pub predicted_label: String,

    /// Per-class confidence vector
    pub class_confidences: Vec<f32>,

    /// Bottleneck feature vector
    pub features: Vec<f32>,
}

impl TestResult {
    /// Combine a verdict with the inference it was derived from.
    pub fn new(verdict: Verdict, inference: Inference) -> Self {
        Self {
            prediction: verdict.prediction,
            correct_label: verdict.correct_label,
            predicted_label: verdict.predicted_label,
            class_confidences: inference.confidences,
            features: inference.bottleneck,
        }
    }
}

/// Counters for a finished evaluation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationStats {
    /// Samples classified successfully
    pub succeeded: usize,

    /// Samples skipped after a failure (only with `skip_failures`)
    pub failed: usize,

    /// Successful samples whose prediction matched the ground truth
    pub correct: usize,
}

impl EvaluationStats {
    /// Fraction of successful samples predicted correctly, `-1` if none ran.
    pub fn accuracy(&self) -> f64 {
        ratio_or(self.correct as u64, self.succeeded as u64, UNDEFINED)
    }
}
