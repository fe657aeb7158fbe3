//! Sub-configuration structs with defaults matching the retraining layout.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory containing the exported model graph
    pub model_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("./tmp"),
        }
    }
}

/// Frozen classifier graph settings.
///
/// Defaults describe an Inception v3 graph exported by the retraining script:
/// 299×299 RGB input scaled with `(pixel - 128) / 128`, a softmax output named
/// `final_result` and a 2048-wide pooled bottleneck.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Graph filename inside the model directory
    pub file_name: String,

    /// Input width fed to the graph
    pub input_width: u32,

    /// Input height fed to the graph
    pub input_height: u32,

    /// Input channels (1 = grayscale, 3 = RGB, 4 = RGBA)
    pub input_depth: u32,

    /// Pixel value that maps to zero
    pub input_mean: f32,

    /// Divisor applied after subtracting the mean
    pub input_std: f32,

    /// Name of the class-confidence output
    pub result_output: String,

    /// Name of the bottleneck feature output
    pub bottleneck_output: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            file_name: "output_graph.onnx".to_string(),
            input_width: 299,
            input_height: 299,
            input_depth: 3,
            input_mean: 128.0,
            input_std: 128.0,
            result_output: "final_result".to_string(),
            bottleneck_output: "bottleneck".to_string(),
        }
    }
}

/// Evaluation run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Label file written by the retraining step (one label per line)
    pub label_path: PathBuf,

    /// Test image directory (root/label/file)
    pub test_dir: PathBuf,

    /// Where the per-label result file is written
    pub result_path: PathBuf,

    /// Maximum number of test files taken from each label folder
    pub samples_per_class: usize,

    /// Log progress every N samples
    pub notify_interval: usize,

    /// Continue past images that fail to decode or classify
    pub skip_failures: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            label_path: PathBuf::from("./tmp/output_labels.txt"),
            test_dir: PathBuf::from("./test_images"),
            result_path: PathBuf::from("./tmp/test_results.json"),
            samples_per_class: 50,
            notify_interval: 20,
            skip_failures: false,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,

    /// Classifier inference timeout in milliseconds
    pub inference_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 10000,
            decode_timeout_ms: 5000,
            inference_timeout_ms: 30000,
        }
    }
}

/// Summary report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Subdirectory of the model directory that receives summaries.
    /// Deleted and recreated on every run.
    pub dir_name: String,

    /// Rendered chart width in pixels
    pub chart_width: u32,

    /// Rendered chart height in pixels
    pub chart_height: u32,

    /// Buckets per confidence histogram
    pub histogram_buckets: usize,

    /// Print the confusion matrix, sensitivity and precision after a run
    pub print_results: bool,

    /// Draw row-normalized rates instead of counts in the confusion chart
    pub normalize_confusion: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir_name: "test_results".to_string(),
            chart_width: 640,
            chart_height: 480,
            histogram_buckets: 30,
            print_results: true,
            normalize_confusion: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
