//! Error types for the Tally evaluation pipeline.
//!
//! Errors are organized by stage (dataset, pipeline, metrics) so every message
//! carries the context needed to act on it: file paths, label names, or the
//! shape that failed validation.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Tally operations.
#[derive(Error, Debug)]
pub enum TallyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Label file or test directory errors
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Per-image decode and inference errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Confusion matrix and chart errors
    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while reading the label file or sampling the test directory.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The label file or test directory could not be read
    #[error("Cannot read {path}: {source}")]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The test directory is deeper than root → label folders → files
    #[error(
        "Invalid directory structure: {path} is nested below a label folder \
         (expected root/label/file)"
    )]
    InvalidDirectoryStructure { path: PathBuf },

    /// A label folder has no entry in the label file
    #[error("Label folder {dir} does not match any label in the label file: {label:?}")]
    UnknownLabel { label: String, dir: PathBuf },
}

/// Image-level errors, organized by pipeline stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image file does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Image file exists but could not be read
    #[error("Cannot read {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Classifier inference failed
    #[error("Inference failed for {path}: {message}")]
    Inference { path: PathBuf, message: String },

    /// Operation timed out
    #[error("Timeout in {stage} stage for {path} after {timeout_ms}ms")]
    Timeout {
        path: PathBuf,
        stage: String,
        timeout_ms: u64,
    },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Unsupported image format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// Invalid preprocessing parameters or classifier output
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors from confusion matrix construction and chart rendering.
#[derive(Error, Debug, PartialEq)]
pub enum MetricsError {
    /// Malformed matrix, mismatched class names, or mismatched series lengths
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The bundled chart font could not be parsed
    #[error("Chart font error: {0}")]
    Font(String),
}

/// Convenience type alias for Tally results.
pub type Result<T> = std::result::Result<T, TallyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_structure_message_names_path() {
        let err = DatasetError::InvalidDirectoryStructure {
            path: PathBuf::from("/data/test/cat/nested"),
        };
        assert!(err.to_string().contains("/data/test/cat/nested"));
    }

    #[test]
    fn test_stage_errors_convert_to_top_level() {
        let err: TallyError = MetricsError::InvalidInput("not square".into()).into();
        assert!(matches!(err, TallyError::Metrics(_)));
        assert!(err.to_string().contains("not square"));
    }
}
