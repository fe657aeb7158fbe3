//! Configuration validation with range checks.

use std::path::{Component, Path};

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.input_width == 0 || self.model.input_height == 0 {
            return Err(ConfigError::ValidationError(
                "model.input_width and model.input_height must be > 0".into(),
            ));
        }
        if !matches!(self.model.input_depth, 1 | 3 | 4) {
            return Err(ConfigError::ValidationError(
                "model.input_depth must be 1, 3 or 4".into(),
            ));
        }
        if self.model.input_std <= 0.0 {
            return Err(ConfigError::ValidationError(
                "model.input_std must be > 0".into(),
            ));
        }
        if self.evaluation.samples_per_class == 0 {
            return Err(ConfigError::ValidationError(
                "evaluation.samples_per_class must be > 0".into(),
            ));
        }
        if self.evaluation.notify_interval == 0 {
            return Err(ConfigError::ValidationError(
                "evaluation.notify_interval must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.inference_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.inference_timeout_ms must be > 0".into(),
            ));
        }
        if self.report.chart_width < 64 || self.report.chart_height < 64 {
            return Err(ConfigError::ValidationError(
                "report.chart_width and report.chart_height must be >= 64".into(),
            ));
        }
        if self.report.histogram_buckets == 0 {
            return Err(ConfigError::ValidationError(
                "report.histogram_buckets must be > 0".into(),
            ));
        }
        if !is_single_dir_name(&self.report.dir_name) {
            return Err(ConfigError::ValidationError(format!(
                "report.dir_name must be a single directory name, got {:?}",
                self.report.dir_name
            )));
        }
        Ok(())
    }
}

/// The report directory is wiped on every run, so it must stay a direct child
/// of the model directory.
fn is_single_dir_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_samples_per_class() {
        let mut config = Config::default();
        config.evaluation.samples_per_class = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("samples_per_class"));
    }

    #[test]
    fn test_validate_rejects_bad_input_depth() {
        let mut config = Config::default();
        config.model.input_depth = 2;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("input_depth"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.limits.inference_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("inference_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_report_dir_outside_model_dir() {
        for name in ["", ".", "..", "/tmp/report", "a/b", "../escape"] {
            let mut config = Config::default();
            config.report.dir_name = name.to_string();
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("dir_name"), "accepted {name:?}");
        }
    }

    #[test]
    fn test_validate_accepts_plain_report_dir() {
        let mut config = Config::default();
        config.report.dir_name = "eval-2024".to_string();
        assert!(config.validate().is_ok());
        // a trailing separator still names one directory
        config.report.dir_name = "eval/".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_tiny_chart() {
        let mut config = Config::default();
        config.report.chart_width = 10;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chart_width"));
    }
}
