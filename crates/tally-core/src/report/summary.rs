//! Summary directory: chart images, histogram records, and final metrics.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::EvaluationSummary;
use crate::output::{OutputFormat, OutputWriter};

/// Histogram log inside the summary directory.
pub const HISTOGRAM_FILE: &str = "summaries.jsonl";
/// Final metrics inside the summary directory.
pub const METRICS_FILE: &str = "metrics.json";

/// Distribution of a set of values over equal-width buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub num: u64,
    pub sum: f64,
    pub sum_squares: f64,
    /// Right edge of each bucket
    pub bucket_limits: Vec<f64>,
    pub bucket_counts: Vec<u64>,
}

impl Histogram {
    /// Bucket `values` into `buckets` equal-width bins spanning `[min, max]`.
    ///
    /// Non-finite values are dropped. A constant input collapses into one bucket,
    /// an empty input has none.
    pub fn from_values(values: &[f32], buckets: usize) -> Self {
        let finite: Vec<f64> = values
            .iter()
            .map(|&v| f64::from(v))
            .filter(|v| v.is_finite())
            .collect();

        if finite.is_empty() {
            return Self {
                min: 0.0,
                max: 0.0,
                num: 0,
                sum: 0.0,
                sum_squares: 0.0,
                bucket_limits: Vec::new(),
                bucket_counts: Vec::new(),
            };
        }

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let buckets = if max > min { buckets.max(1) } else { 1 };
        let width = (max - min) / buckets as f64;

        let mut bucket_counts = vec![0u64; buckets];
        for &v in &finite {
            let slot = if width > 0.0 {
                (((v - min) / width) as usize).min(buckets - 1)
            } else {
                0
            };
            bucket_counts[slot] += 1;
        }
        let bucket_limits = (1..=buckets)
            .map(|k| if k == buckets { max } else { min + width * k as f64 })
            .collect();

        Self {
            min,
            max,
            num: finite.len() as u64,
            sum: finite.iter().sum(),
            sum_squares: finite.iter().map(|v| v * v).sum(),
            bucket_limits,
            bucket_counts,
        }
    }
}

/// One line of the histogram log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramRecord {
    pub tag: String,
    pub step: usize,
    pub histogram: Histogram,
}

/// Writes the artifacts of one evaluation into a fresh directory.
pub struct SummaryWriter {
    dir: PathBuf,
    histograms: OutputWriter<BufWriter<File>>,
    buckets: usize,
}

impl SummaryWriter {
    /// Delete whatever is at `dir` and recreate it empty.
    pub fn create(dir: &Path, buckets: usize) -> Result<Self> {
        if dir.is_dir() {
            std::fs::remove_dir_all(dir)?;
        } else if dir.exists() {
            std::fs::remove_file(dir)?;
        }
        std::fs::create_dir_all(dir)?;

        let histograms =
            OutputWriter::create(&dir.join(HISTOGRAM_FILE), OutputFormat::JsonLines, false)?;
        tracing::debug!("Summary directory {:?} recreated", dir);
        Ok(Self {
            dir: dir.to_path_buf(),
            histograms,
            buckets,
        })
    }

    /// Save `image` as `{tag}.png`.
    pub fn add_image(&mut self, tag: &str, image: &RgbaImage) -> Result<PathBuf> {
        let path = self.dir.join(format!("{}.png", file_stem(tag)));
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(io::Error::other)?;
        tracing::debug!("Wrote {:?}", path);
        Ok(path)
    }

    /// Append a histogram of `values` under `tag` at `step`.
    pub fn add_histogram(&mut self, tag: &str, step: usize, values: &[f32]) -> Result<()> {
        let record = HistogramRecord {
            tag: tag.to_string(),
            step,
            histogram: Histogram::from_values(values, self.buckets),
        };
        self.histograms.write(&record)?;
        Ok(())
    }

    /// Write the final metrics as `metrics.json`.
    pub fn add_summary(&mut self, summary: &EvaluationSummary) -> Result<()> {
        let mut writer =
            OutputWriter::create(&self.dir.join(METRICS_FILE), OutputFormat::Json, true)?;
        writer.write(summary)?;
        writer.flush()?;
        Ok(())
    }

    /// Flush pending histogram records.
    pub fn close(mut self) -> Result<()> {
        self.histograms.flush()?;
        tracing::info!(
            "Wrote {} histograms to {:?}",
            self.histograms.records_written(),
            self.dir
        );
        Ok(())
    }
}

/// Tags may contain label text; keep file names portable.
fn file_stem(tag: &str) -> String {
    tag.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ConfusionMatrix;

    #[test]
    fn test_histogram_buckets() {
        let h = Histogram::from_values(&[0.0, 0.1, 0.5, 0.9, 1.0], 2);
        assert_eq!(h.num, 5);
        assert_eq!(h.min, 0.0);
        assert_eq!(h.max, 1.0);
        assert_eq!(h.bucket_limits, vec![0.5, 1.0]);
        assert_eq!(h.bucket_counts, vec![2, 3]);
        assert!((h.sum - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_histogram_constant_and_empty() {
        let h = Histogram::from_values(&[0.25, 0.25, 0.25], 30);
        assert_eq!(h.bucket_counts, vec![3]);
        assert_eq!(h.bucket_limits, vec![0.25]);

        let empty = Histogram::from_values(&[], 30);
        assert_eq!(empty.num, 0);
        assert!(empty.bucket_counts.is_empty());

        let nan = Histogram::from_values(&[f32::NAN, 1.0], 4);
        assert_eq!(nan.num, 1);
    }

    #[test]
    fn test_create_clears_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("test_results");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("stale.png"), b"old").unwrap();

        let writer = SummaryWriter::create(&out, 10).unwrap();
        writer.close().unwrap();

        assert!(!out.join("stale.png").exists());
        assert!(out.join(HISTOGRAM_FILE).exists());
    }

    #[test]
    fn test_histograms_appended_as_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = SummaryWriter::create(dir.path(), 4).unwrap();
        writer.add_histogram("Confidences_cat", 0, &[0.9, 0.8]).unwrap();
        writer.add_histogram("Confidences_cat", 1, &[0.1, 0.2]).unwrap();
        writer.close().unwrap();

        let text = std::fs::read_to_string(dir.path().join(HISTOGRAM_FILE)).unwrap();
        let records: Vec<HistogramRecord> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].tag, "Confidences_cat");
        assert_eq!(records[1].step, 1);
        assert_eq!(records[1].histogram.num, 2);
    }

    #[test]
    fn test_add_image_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = SummaryWriter::create(dir.path(), 4).unwrap();

        let path = writer
            .add_image("Confusion Matrix", &RgbaImage::new(8, 8))
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "Confusion_Matrix.png");
        assert!(image::open(&path).is_ok());

        let cm = ConfusionMatrix::from_rows(vec![vec![3, 0], vec![1, 0]]).unwrap();
        let summary = EvaluationSummary::from_matrix(cm, vec!["a".into(), "b".into()]);
        writer.add_summary(&summary).unwrap();
        writer.close().unwrap();

        let text = std::fs::read_to_string(dir.path().join(METRICS_FILE)).unwrap();
        let loaded: EvaluationSummary = serde_json::from_str(&text).unwrap();
        assert_eq!(loaded, summary);
    }
}
