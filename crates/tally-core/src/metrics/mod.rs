//! Classification statistics.
//!
//! The confusion matrix is rebuilt from aggregated predictions on every run;
//! sensitivity and precision are derived from it with `-1` marking classes
//! that never occurred (as truth or as prediction respectively).

pub mod confusion;

use serde::{Deserialize, Serialize};

use crate::dataset::LabelIndex;
use crate::error::MetricsError;
use crate::evaluation::Aggregate;

pub use confusion::{precision, sensitivity, ConfusionMatrix, MatrixDisplay, UNDEFINED};

/// Metrics for one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    /// Class names in index order
    pub class_names: Vec<String>,
    /// Row = true class, column = predicted class
    pub confusion_matrix: ConfusionMatrix,
    /// Per-class recall, `-1` when the class has no test samples
    pub sensitivity: Vec<f64>,
    /// Per-class precision, `-1` when the class was never predicted
    pub precision: Vec<f64>,
    /// Overall fraction correct, `-1` when nothing was evaluated
    pub accuracy: f64,
}

impl EvaluationSummary {
    /// Compute every statistic from aggregated predictions.
    pub fn from_aggregate(agg: &Aggregate, labels: &LabelIndex) -> Result<Self, MetricsError> {
        let cm = ConfusionMatrix::from_labels(&agg.truths, &agg.predictions, labels.len())?;
        Ok(Self::from_matrix(cm, labels.labels().to_vec()))
    }

    /// Derive statistics from an existing matrix.
    pub fn from_matrix(cm: ConfusionMatrix, class_names: Vec<String>) -> Self {
        Self {
            sensitivity: cm.sensitivity(),
            precision: cm.precision(),
            accuracy: cm.accuracy(),
            confusion_matrix: cm,
            class_names,
        }
    }
}

impl std::fmt::Display for EvaluationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Confusion Matrix:")?;
        write!(f, "{}", MatrixDisplay(&self.confusion_matrix))?;
        writeln!(f, "Sensitivity: {}", format_series(&self.sensitivity))?;
        writeln!(f, "Precision: {}", format_series(&self.precision))?;
        write!(f, "Accuracy: {:.3}", self.accuracy)
    }
}

fn format_series(values: &[f64]) -> String {
    let cells: Vec<String> = values.iter().map(|v| format!("{v:.3}")).collect();
    format!("[{}]", cells.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_aggregate() {
        let labels = LabelIndex::from_lines(["a", "b", "c"]);
        let agg = Aggregate {
            truths: vec![0, 0, 1],
            predictions: vec![0, 1, 1],
            confidences: vec![vec![]; 3],
        };
        let summary = EvaluationSummary::from_aggregate(&agg, &labels).unwrap();
        assert_eq!(summary.confusion_matrix.num_classes(), 3);
        assert_eq!(summary.sensitivity, vec![0.5, 1.0, -1.0]);
        assert_eq!(summary.precision, vec![1.0, 0.5, -1.0]);
        assert!((summary.accuracy - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_summary_display() {
        let cm = ConfusionMatrix::from_rows(vec![vec![1, 0], vec![0, 1]]).unwrap();
        let summary = EvaluationSummary::from_matrix(cm, vec!["x".into(), "y".into()]);
        let text = summary.to_string();
        assert!(text.contains("Sensitivity: [1.000, 1.000]"));
        assert!(text.contains("[1 0]"));
        assert!(text.ends_with("Accuracy: 1.000"));
    }
}
