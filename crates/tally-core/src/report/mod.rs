//! Evaluation report: per-class confidence histograms, confusion-matrix and
//! precision charts, and the final metrics file.

pub mod render;
pub mod summary;

pub use render::{BarLabels, ChartRenderer};
pub use summary::{Histogram, HistogramRecord, SummaryWriter, HISTOGRAM_FILE, METRICS_FILE};

use crate::dataset::LabelIndex;
use crate::error::Result;
use crate::evaluation::{extract_class, Aggregate, ResultSet};
use crate::metrics::EvaluationSummary;

/// Write the full report for a result set and return its metrics.
///
/// For each label, one histogram per class index holds the confidence that
/// class received across that label's samples (`Confidences_{label}`, step =
/// class index). The confusion matrix is drawn as `Confusion_Matrix`, and
/// precision next to sensitivity as `Precision`.
pub fn summarize_results(
    set: &ResultSet,
    labels: &LabelIndex,
    writer: &mut SummaryWriter,
    renderer: &ChartRenderer,
) -> Result<EvaluationSummary> {
    let num_classes = labels.len();
    let mut all = Aggregate::default();

    for (label, results) in set.iter() {
        let class = extract_class(results, labels)?;
        let tag = format!("Confidences_{label}");
        for index in 0..num_classes {
            writer.add_histogram(&tag, index, &class.class_column(index))?;
        }
        all.extend(class);
    }

    let summary = EvaluationSummary::from_aggregate(&all, labels)?;

    let confusion = renderer.render_confusion(&summary.confusion_matrix, &summary.class_names)?;
    writer.add_image("Confusion_Matrix", &confusion)?;

    let x: Vec<f64> = (0..num_classes).map(|i| i as f64).collect();
    let bars = renderer.render_bar(
        &x,
        &summary.precision,
        Some(&summary.sensitivity),
        BarLabels {
            title: "Class Precision",
            x_label: "Class",
            y_label: "Precision and Sensitivity",
        },
    )?;
    writer.add_image("Precision", &bars)?;

    writer.add_summary(&summary)?;
    tracing::info!(
        "Summarized {} results over {} classes (accuracy {:.3})",
        all.len(),
        num_classes,
        summary.accuracy
    );
    Ok(summary)
}
