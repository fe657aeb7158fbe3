//! Flattening per-label results into parallel arrays for the metrics engine.

use crate::dataset::LabelIndex;
use crate::error::MetricsError;
use crate::types::TestResult;

use super::results::ResultSet;

/// Parallel sequences extracted from a result set.
///
/// `predictions[k]`, `truths[k]` and `confidences[k]` all describe the same
/// sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    pub predictions: Vec<usize>,
    pub truths: Vec<usize>,
    pub confidences: Vec<Vec<f32>>,
}

impl Aggregate {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.truths.len()
    }

    /// Whether no samples were aggregated.
    pub fn is_empty(&self) -> bool {
        self.truths.is_empty()
    }

    /// Confidence given to `class` by every sample, in sample order.
    ///
    /// Rows from [`extract_class`] always have one entry per class; a shorter
    /// hand-built row contributes 0.
    pub fn class_column(&self, class: usize) -> Vec<f32> {
        self.confidences
            .iter()
            .map(|row| row.get(class).copied().unwrap_or(0.0))
            .collect()
    }

    pub(crate) fn extend(&mut self, other: Aggregate) {
        self.predictions.extend(other.predictions);
        self.truths.extend(other.truths);
        self.confidences.extend(other.confidences);
    }
}

fn lookup(labels: &LabelIndex, label: &str) -> Result<usize, MetricsError> {
    labels
        .index_of(label)
        .ok_or_else(|| MetricsError::InvalidInput(format!("Unknown label in results: {label:?}")))
}

/// Extract predicted indices, true indices and confidences for one label's results.
///
/// Every confidence vector must have one entry per label; a model whose output
/// width disagrees with the label file is rejected.
pub fn extract_class(results: &[TestResult], labels: &LabelIndex) -> Result<Aggregate, MetricsError> {
    let mut out = Aggregate {
        predictions: Vec::with_capacity(results.len()),
        truths: Vec::with_capacity(results.len()),
        confidences: Vec::with_capacity(results.len()),
    };
    for result in results {
        out.predictions.push(lookup(labels, &result.predicted_label)?);
        out.truths.push(lookup(labels, &result.correct_label)?);
        if result.class_confidences.len() != labels.len() {
            return Err(MetricsError::InvalidInput(format!(
                "{} class confidences for {} labels in a {:?} result",
                result.class_confidences.len(),
                labels.len(),
                result.correct_label
            )));
        }
        out.confidences.push(result.class_confidences.clone());
    }
    Ok(out)
}

/// Flatten every label's results, label order first, then insertion order.
pub fn aggregate(set: &ResultSet, labels: &LabelIndex) -> Result<Aggregate, MetricsError> {
    let mut out = Aggregate::default();
    for (_, results) in set.iter() {
        out.extend(extract_class(results, labels)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::results::tests::result;

    #[test]
    fn test_aggregate_order_and_alignment() {
        let labels = LabelIndex::from_lines(["cat", "dog"]);
        let mut set = ResultSet::for_labels(&labels);
        set.push(result("dog", "dog", vec![0.2, 0.8]));
        set.push(result("cat", "dog", vec![0.4, 0.6]));
        set.push(result("dog", "cat", vec![0.9, 0.1]));
        set.push(result("cat", "cat", vec![0.7, 0.3]));

        let agg = aggregate(&set, &labels).unwrap();
        // cat results first (label order), each in insertion order
        assert_eq!(agg.truths, vec![0, 0, 1, 1]);
        assert_eq!(agg.predictions, vec![1, 0, 1, 0]);
        assert_eq!(agg.confidences[0], vec![0.4, 0.6]);
        assert_eq!(agg.confidences[3], vec![0.9, 0.1]);
    }

    #[test]
    fn test_class_column() {
        let labels = LabelIndex::from_lines(["cat", "dog"]);
        let results = vec![
            result("cat", "cat", vec![0.7, 0.3]),
            result("cat", "dog", vec![0.4, 0.6]),
        ];
        let agg = extract_class(&results, &labels).unwrap();
        assert_eq!(agg.class_column(0), vec![0.7, 0.4]);
        assert_eq!(agg.class_column(1), vec![0.3, 0.6]);
    }

    #[test]
    fn test_confidence_width_mismatch_rejected() {
        let labels = LabelIndex::from_lines(["cat", "dog"]);
        let short = vec![
            result("cat", "cat", vec![0.7, 0.3]),
            result("cat", "dog", vec![0.4]),
        ];
        let err = extract_class(&short, &labels).unwrap_err();
        assert!(err.to_string().contains("1 class confidences for 2 labels"));

        let wide = vec![result("dog", "dog", vec![0.1, 0.8, 0.1])];
        assert!(matches!(
            extract_class(&wide, &labels),
            Err(MetricsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unknown_label_rejected() {
        let labels = LabelIndex::from_lines(["cat"]);
        let results = vec![result("cat", "ferret", vec![1.0])];
        assert!(matches!(
            extract_class(&results, &labels),
            Err(MetricsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_set() {
        let labels = LabelIndex::from_lines(["cat"]);
        let agg = aggregate(&ResultSet::for_labels(&labels), &labels).unwrap();
        assert!(agg.is_empty());
    }
}
