//! Per-label collections of test results.

use serde::{Deserialize, Serialize};

use crate::dataset::LabelIndex;
use crate::types::TestResult;

/// Results collected for one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassResults {
    pub label: String,
    pub results: Vec<TestResult>,
}

/// Test results grouped by ground-truth label.
///
/// Labels iterate in the order they were registered (label-file order when
/// built with [`ResultSet::for_labels`]); results keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    classes: Vec<ClassResults>,
}

impl ResultSet {
    /// Empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// One empty entry per distinct label, in label-file order.
    pub fn for_labels(labels: &LabelIndex) -> Self {
        let mut set = Self::new();
        for label in labels.labels() {
            set.ensure(label);
        }
        set
    }

    fn ensure(&mut self, label: &str) -> &mut ClassResults {
        let pos = match self.classes.iter().position(|c| c.label == label) {
            Some(pos) => pos,
            None => {
                self.classes.push(ClassResults {
                    label: label.to_string(),
                    results: Vec::new(),
                });
                self.classes.len() - 1
            }
        };
        &mut self.classes[pos]
    }

    /// Append a result under its `correct_label`.
    pub fn push(&mut self, result: TestResult) {
        let label = result.correct_label.clone();
        self.ensure(&label).results.push(result);
    }

    /// Results for a label, if the label is present.
    pub fn get(&self, label: &str) -> Option<&[TestResult]> {
        self.classes
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.results.as_slice())
    }

    /// Iterate `(label, results)` in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TestResult])> {
        self.classes
            .iter()
            .map(|c| (c.label.as_str(), c.results.as_slice()))
    }

    /// Number of labels.
    pub fn label_count(&self) -> usize {
        self.classes.len()
    }

    /// Total number of results across all labels.
    pub fn len(&self) -> usize {
        self.classes.iter().map(|c| c.results.len()).sum()
    }

    /// Whether no results have been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn result(truth: &str, predicted: &str, confidences: Vec<f32>) -> TestResult {
        TestResult {
            prediction: truth == predicted,
            correct_label: truth.to_string(),
            predicted_label: predicted.to_string(),
            class_confidences: confidences,
            features: vec![0.5; 4],
        }
    }

    #[test]
    fn test_for_labels_keeps_file_order() {
        let labels = LabelIndex::from_lines(["zebra", "apple", "mango"]);
        let set = ResultSet::for_labels(&labels);
        let order: Vec<&str> = set.iter().map(|(label, _)| label).collect();
        assert_eq!(order, vec!["zebra", "apple", "mango"]);
        assert!(set.is_empty());
    }

    #[test]
    fn test_push_groups_by_truth() {
        let labels = LabelIndex::from_lines(["cat", "dog"]);
        let mut set = ResultSet::for_labels(&labels);
        set.push(result("dog", "dog", vec![0.1, 0.9]));
        set.push(result("cat", "dog", vec![0.4, 0.6]));
        set.push(result("dog", "cat", vec![0.7, 0.3]));

        assert_eq!(set.len(), 3);
        assert_eq!(set.get("cat").unwrap().len(), 1);
        let dogs = set.get("dog").unwrap();
        assert_eq!(dogs.len(), 2);
        assert!(dogs[0].prediction);
        assert!(!dogs[1].prediction);
    }

    #[test]
    fn test_push_unregistered_label_appends() {
        let mut set = ResultSet::new();
        set.push(result("owl", "owl", vec![1.0]));
        assert_eq!(set.label_count(), 1);
        assert!(set.get("owl").is_some());
        assert!(set.get("cat").is_none());
    }
}
