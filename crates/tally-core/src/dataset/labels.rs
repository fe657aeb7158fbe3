//! Label index built from the retraining step's label file.

use std::collections::HashMap;
use std::path::Path;

use crate::error::DatasetError;

/// Bidirectional mapping between label names and class indices.
///
/// The label file holds one label per line; the line number is the class
/// index the classifier was trained with. Duplicate lines are not rejected:
/// the later index wins in the name → index direction, while the index →
/// name direction keeps every line.
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    labels: Vec<String>,
    indices: HashMap<String, usize>,
}

impl LabelIndex {
    /// Read a label file from disk.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let content = std::fs::read_to_string(path).map_err(|source| DatasetError::MissingFile {
            path: path.to_path_buf(),
            source,
        })?;
        let index = Self::from_lines(content.lines());
        tracing::debug!("Loaded {} labels from {:?}", index.len(), path);
        Ok(index)
    }

    /// Build an index from in-memory lines, stripping surrounding whitespace.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels: Vec<String> = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .collect();

        let mut indices = HashMap::with_capacity(labels.len());
        for (idx, label) in labels.iter().enumerate() {
            indices.insert(label.clone(), idx);
        }

        Self { labels, indices }
    }

    /// Class index for a label name.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.indices.get(label).copied()
    }

    /// Label name for a class index.
    pub fn label_of(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Labels in class-index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of classes (one per line of the label file).
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the label file was empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of distinct label names.
    pub fn unique_len(&self) -> usize {
        self.indices.len()
    }
}
