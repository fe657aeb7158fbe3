//! Test file sampling from a `root/label/file` directory tree.

use std::io;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::DatasetError;
use crate::types::TestSample;

use super::labels::LabelIndex;

/// Picks up to `samples_per_class` files from every label folder.
///
/// Selection is the first N entries in file-name order, so repeated runs over
/// the same tree evaluate the same images.
pub struct TestSampler {
    samples_per_class: usize,
}

impl TestSampler {
    /// Create a sampler taking at most `samples_per_class` files per label.
    pub fn new(samples_per_class: usize) -> Self {
        Self { samples_per_class }
    }

    /// Walk `root` and collect test samples.
    ///
    /// Files directly under `root` are ignored. A label folder containing a
    /// subdirectory fails the whole walk with `InvalidDirectoryStructure`;
    /// an empty label folder simply contributes nothing.
    pub fn sample(&self, root: &Path, labels: &LabelIndex) -> Result<Vec<TestSample>, DatasetError> {
        let meta = std::fs::metadata(root).map_err(|source| DatasetError::MissingFile {
            path: root.to_path_buf(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(DatasetError::MissingFile {
                path: root.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
            });
        }

        let mut samples = Vec::new();
        // (label, index, files taken so far) for the folder being walked
        let mut current: Option<(String, usize, usize)> = None;

        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(2)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                DatasetError::MissingFile {
                    path,
                    source: e.into(),
                }
            })?;
            let is_dir = entry.file_type().is_dir();

            match (entry.depth(), is_dir) {
                (1, true) => {
                    let label = entry.file_name().to_string_lossy().into_owned();
                    let index =
                        labels
                            .index_of(&label)
                            .ok_or_else(|| DatasetError::UnknownLabel {
                                label: label.clone(),
                                dir: entry.path().to_path_buf(),
                            })?;
                    current = Some((label, index, 0));
                }
                (1, false) => {
                    tracing::trace!("Ignoring file outside label folders: {:?}", entry.path());
                    current = None;
                }
                (_, true) => {
                    return Err(DatasetError::InvalidDirectoryStructure {
                        path: entry.path().to_path_buf(),
                    });
                }
                (_, false) => {
                    if let Some((label, index, taken)) = current.as_mut() {
                        if *taken < self.samples_per_class {
                            samples.push(TestSample {
                                label: label.clone(),
                                index: *index,
                                path: entry.path().to_path_buf(),
                            });
                            *taken += 1;
                        }
                    }
                }
            }
        }

        tracing::debug!("Sampled {} test files from {:?}", samples.len(), root);
        Ok(samples)
    }
}

/// Sample up to `n` files per label folder under `root`.
pub fn sample_test_files(
    root: &Path,
    labels: &LabelIndex,
    n: usize,
) -> Result<Vec<TestSample>, DatasetError> {
    TestSampler::new(n).sample(root, labels)
}

/// Count samples per label, in order of first appearance.
pub fn count_by_label(samples: &[TestSample]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for sample in samples {
        match counts.iter_mut().find(|(label, _)| *label == sample.label) {
            Some((_, count)) => *count += 1,
            None => counts.push((sample.label.clone(), 1)),
        }
    }
    counts
}
