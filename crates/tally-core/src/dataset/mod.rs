//! Test data: the label file and the labelled test directory.
//!
//! - **labels**: bidirectional label ↔ class index mapping
//! - **sampler**: deterministic first-N selection per label folder

pub mod labels;
pub mod sampler;

pub use labels::LabelIndex;
pub use sampler::{count_by_label, sample_test_files, TestSampler};
