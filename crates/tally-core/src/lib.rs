//! Tally Core - evaluation library for retrained image classifiers.
//!
//! Tally samples a labelled test directory, classifies each file with an
//! exported model, and reports how well the predictions match the folder
//! labels.
//!
//! # Architecture
//!
//! ```text
//! Labels + Test dir → Sample → Validate → Decode → Preprocess → Classify
//!                   → Verdict → ResultSet → Confusion matrix → Report
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use tally_core::{
//!     sample_test_files, summarize_results, ChartRenderer, Config, EvaluationOptions,
//!     Evaluator, InferenceRunner, LabelIndex, SummaryWriter,
//! };
//!
//! #[tokio::main]
//! async fn main() -> tally_core::Result<()> {
//!     let config = Config::load()?;
//!     let labels = LabelIndex::load(&config.label_path())?;
//!     let samples = sample_test_files(&config.test_dir(), &labels, 50)?;
//!
//!     let runner = InferenceRunner::load(&config)?;
//!     let run = Evaluator::new(&runner, &labels, EvaluationOptions::default())
//!         .run(&samples, |_| {})
//!         .await?;
//!
//!     let mut writer = SummaryWriter::create(&config.report_dir(), 30)?;
//!     let summary = summarize_results(
//!         &run.results,
//!         &labels,
//!         &mut writer,
//!         &ChartRenderer::from_config(&config.report),
//!     )?;
//!     writer.close()?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod inference;
pub mod math;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod types;

pub use config::Config;
pub use dataset::{count_by_label, sample_test_files, LabelIndex, TestSampler};
pub use error::{ConfigError, DatasetError, MetricsError, PipelineError, Result, TallyError};
pub use evaluation::{
    aggregate, eval_result, extract_class, Aggregate, EvaluationOptions, EvaluationRun,
    Evaluator, ResultSet, ResultStore,
};
pub use inference::{Classifier, InferenceRunner, OnnxClassifier};
pub use metrics::{precision, sensitivity, ConfusionMatrix, EvaluationSummary};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::PreprocessParams;
pub use report::{summarize_results, BarLabels, ChartRenderer, SummaryWriter};
pub use types::{EvaluationStats, Inference, TestResult, TestSample, Verdict};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
