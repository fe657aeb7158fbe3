//! Sequential evaluation of sampled test files.

use crate::dataset::LabelIndex;
use crate::error::Result;
use crate::inference::InferenceRunner;
use crate::types::{EvaluationStats, TestResult, TestSample};

use super::results::ResultSet;
use super::verdict::eval_result;

/// Options for controlling an evaluation run.
#[derive(Debug, Clone)]
pub struct EvaluationOptions {
    /// Log progress every N samples
    pub notify_interval: usize,
    /// Log and skip samples that fail instead of aborting the run
    pub skip_failures: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            notify_interval: 20,
            skip_failures: false,
        }
    }
}

/// Output of a finished run.
#[derive(Debug, Clone)]
pub struct EvaluationRun {
    pub results: ResultSet,
    pub stats: EvaluationStats,
}

/// Classifies test samples one at a time and groups the results by label.
pub struct Evaluator<'a> {
    runner: &'a InferenceRunner,
    labels: &'a LabelIndex,
    options: EvaluationOptions,
}

impl<'a> Evaluator<'a> {
    pub fn new(runner: &'a InferenceRunner, labels: &'a LabelIndex, options: EvaluationOptions) -> Self {
        Self {
            runner,
            labels,
            options,
        }
    }

    /// Classify one sample and judge it against its folder label.
    pub async fn evaluate_sample(&self, sample: &TestSample) -> Result<TestResult> {
        let inference = self.runner.infer(&sample.path).await?;
        let verdict = eval_result(&inference.confidences, sample.index, self.labels)?;
        Ok(TestResult::new(verdict, inference))
    }

    /// Evaluate every sample in order.
    ///
    /// `on_progress` is called with the number of samples handled so far after
    /// each one. The first failure aborts the run unless `skip_failures` is set.
    pub async fn run<F>(&self, samples: &[TestSample], mut on_progress: F) -> Result<EvaluationRun>
    where
        F: FnMut(usize),
    {
        let mut results = ResultSet::for_labels(self.labels);
        let mut stats = EvaluationStats::default();
        let notify_interval = self.options.notify_interval.max(1);

        for (count, sample) in samples.iter().enumerate() {
            if count % notify_interval == 0 {
                tracing::info!("processed {}, {} more to go", count, samples.len() - count);
            }

            match self.evaluate_sample(sample).await {
                Ok(result) => {
                    stats.succeeded += 1;
                    if result.prediction {
                        stats.correct += 1;
                    }
                    results.push(result);
                }
                Err(e) if self.options.skip_failures => {
                    stats.failed += 1;
                    tracing::error!("Failed: {:?} - {}", sample.path, e);
                }
                Err(e) => return Err(e),
            }

            on_progress(count + 1);
        }

        tracing::info!(
            "Evaluated {} samples ({} correct, {} failed)",
            stats.succeeded,
            stats.correct,
            stats.failed
        );
        Ok(EvaluationRun { results, stats })
    }
}
