//! The `tally evaluate` command: classify the test set and write the report.

mod progress;
mod setup;

use clap::Args;
use std::path::PathBuf;
use std::time::Instant;
use tally_core::{
    count_by_label, sample_test_files, summarize_results, ChartRenderer, Config,
    EvaluationOptions, EvaluationRun, Evaluator, InferenceRunner, LabelIndex, ResultSet,
    ResultStore, SummaryWriter,
};

use progress::{create_progress_bar, print_run_summary};
use setup::apply_overrides;

/// Arguments for the `evaluate` command.
#[derive(Args, Debug, Default)]
pub struct EvaluateArgs {
    /// Directory holding the exported graph; the report is written beneath it
    #[arg(long, env = "TALLY_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Label file, one class name per line
    #[arg(long)]
    pub labels: Option<PathBuf>,

    /// Test directory with one subdirectory per label
    #[arg(long)]
    pub test_dir: Option<PathBuf>,

    /// Where to save the per-image results
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Summarize a previously saved result file instead of running inference
    #[arg(long)]
    pub results: Option<PathBuf>,

    /// Maximum number of test files per label
    #[arg(short = 'n', long)]
    pub num_test: Option<usize>,

    /// Log progress every N images
    #[arg(long)]
    pub notify_interval: Option<usize>,

    /// Skip images that fail instead of aborting the run
    #[arg(long)]
    pub skip_failures: bool,

    /// Don't print the confusion matrix and statistics
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the evaluate command.
pub async fn execute(args: EvaluateArgs) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    apply_overrides(&mut config, &args)?;

    let label_path = config.label_path();
    let labels = LabelIndex::load(&label_path)?;
    if labels.is_empty() {
        anyhow::bail!("Label file {} has no labels", label_path.display());
    }
    tracing::info!("Loaded {} labels from {:?}", labels.len(), label_path);

    match &args.results {
        Some(path) => {
            let results = ResultStore::load(path)?;
            write_report(&config, &labels, &results, args.quiet)
        }
        None => {
            let run = run_inference(&config, &labels).await?;
            write_report(&config, &labels, &run.results, args.quiet)?;
            save_results(&config, &run.results)
        }
    }
}

/// Save per-image results. Runs after the report so that an output path
/// inside the recreated report directory survives.
fn save_results(config: &Config, results: &ResultSet) -> anyhow::Result<()> {
    let path = config.result_path();
    ResultStore::save(&path, results)?;
    tracing::info!("Saved results to {:?}", path);
    Ok(())
}

/// Sample the test directory and classify every picked file.
async fn run_inference(config: &Config, labels: &LabelIndex) -> anyhow::Result<EvaluationRun> {
    let test_dir = config.test_dir();
    let samples = sample_test_files(&test_dir, labels, config.evaluation.samples_per_class)?;
    for (label, count) in count_by_label(&samples) {
        tracing::info!("{label}: {count} test files");
    }
    if samples.is_empty() {
        tracing::warn!("No test files found under {:?}", test_dir);
    }

    let runner = InferenceRunner::load(config)?;
    let options = EvaluationOptions {
        notify_interval: config.evaluation.notify_interval,
        skip_failures: config.evaluation.skip_failures,
    };
    let evaluator = Evaluator::new(&runner, labels, options);

    let progress = create_progress_bar(samples.len() as u64);
    let start = Instant::now();
    let run = evaluator
        .run(&samples, |done| {
            progress.set_position(done as u64);
            let elapsed = start.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                progress.set_message(format!("{:.1} img/sec", done as f64 / elapsed));
            }
        })
        .await;
    progress.finish_and_clear();

    let run = run?;
    print_run_summary(&run.stats, start.elapsed());
    Ok(run)
}

/// Recreate the report directory and fill it from `results`.
fn write_report(
    config: &Config,
    labels: &LabelIndex,
    results: &ResultSet,
    quiet: bool,
) -> anyhow::Result<()> {
    let report_dir = config.report_dir();
    let mut writer = SummaryWriter::create(&report_dir, config.report.histogram_buckets)?;
    let renderer = ChartRenderer::from_config(&config.report);
    let summary = summarize_results(results, labels, &mut writer, &renderer)?;
    writer.close()?;

    if config.report.print_results && !quiet {
        println!("{summary}");
    }
    eprintln!("Report written to {}", report_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tally_core::TestResult;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: EvaluateArgs,
    }

    #[test]
    fn test_defaults_defer_to_config() {
        let cli = TestCli::parse_from(["tally"]);
        assert!(cli.args.model_dir.is_none());
        assert!(cli.args.results.is_none());
        assert!(cli.args.num_test.is_none());
        assert!(!cli.args.skip_failures);
        assert!(!cli.args.quiet);
    }

    #[test]
    fn test_flags_parse() {
        let cli = TestCli::parse_from([
            "tally",
            "--labels",
            "labels.txt",
            "-n",
            "10",
            "--skip-failures",
            "-q",
        ]);
        assert_eq!(cli.args.labels, Some(PathBuf::from("labels.txt")));
        assert_eq!(cli.args.num_test, Some(10));
        assert!(cli.args.skip_failures);
        assert!(cli.args.quiet);
    }

    #[test]
    fn test_write_report_from_saved_results() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.general.model_dir = dir.path().to_path_buf();

        let labels = LabelIndex::from_lines(["cat", "dog"]);
        let mut results = ResultSet::for_labels(&labels);
        results.push(TestResult {
            prediction: true,
            correct_label: "dog".into(),
            predicted_label: "dog".into(),
            class_confidences: vec![0.25, 0.75],
            features: vec![],
        });

        write_report(&config, &labels, &results, true).unwrap();
        let report = config.report_dir();
        assert!(report.join("Confusion_Matrix.png").exists());
        assert!(report.join("Precision.png").exists());
        assert!(report.join("metrics.json").exists());
    }

    #[test]
    fn test_results_saved_inside_report_dir_survive() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.general.model_dir = dir.path().to_path_buf();
        config.evaluation.result_path = config.report_dir().join("results.json");

        let labels = LabelIndex::from_lines(["cat", "dog"]);
        let mut results = ResultSet::for_labels(&labels);
        results.push(TestResult {
            prediction: false,
            correct_label: "cat".into(),
            predicted_label: "dog".into(),
            class_confidences: vec![0.25, 0.75],
            features: vec![],
        });

        write_report(&config, &labels, &results, true).unwrap();
        save_results(&config, &results).unwrap();
        // a second run recreates the report dir before saving again
        write_report(&config, &labels, &results, true).unwrap();
        save_results(&config, &results).unwrap();

        let loaded = ResultStore::load(&config.result_path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(config.report_dir().join("metrics.json").exists());
    }
}
