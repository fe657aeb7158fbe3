//! The `tally sample` command: list the test files an evaluation would use.

use clap::{Args, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tally_core::{
    count_by_label, sample_test_files, Config, LabelIndex, OutputFormat as CoreOutputFormat,
    OutputWriter,
};

/// Listing formats.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// One JSON array
    #[default]
    Json,
    /// One JSON object per line
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Arguments for the `sample` command.
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Test directory with one subdirectory per label
    pub test_dir: PathBuf,

    /// Label file (defaults to the configured label path)
    #[arg(long)]
    pub labels: Option<PathBuf>,

    /// Maximum number of test files per label
    #[arg(short = 'n', long)]
    pub num_test: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

/// Execute the sample command.
pub async fn execute(args: SampleArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let label_path = args.labels.clone().unwrap_or_else(|| config.label_path());
    let num_test = args.num_test.unwrap_or(config.evaluation.samples_per_class);
    if num_test == 0 {
        anyhow::bail!("--num-test must be at least 1");
    }

    let labels = LabelIndex::load(&label_path)?;
    let samples = sample_test_files(&args.test_dir, &labels, num_test)?;

    let stdout = std::io::stdout();
    let mut writer = OutputWriter::new(stdout.lock(), args.format.into(), true);
    writer.write_all(&samples)?;
    writer.flush()?;

    let mut stderr = std::io::stderr().lock();
    for (label, count) in count_by_label(&samples) {
        writeln!(stderr, "  {label:<24} {count:>6}")?;
    }
    writeln!(stderr, "  {:<24} {:>6}", "total", samples.len())?;
    Ok(())
}
