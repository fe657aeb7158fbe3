//! Tally CLI - evaluate a retrained image classifier against a labelled test set.
//!
//! Tally samples up to N images per label folder, classifies each one with
//! the exported graph, and writes a confusion matrix, per-class precision and
//! sensitivity, and confidence histograms.
//!
//! # Usage
//!
//! ```bash
//! # Evaluate with paths from the config file
//! tally evaluate
//!
//! # Override paths and sample size
//! tally evaluate --model-dir ./tmp --labels ./tmp/output_labels.txt \
//!     --test-dir ./test_images --num-test 20
//!
//! # Rebuild the report from saved results
//! tally evaluate --results ./tmp/test_results.json
//!
//! # Preview which files would be evaluated
//! tally sample ./test_images --labels ./tmp/output_labels.txt
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Tally - evaluation reports for retrained image classifiers.
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify the test set and write the evaluation report
    Evaluate(cli::evaluate::EvaluateArgs),

    /// List the test files an evaluation would sample
    Sample(cli::sample::SampleArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't up yet, so config warnings go straight to stderr.
    let config = match tally_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `tally config path`."
            );
            tally_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Tally v{}", tally_core::VERSION);

    match cli.command {
        Commands::Evaluate(args) => cli::evaluate::execute(args).await,
        Commands::Sample(args) => cli::sample::execute(args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["tally", "evaluate", "--quiet", "-v", "--json-logs"]);
        assert!(cli.verbose);
        assert!(cli.json_logs);
        assert!(matches!(cli.command, Commands::Evaluate(ref args) if args.quiet));
    }
}
