//! Progress bar and end-of-run summary on stderr.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tally_core::EvaluationStats;

pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("##-"));
    }
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after an inference run.
pub fn print_run_summary(stats: &EvaluationStats, elapsed: Duration) {
    let total = stats.succeeded + stats.failed;
    let rate = if elapsed.as_secs_f64() > 0.0 {
        total as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Evaluation");
    eprintln!("  ====================================");
    eprintln!("    Classified:   {:>8}", stats.succeeded);
    eprintln!("    Correct:      {:>8}", stats.correct);
    if stats.failed > 0 {
        eprintln!("    Failed:       {:>8}", stats.failed);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", total);
    eprintln!("    Accuracy:     {:>8.3}", stats.accuracy());
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    eprintln!("  ====================================");
}
