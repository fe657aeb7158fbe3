//! Folding command-line flags into the loaded configuration.

use tally_core::Config;

use super::EvaluateArgs;

/// Apply every flag the user passed on top of `config`, then re-validate.
pub fn apply_overrides(config: &mut Config, args: &EvaluateArgs) -> anyhow::Result<()> {
    if let Some(dir) = &args.model_dir {
        config.general.model_dir = dir.clone();
    }
    if let Some(path) = &args.labels {
        config.evaluation.label_path = path.clone();
    }
    if let Some(dir) = &args.test_dir {
        config.evaluation.test_dir = dir.clone();
    }
    if let Some(path) = &args.output {
        config.evaluation.result_path = path.clone();
    }
    if let Some(n) = args.num_test {
        config.evaluation.samples_per_class = n;
    }
    if let Some(n) = args.notify_interval {
        config.evaluation.notify_interval = n;
    }
    if args.skip_failures {
        config.evaluation.skip_failures = true;
    }

    config.validate()?;
    Ok(())
}
