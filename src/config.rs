use std::path::Path;

use anyhow::{Context, Result};
use casegrid_experiment::{Experiment, ExperimentConfig};

/// Read the experiment document at `path` and build the experiment.
///
/// `validate` can only turn the directory check off; a document that
/// disables it stays unvalidated.
pub fn open_experiment(path: &Path, validate: bool) -> Result<Experiment> {
    let mut config = ExperimentConfig::read(path)
        .with_context(|| format!("failed to read experiment: {}", path.display()))?;
    config.validate_data &= validate;
    config
        .into_experiment()
        .with_context(|| format!("invalid experiment: {}", path.display()))
}
