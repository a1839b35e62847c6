use anyhow::{Context, Result};
use casegrid_experiment::Experiment;
use tracing::info;

use crate::cli::PathsArgs;

/// Print `combination<TAB>path` for every case, or only the missing ones.
pub fn run(experiment: &Experiment, args: &PathsArgs) -> Result<()> {
    let files = if args.missing {
        experiment.missing_files(&args.label)
    } else {
        experiment.walk_files(&args.label).map(Iterator::collect)
    }
    .with_context(|| format!("cannot resolve paths for label '{}'", args.label))?;

    for (combination, path) in &files {
        println!("{combination}\t{}", path.display());
    }
    info!(n_files = files.len(), missing_only = args.missing, "paths listed");
    Ok(())
}
