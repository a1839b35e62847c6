use anyhow::{Context, Result};
use casegrid_dataset::NetcdfEngine;
use casegrid_experiment::{Experiment, LoadOptions, Loaded};
use tracing::info;

use crate::cli::LoadArgs;

/// Load every case of `experiment` and print what was read.
pub fn run(experiment: &Experiment, args: &LoadArgs) -> Result<()> {
    let mut engine = NetcdfEngine::default();
    if !args.vars.is_empty() {
        engine = engine.with_variables(args.vars.iter().cloned());
    }

    let options = LoadOptions::default().with_master(args.master);
    let loaded = experiment
        .load(&engine, &args.label, options)
        .with_context(|| format!("failed to load '{}' for {}", args.label, experiment.name()))?;

    match loaded {
        Loaded::Master(master) => {
            println!("{master}");
            if let Some(output) = &args.output {
                engine
                    .write(&master, output)
                    .with_context(|| format!("failed to write {}", output.display()))?;
                info!(path = %output.display(), "master dataset written");
            }
        }
        Loaded::Cases(cases) => {
            for (combination, dataset) in &cases {
                let dims: Vec<String> = dataset
                    .dims()
                    .iter()
                    .map(|(name, len)| format!("{name}: {len}"))
                    .collect();
                let vars: Vec<&str> = dataset.variables().keys().map(String::as_str).collect();
                println!("{combination}  ({})  [{}]", dims.join(", "), vars.join(", "));
            }
            info!(n_cases = cases.len(), "cases loaded");
        }
    }
    Ok(())
}
