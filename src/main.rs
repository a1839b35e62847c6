mod cli;
mod config;
mod load_cmd;
mod logging;
mod paths_cmd;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Show => {
            let experiment = config::open_experiment(&cli.config, !cli.no_validate)?;
            println!("{experiment}");
            println!("{} case combination(s)", experiment.case_space().len());
            Ok(())
        }
        Command::Paths(args) => {
            let experiment = config::open_experiment(&cli.config, !cli.no_validate)?;
            paths_cmd::run(&experiment, &args)
        }
        Command::Scaffold => {
            // The directories are about to be created, so they cannot be checked yet.
            let experiment = config::open_experiment(&cli.config, false)?;
            let n_dirs = experiment
                .create_directories()
                .context("failed to create experiment directories")?;
            info!(n_dirs, "scaffold complete");
            println!(
                "{n_dirs} case director(y/ies) ready under {}",
                experiment.data_dir().display()
            );
            Ok(())
        }
        Command::Load(args) => {
            let experiment = config::open_experiment(&cli.config, !cli.no_validate)?;
            load_cmd::run(&experiment, &args)
        }
    }
}
