use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// casegrid: map simulation case spaces to files and load them.
#[derive(Parser)]
#[command(
    name = "casegrid",
    version,
    about = "Map simulation case spaces to files and load them"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the experiment document (YAML, or TOML by extension).
    #[arg(short, long, global = true, default_value = "experiment.yaml")]
    pub config: PathBuf,

    /// Skip the directory check when building the experiment.
    #[arg(long, global = true)]
    pub no_validate: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Print the experiment summary and case-space size.
    Show,
    /// Print the resolved file path of every case.
    Paths(PathsArgs),
    /// Create the data directory and every case directory.
    Scaffold,
    /// Load every case through the NetCDF engine.
    Load(LoadArgs),
}

/// Arguments for the `paths` subcommand.
#[derive(clap::Args)]
pub struct PathsArgs {
    /// File label (variable name or timestamp) substituted into file names.
    #[arg(short, long)]
    pub label: String,

    /// Only print files that do not exist.
    #[arg(long)]
    pub missing: bool,
}

/// Arguments for the `load` subcommand.
#[derive(clap::Args)]
pub struct LoadArgs {
    /// File label (variable name or timestamp) substituted into file names.
    #[arg(short, long)]
    pub label: String,

    /// Merge every case into one dataset with a dimension per case.
    #[arg(long)]
    pub master: bool,

    /// Only read these variables (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub vars: Vec<String>,

    /// Write the master dataset to this NetCDF file.
    #[arg(short, long, requires = "master")]
    pub output: Option<PathBuf>,
}
