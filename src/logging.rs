//! Diagnostic output for the `casegrid` binary.
//!
//! Experiment loading logs through `tracing`; this module only decides what
//! reaches stderr. `-v` flags raise the level of the casegrid crates, and a
//! `RUST_LOG` directive replaces that choice entirely.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Log targets of the binary and the two library crates.
const TARGETS: [&str; 3] = ["casegrid", "casegrid_dataset", "casegrid_experiment"];

/// Level selected by repeated `-v` flags, starting at `warn`.
fn level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Filter directives enabling `level` for the casegrid targets only, so
/// netcdf and other dependencies stay quiet.
fn directives(level: LevelFilter) -> String {
    let level = level.to_string().to_ascii_lowercase();
    TARGETS.map(|target| format!("{target}={level}")).join(",")
}

/// Install the stderr subscriber. Case labels and paths are recorded as
/// fields, so targets are only shown from `-vv` on.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(level(verbosity))));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .init();
}
