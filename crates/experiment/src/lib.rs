//! # casegrid-experiment
//!
//! Describe a grid of simulation runs declaratively and load their output.
//!
//! An [`Experiment`] owns an ordered list of [`Case`]s (the axes of the
//! parameter space) and the templates that turn one value per case into a
//! file path. The case space is the Cartesian product of the case values,
//! enumerated with the first case varying slowest.
//!
//! ```text
//! ExperimentConfig (YAML / TOML)
//!   └─ into_experiment()        cases, compiled templates, directory check
//!        ├─ case_space()        Combination iterator
//!        ├─ path_for()          data_dir / case_path / prefix + label + suffix
//!        └─ load()              DatasetEngine::open, preprocess, merge
//! ```
//!
//! ```no_run
//! use casegrid_dataset::NetcdfEngine;
//! use casegrid_experiment::{Case, Experiment, LoadOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let exp = Experiment::builder("scenarios")
//!     .with_case(Case::new("emis", "Emissions scenario", ["low", "high"])?)
//!     .with_case(Case::new("param", "Tuning parameter", ["x", "y", "z"])?)
//!     .with_data_dir("/data")
//!     .with_case_path("emis_{emis}/param_{param}")
//!     .with_output_prefix("{emis}.{param}.")
//!     .build()?;
//!
//! let master = exp
//!     .load(&NetcdfEngine::default(), "TS", LoadOptions::default().with_master(true))?
//!     .into_master();
//! # let _ = master;
//! # Ok(())
//! # }
//! ```

mod case;
mod config;
mod error;
mod experiment;
mod load;
mod space;
mod template;

pub use case::Case;
pub use config::{CaseConfig, ConfigFormat, ExperimentConfig, load as load_config, save as save_config};
pub use error::{BoxError, ExperimentError};
pub use experiment::{Experiment, ExperimentBuilder};
pub use load::{CaseMap, LoadOptions, Loaded, Preprocess, PreprocessFn};
pub use space::{CaseSpace, CaseSpaceIter, Combination};
