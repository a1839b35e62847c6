//! # casegrid-dataset
//!
//! Labeled in-memory datasets and the engine that reads them from disk.
//!
//! The [`DatasetEngine`] trait is the only surface the experiment layer
//! relies on: open a file, concatenate datasets along a new labeled
//! dimension, and select a labeled slice back out. [`Dataset`] is the
//! in-memory model, and [`NetcdfEngine`] (behind the default `netcdf`
//! feature) fills it from NetCDF files.
//!
//! ```text
//! NetcdfEngine::open()
//!   ├─ netcdf_read::open_file()
//!   ├─ netcdf_read::read_dataset()   coordinates, variables, CF decoding
//!   └─ Dataset::retain_variables()   optional variable subset
//! ```

mod dataset;
mod engine;
mod error;
#[cfg(feature = "netcdf")]
mod netcdf_engine;
#[cfg(feature = "netcdf")]
mod netcdf_read;
#[cfg(feature = "netcdf")]
mod netcdf_write;

pub use dataset::{AttrValue, Attrs, CoordValues, Coordinate, Dataset, NewDim, Variable};
pub use engine::DatasetEngine;
pub use error::DatasetError;
#[cfg(feature = "netcdf")]
pub use netcdf_engine::NetcdfEngine;
