//! NetCDF-backed [`DatasetEngine`].

use std::path::Path;

use tracing::debug;

use crate::dataset::{Dataset, NewDim};
use crate::engine::DatasetEngine;
use crate::error::DatasetError;
use crate::{netcdf_read, netcdf_write};

/// Reads NetCDF files into [`Dataset`]s.
///
/// By default every variable is read and CF packing (`_FillValue`,
/// `missing_value`, `scale_factor`, `add_offset`) is decoded. Use
/// [`with_variables`](Self::with_variables) to keep only some data
/// variables and the dimensions they use.
#[derive(Debug, Clone)]
pub struct NetcdfEngine {
    /// Data variables to keep; `None` keeps all of them.
    variables: Option<Vec<String>>,
    /// Whether to apply CF decoding to data variables.
    decode_cf: bool,
}

impl Default for NetcdfEngine {
    fn default() -> Self {
        Self {
            variables: None,
            decode_cf: true,
        }
    }
}

impl NetcdfEngine {
    /// Keep only the named data variables.
    pub fn with_variables<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Enable or disable CF decoding.
    pub fn with_decode_cf(mut self, decode: bool) -> Self {
        self.decode_cf = decode;
        self
    }

    /// Read the NetCDF file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::FileNotFound`] for a missing file,
    /// [`DatasetError::Netcdf`] for unreadable or malformed files, and
    /// [`DatasetError::MissingVariable`] if a requested variable is absent.
    pub fn read(&self, path: &Path) -> Result<Dataset, DatasetError> {
        let file = netcdf_read::open_file(path)?;
        let ds = netcdf_read::read_dataset(&file, self.decode_cf, self.variables.as_deref())?;
        debug!(
            path = %path.display(),
            n_dims = ds.dims().len(),
            n_variables = ds.variables().len(),
            "opened dataset"
        );
        match &self.variables {
            Some(names) => ds.retain_variables(names.as_slice()),
            None => Ok(ds),
        }
    }

    /// Write `ds` to `path` as NetCDF, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Netcdf`] if the file cannot be created or
    /// written.
    pub fn write(&self, ds: &Dataset, path: &Path) -> Result<(), DatasetError> {
        netcdf_write::write_dataset(ds, path)?;
        debug!(path = %path.display(), "wrote dataset");
        Ok(())
    }
}

impl DatasetEngine for NetcdfEngine {
    type Dataset = Dataset;
    type Error = DatasetError;

    fn open(&self, path: &Path) -> Result<Dataset, DatasetError> {
        self.read(path)
    }

    fn concat(&self, datasets: Vec<Dataset>, new_dim: &NewDim) -> Result<Dataset, DatasetError> {
        Dataset::concat(datasets, new_dim)
    }

    fn select(&self, dataset: &Dataset, dim: &str, label: &str) -> Result<Dataset, DatasetError> {
        dataset.select(dim, label)
    }
}
