//! The capability contract between an experiment and its dataset backend.

use std::path::Path;

use crate::dataset::NewDim;

/// An array-dataset engine: opens files into labeled datasets and merges
/// them along new dimensions.
///
/// The experiment layer only ever talks to a backend through this trait, so
/// the on-disk format and the in-memory representation stay swappable.
pub trait DatasetEngine {
    /// In-memory dataset produced by [`open`](Self::open).
    type Dataset;

    /// Error reported by every engine operation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open the file at `path` into a dataset.
    fn open(&self, path: &Path) -> Result<Self::Dataset, Self::Error>;

    /// Stack `datasets` along a new leading dimension described by `new_dim`.
    ///
    /// `datasets[i]` is labeled `new_dim.labels()[i]`.
    fn concat(
        &self,
        datasets: Vec<Self::Dataset>,
        new_dim: &NewDim,
    ) -> Result<Self::Dataset, Self::Error>;

    /// Select the slice labeled `label` along `dim`, dropping the dimension.
    fn select(
        &self,
        dataset: &Self::Dataset,
        dim: &str,
        label: &str,
    ) -> Result<Self::Dataset, Self::Error>;
}
