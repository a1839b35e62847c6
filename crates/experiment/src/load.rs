//! Loading an experiment's files through a [`DatasetEngine`].
//!
//! ## Pipeline
//!
//! ```text
//! case_space ──► path ──► engine.open ──► preprocess ──► CaseMap
//!                                                          │ master
//!                                                          ▼
//!                            concat along last case, ..., first case
//! ```
//!
//! Cases are read one at a time in case-space order. The first failure stops
//! the load and is reported with the combination that caused it.

use std::path::PathBuf;

use casegrid_dataset::{DatasetEngine, NewDim};
use indexmap::IndexMap;
use tracing::{debug, info, info_span};

use crate::error::ExperimentError;
use crate::experiment::{Experiment, check_label};
use crate::space::Combination;

/// A per-case transform applied right after a file is opened.
pub type PreprocessFn<'a, D, E> = dyn FnMut(D, &Combination) -> Result<D, E> + 'a;

/// Owned form of [`PreprocessFn`].
pub type Preprocess<'a, D, E> = Box<PreprocessFn<'a, D, E>>;

// ---------------------------------------------------------------------------
// LoadOptions
// ---------------------------------------------------------------------------

/// Options for [`Experiment::load`].
pub struct LoadOptions<'a, E: DatasetEngine> {
    preprocess: Option<Preprocess<'a, E::Dataset, E::Error>>,
    master: bool,
}

impl<E: DatasetEngine> Default for LoadOptions<'_, E> {
    fn default() -> Self {
        Self {
            preprocess: None,
            master: false,
        }
    }
}

impl<'a, E: DatasetEngine> LoadOptions<'a, E> {
    /// Apply `f` to every dataset as soon as it is opened, before it is
    /// stored or merged.
    pub fn with_preprocess<F>(mut self, f: F) -> Self
    where
        F: FnMut(E::Dataset, &Combination) -> Result<E::Dataset, E::Error> + 'a,
    {
        self.preprocess = Some(Box::new(f));
        self
    }

    /// Merge every case into one dataset with a dimension per case.
    pub fn with_master(mut self, master: bool) -> Self {
        self.master = master;
        self
    }
}

// ---------------------------------------------------------------------------
// Loaded / CaseMap
// ---------------------------------------------------------------------------

/// Result of [`Experiment::load`].
#[derive(Debug, Clone)]
pub enum Loaded<D> {
    /// One dataset per combination, in case-space order.
    Cases(CaseMap<D>),
    /// All combinations merged along one new dimension per case.
    Master(D),
}

impl<D> Loaded<D> {
    /// Whether this is a merged master dataset.
    pub fn is_master(&self) -> bool {
        matches!(self, Loaded::Master(_))
    }

    /// The per-case mapping, if the load was not merged.
    pub fn into_cases(self) -> Option<CaseMap<D>> {
        match self {
            Loaded::Cases(cases) => Some(cases),
            Loaded::Master(_) => None,
        }
    }

    /// The master dataset, if the load was merged.
    pub fn into_master(self) -> Option<D> {
        match self {
            Loaded::Master(master) => Some(master),
            Loaded::Cases(_) => None,
        }
    }
}

/// Datasets keyed by combination, iterated in insertion order.
#[derive(Debug, Clone)]
pub struct CaseMap<D> {
    entries: IndexMap<Combination, D>,
}

impl<D> Default for CaseMap<D> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<D> CaseMap<D> {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_capacity(n: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(n),
        }
    }

    /// Insert a dataset, returning the one it replaced.
    pub fn insert(&mut self, combination: Combination, dataset: D) -> Option<D> {
        self.entries.insert(combination, dataset)
    }

    /// Dataset for the combination `values` (one value per case, in order).
    pub fn get<S: AsRef<str>>(&self, values: &[S]) -> Option<&D> {
        let key = Combination::new(values.iter().map(|v| v.as_ref().to_string()).collect());
        self.entries.get(&key)
    }

    /// Number of datasets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(combination, dataset)` pairs.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Combination, D> {
        self.entries.iter()
    }

    /// Combinations in order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, Combination, D> {
        self.entries.keys()
    }

    /// Datasets in order.
    pub fn values(&self) -> indexmap::map::Values<'_, Combination, D> {
        self.entries.values()
    }

    /// Consume into the datasets, in order.
    pub fn into_values(self) -> indexmap::map::IntoValues<Combination, D> {
        self.entries.into_values()
    }

    /// Apply `f` to every dataset.
    pub fn map<T, F>(self, mut f: F) -> CaseMap<T>
    where
        F: FnMut(&Combination, D) -> T,
    {
        self.entries
            .into_iter()
            .map(|(combo, ds)| {
                let out = f(&combo, ds);
                (combo, out)
            })
            .collect()
    }

    /// Apply a fallible `f` to every dataset, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_map<T, E, F>(self, mut f: F) -> Result<CaseMap<T>, E>
    where
        F: FnMut(&Combination, D) -> Result<T, E>,
    {
        self.entries
            .into_iter()
            .map(|(combo, ds)| f(&combo, ds).map(|out| (combo, out)))
            .collect()
    }
}

impl<D> FromIterator<(Combination, D)> for CaseMap<D> {
    fn from_iter<I: IntoIterator<Item = (Combination, D)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<D> IntoIterator for CaseMap<D> {
    type Item = (Combination, D);
    type IntoIter = indexmap::map::IntoIter<Combination, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, D> IntoIterator for &'a CaseMap<D> {
    type Item = (&'a Combination, &'a D);
    type IntoIter = indexmap::map::Iter<'a, Combination, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Experiment: load / merge / split
// ---------------------------------------------------------------------------

impl Experiment {
    /// Open the `label` file of every combination with `engine`.
    ///
    /// Files are opened in case-space order, each passed through the
    /// preprocess step (if any) before the next is read. With
    /// [`LoadOptions::with_master`] the results are merged into one dataset
    /// whose leading dimensions are the case keys, in case order, with the
    /// case values as coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::InvalidLabel`] for an unusable label,
    /// [`ExperimentError::Load`] for the first file the engine cannot open,
    /// [`ExperimentError::Preprocess`] if the transform fails, and
    /// [`ExperimentError::Merge`] if merging fails. No partial result is
    /// returned.
    pub fn load<E: DatasetEngine>(
        &self,
        engine: &E,
        label: &str,
        options: LoadOptions<'_, E>,
    ) -> Result<Loaded<E::Dataset>, ExperimentError> {
        check_label(label)?;

        let span = info_span!("load", experiment = %self.name(), label);
        let _enter = span.enter();

        let LoadOptions {
            mut preprocess,
            master,
        } = options;

        let space = self.case_space();
        info!(n_files = space.len(), master, "loading experiment");

        let mut cases = CaseMap::with_capacity(space.len());
        for (index, combo) in space.iter().enumerate() {
            let dataset = self.open_case(engine, label, index, &combo, preprocess.as_deref_mut())?;
            cases.insert(combo, dataset);
        }

        if master {
            self.merge(engine, cases).map(Loaded::Master)
        } else {
            Ok(Loaded::Cases(cases))
        }
    }

    /// Open the `label` file of a single combination.
    ///
    /// # Errors
    ///
    /// As [`path_for`](Self::path_for) for bad `values` or `label`, then as
    /// [`load`](Self::load).
    pub fn load_case<E: DatasetEngine, S: AsRef<str>>(
        &self,
        engine: &E,
        label: &str,
        values: &[S],
        preprocess: Option<&mut PreprocessFn<'_, E::Dataset, E::Error>>,
    ) -> Result<E::Dataset, ExperimentError> {
        self.check_values(values)?;
        check_label(label)?;
        let index = self.case_space().index_of(values).unwrap_or_default();
        let combo = Combination::new(values.iter().map(|v| v.as_ref().to_string()).collect());
        self.open_case(engine, label, index, &combo, preprocess)
    }

    fn open_case<E: DatasetEngine>(
        &self,
        engine: &E,
        label: &str,
        index: usize,
        combo: &Combination,
        preprocess: Option<&mut PreprocessFn<'_, E::Dataset, E::Error>>,
    ) -> Result<E::Dataset, ExperimentError> {
        let path: PathBuf = self.render_path(combo.values(), label);
        debug!(index, combination = %combo, path = %path.display(), "opening case");

        let dataset = engine.open(&path).map_err(|e| ExperimentError::Load {
            index,
            combination: combo.clone(),
            path,
            source: Box::new(e),
        })?;

        match preprocess {
            Some(f) => f(dataset, combo).map_err(|e| ExperimentError::Preprocess {
                index,
                combination: combo.clone(),
                source: Box::new(e),
            }),
            None => Ok(dataset),
        }
    }

    /// Merge one dataset per combination into a master dataset.
    ///
    /// Datasets are concatenated along the last case first, so the outermost
    /// dimension of the result is the first case. Each new dimension is named
    /// after its case key, labeled with the case values in declared order and
    /// carries the case's long name.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::Config`] if `cases` is missing a combination
    /// of the case space or holds one outside it, and
    /// [`ExperimentError::Merge`] if the engine cannot concatenate.
    pub fn merge<E: DatasetEngine>(
        &self,
        engine: &E,
        cases: CaseMap<E::Dataset>,
    ) -> Result<E::Dataset, ExperimentError> {
        let span = info_span!("merge", experiment = %self.name());
        let _enter = span.enter();

        let mut entries = cases.entries;
        let mut level = Vec::with_capacity(entries.len());
        for combo in self.case_space() {
            let dataset = entries
                .swap_remove(&combo)
                .ok_or_else(|| ExperimentError::Config {
                    reason: format!("no dataset for case {combo}"),
                })?;
            level.push(dataset);
        }
        if !entries.is_empty() {
            return Err(ExperimentError::Config {
                reason: format!(
                    "{} dataset(s) do not belong to the case space of '{}'",
                    entries.len(),
                    self.name()
                ),
            });
        }

        for case in self.cases().iter().rev() {
            let new_dim = NewDim::new(case.key(), case.values().to_vec())
                .with_long_name(case.long_name());
            let mut rest = level.into_iter();
            let mut next = Vec::new();
            loop {
                let group: Vec<E::Dataset> = rest.by_ref().take(case.len()).collect();
                if group.is_empty() {
                    break;
                }
                let merged = engine
                    .concat(group, &new_dim)
                    .map_err(|e| ExperimentError::Merge {
                        dim: case.key().to_string(),
                        source: Box::new(e),
                    })?;
                next.push(merged);
            }
            debug!(dim = case.key(), n_datasets = next.len(), "merged along case");
            level = next;
        }

        let master = level.pop().ok_or_else(|| ExperimentError::Config {
            reason: "merge produced no dataset".to_string(),
        })?;
        info!(n_dims = self.cases().len(), "master dataset built");
        Ok(master)
    }

    /// Select every combination back out of a master dataset.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::Select`] if a case dimension or value is
    /// absent from `master`.
    pub fn split<E: DatasetEngine>(
        &self,
        engine: &E,
        master: &E::Dataset,
    ) -> Result<CaseMap<E::Dataset>, ExperimentError> {
        let space = self.case_space();
        let mut cases = CaseMap::with_capacity(space.len());
        for combo in space {
            let mut current: Option<E::Dataset> = None;
            for (case, value) in self.cases().iter().zip(combo.values()) {
                let source = current.as_ref().unwrap_or(master);
                let selected = engine.select(source, case.key(), value).map_err(|e| {
                    ExperimentError::Select {
                        combination: combo.clone(),
                        source: Box::new(e),
                    }
                })?;
                current = Some(selected);
            }
            let dataset = current.ok_or_else(|| ExperimentError::Config {
                reason: format!("experiment '{}' has no cases", self.name()),
            })?;
            cases.insert(combo, dataset);
        }
        Ok(cases)
    }
}
