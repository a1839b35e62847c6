//! The experiment: cases plus the templates that place them on disk.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::case::{Case, check_token};
use crate::error::ExperimentError;
use crate::space::{CaseSpace, Combination};
use crate::template::Template;

// ---------------------------------------------------------------------------
// ExperimentBuilder
// ---------------------------------------------------------------------------

/// Builder for [`Experiment`].
///
/// Defaults: `data_dir = "./"`, no `case_path` (case values nested as
/// directories in case order), empty `output_prefix`, `output_suffix =
/// ".nc"`, and on-disk validation enabled.
#[derive(Debug, Clone)]
pub struct ExperimentBuilder {
    name: String,
    cases: Vec<Case>,
    data_dir: PathBuf,
    case_path: Option<String>,
    output_prefix: String,
    output_suffix: String,
    validate_data: bool,
}

impl ExperimentBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
            data_dir: PathBuf::from("./"),
            case_path: None,
            output_prefix: String::new(),
            output_suffix: ".nc".to_string(),
            validate_data: true,
        }
    }

    /// Append one case.
    pub fn with_case(mut self, case: Case) -> Self {
        self.cases.push(case);
        self
    }

    /// Append several cases, in order.
    pub fn with_cases(mut self, cases: impl IntoIterator<Item = Case>) -> Self {
        self.cases.extend(cases);
        self
    }

    /// Set the root directory holding the experiment output.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the directory template, relative to `data_dir`.
    pub fn with_case_path(mut self, template: impl Into<String>) -> Self {
        self.case_path = Some(template.into());
        self
    }

    /// Set the file name prefix template.
    pub fn with_output_prefix(mut self, template: impl Into<String>) -> Self {
        self.output_prefix = template.into();
        self
    }

    /// Set the literal file name suffix.
    pub fn with_output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    /// Enable or disable the on-disk directory check in [`build`](Self::build).
    pub fn with_validate_data(mut self, validate: bool) -> Self {
        self.validate_data = validate;
        self
    }

    /// Compile the templates and, if enabled, check the directory layout.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::Config`] for an empty name, no cases,
    /// duplicate case keys, a case space too large to index, or an
    /// absolute `case_path`;
    /// [`ExperimentError::Template`] / [`ExperimentError::UnknownPlaceholder`]
    /// for bad templates; and [`ExperimentError::PathNotFound`] when
    /// validation is enabled and `data_dir` or any case directory is missing.
    pub fn build(self) -> Result<Experiment, ExperimentError> {
        if self.name.trim().is_empty() {
            return Err(ExperimentError::Config {
                reason: "experiment name must not be empty".to_string(),
            });
        }
        if self.cases.is_empty() {
            return Err(ExperimentError::Config {
                reason: format!("experiment '{}' declares no cases", self.name),
            });
        }

        let mut seen = HashSet::new();
        for case in &self.cases {
            if !seen.insert(case.key()) {
                return Err(ExperimentError::Config {
                    reason: format!("duplicate case key '{}'", case.key()),
                });
            }
        }

        if CaseSpace::new(&self.cases).checked_len().is_none() {
            return Err(ExperimentError::Config {
                reason: format!(
                    "experiment '{}' has more combinations than can be addressed",
                    self.name
                ),
            });
        }

        let keys: Vec<&str> = self.cases.iter().map(Case::key).collect();

        let case_path = match &self.case_path {
            Some(source) if Path::new(source).is_absolute() => {
                return Err(ExperimentError::Config {
                    reason: format!("case_path must be relative, got '{source}'"),
                });
            }
            Some(source) => Some(Template::compile(source, &keys)?),
            None => None,
        };
        let output_prefix = Template::compile(&self.output_prefix, &keys)?;

        let experiment = Experiment {
            name: self.name,
            cases: self.cases,
            data_dir: self.data_dir,
            case_path,
            output_prefix,
            output_suffix: self.output_suffix,
            validate_data: self.validate_data,
        };

        experiment.warn_unreferenced_cases();

        if experiment.validate_data {
            experiment.validate()?;
        }

        info!(
            experiment = %experiment.name,
            n_cases = experiment.cases.len(),
            n_combinations = experiment.case_space().len(),
            "experiment ready"
        );
        Ok(experiment)
    }
}

// ---------------------------------------------------------------------------
// Experiment
// ---------------------------------------------------------------------------

/// A set of cases and the templates that map each combination of case values
/// to a file on disk.
///
/// A file for combination `c` and label `L` lives at
/// `data_dir / case_path(c) / (output_prefix(c) + L + output_suffix)`.
/// Experiments are immutable; every operation takes `&self`.
#[derive(Debug, Clone)]
pub struct Experiment {
    name: String,
    cases: Vec<Case>,
    data_dir: PathBuf,
    case_path: Option<Template>,
    output_prefix: Template,
    output_suffix: String,
    validate_data: bool,
}

impl Experiment {
    /// Start building an experiment called `name`.
    pub fn builder(name: impl Into<String>) -> ExperimentBuilder {
        ExperimentBuilder::new(name)
    }

    /// An experiment of one model run whose files live directly in
    /// `data_dir`.
    ///
    /// The only case is `name` with the single value `name`. No on-disk
    /// validation is performed.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::InvalidCase`] if `name` is not a valid
    /// token.
    pub fn single(
        name: impl Into<String>,
        data_dir: impl Into<PathBuf>,
    ) -> Result<Self, ExperimentError> {
        let name = name.into();
        let case = Case::new(name.clone(), name.clone(), [name.clone()])?;
        Self::builder(name)
            .with_case(case)
            .with_data_dir(data_dir)
            .with_case_path("")
            .with_validate_data(false)
            .build()
    }

    /// Experiment name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cases in declaration order.
    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    /// Case with key `key`.
    pub fn case(&self, key: &str) -> Option<&Case> {
        self.cases.iter().find(|c| c.key() == key)
    }

    /// Case keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(Case::key)
    }

    /// Values of the case with key `key`.
    pub fn case_values(&self, key: &str) -> Option<&[String]> {
        self.case(key).map(Case::values)
    }

    /// Root directory of the experiment output.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory template, if one was given.
    pub fn case_path(&self) -> Option<&str> {
        self.case_path.as_ref().map(Template::source)
    }

    /// File name prefix template.
    pub fn output_prefix(&self) -> &str {
        self.output_prefix.source()
    }

    /// Literal file name suffix.
    pub fn output_suffix(&self) -> &str {
        &self.output_suffix
    }

    /// Whether construction checked the directory layout.
    pub fn validate_data(&self) -> bool {
        self.validate_data
    }

    /// The full case space, enumerated with the first case varying slowest.
    pub fn case_space(&self) -> CaseSpace<'_> {
        CaseSpace::new(&self.cases)
    }

    /// Build a combination from `(key, value)` pairs given in any order.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::CaseCount`] unless there is exactly one
    /// pair per case, [`ExperimentError::UnknownCase`] for an undeclared or
    /// repeated key, and [`ExperimentError::UnknownCaseValue`] for an
    /// undeclared value.
    pub fn combination(&self, pairs: &[(&str, &str)]) -> Result<Combination, ExperimentError> {
        if pairs.len() != self.cases.len() {
            return Err(ExperimentError::CaseCount {
                expected: self.cases.len(),
                got: pairs.len(),
            });
        }
        if let Some((key, _)) = pairs.iter().find(|(k, _)| self.case(k).is_none()) {
            return Err(ExperimentError::UnknownCase {
                key: key.to_string(),
            });
        }

        let mut values = Vec::with_capacity(self.cases.len());
        for case in &self.cases {
            let (_, value) = pairs
                .iter()
                .find(|(k, _)| *k == case.key())
                .ok_or_else(|| ExperimentError::UnknownCase {
                    key: case.key().to_string(),
                })?;
            values.push(value.to_string());
        }
        self.check_values(&values)?;
        Ok(Combination::new(values))
    }

    /// Check that `values` has one declared value per case, in case order.
    pub(crate) fn check_values<S: AsRef<str>>(&self, values: &[S]) -> Result<(), ExperimentError> {
        if values.len() != self.cases.len() {
            return Err(ExperimentError::CaseCount {
                expected: self.cases.len(),
                got: values.len(),
            });
        }
        for (case, value) in self.cases.iter().zip(values) {
            if !case.contains(value.as_ref()) {
                return Err(ExperimentError::UnknownCaseValue {
                    case: case.key().to_string(),
                    value: value.as_ref().to_string(),
                });
            }
        }
        Ok(())
    }

    fn render_dir<S: AsRef<str>>(&self, values: &[S]) -> PathBuf {
        match &self.case_path {
            Some(template) => PathBuf::from(template.render(values)),
            None => {
                let mut dir = PathBuf::new();
                for value in values {
                    let value: &str = value.as_ref();
                    dir.push(value);
                }
                dir
            }
        }
    }

    fn render_file_name<S: AsRef<str>>(&self, values: &[S], label: &str) -> String {
        let mut name = self.output_prefix.render(values);
        name.push_str(label);
        name.push_str(&self.output_suffix);
        name
    }

    pub(crate) fn render_path<S: AsRef<str>>(&self, values: &[S], label: &str) -> PathBuf {
        let dir = self.render_dir(values);
        let file_name = self.render_file_name(values, label);
        if dir.as_os_str().is_empty() {
            self.data_dir.join(file_name)
        } else {
            self.data_dir.join(dir).join(file_name)
        }
    }

    /// Directory of a combination, relative to `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::CaseCount`] or
    /// [`ExperimentError::UnknownCaseValue`] if `values` is not a
    /// combination of this experiment.
    pub fn case_dir<S: AsRef<str>>(&self, values: &[S]) -> Result<PathBuf, ExperimentError> {
        self.check_values(values)?;
        Ok(self.render_dir(values))
    }

    /// File name of a combination for `label`.
    ///
    /// # Errors
    ///
    /// As [`path_for`](Self::path_for).
    pub fn file_name<S: AsRef<str>>(
        &self,
        values: &[S],
        label: &str,
    ) -> Result<String, ExperimentError> {
        self.check_values(values)?;
        check_label(label)?;
        Ok(self.render_file_name(values, label))
    }

    /// Full path of the file holding `label` for one combination.
    ///
    /// `values` holds one value per case, in case order. The result is
    /// `data_dir` joined with the rendered directory and file name; it is
    /// absolute when `data_dir` is.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::CaseCount`] if `values` has the wrong
    /// length, [`ExperimentError::UnknownCaseValue`] if a value is not
    /// declared for its case, and [`ExperimentError::InvalidLabel`] if
    /// `label` contains a brace or path separator.
    pub fn path_for<S: AsRef<str>>(
        &self,
        values: &[S],
        label: &str,
    ) -> Result<PathBuf, ExperimentError> {
        self.check_values(values)?;
        check_label(label)?;
        Ok(self.render_path(values, label))
    }

    /// Case directories relative to `data_dir`, in case-space order, each
    /// listed once.
    pub fn walk_dirs(&self) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        self.case_space()
            .iter()
            .map(|combo| self.render_dir(combo.values()))
            .filter(|dir| seen.insert(dir.clone()))
            .collect()
    }

    /// Every combination with the path of its `label` file, in case-space
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::InvalidLabel`] for an unusable label.
    pub fn walk_files<'a>(
        &'a self,
        label: &'a str,
    ) -> Result<impl Iterator<Item = (Combination, PathBuf)> + 'a, ExperimentError> {
        check_label(label)?;
        Ok(self.case_space().iter().map(move |combo| {
            let path = self.render_path(combo.values(), label);
            (combo, path)
        }))
    }

    /// Combinations whose `label` file does not exist, in case-space order.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::InvalidLabel`] for an unusable label.
    pub fn missing_files(&self, label: &str) -> Result<Vec<(Combination, PathBuf)>, ExperimentError> {
        Ok(self
            .walk_files(label)?
            .filter(|(_, path)| !path.is_file())
            .collect())
    }

    /// Check that `data_dir` and every case directory exist.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::PathNotFound`] naming the first missing
    /// directory in case-space order.
    pub fn validate(&self) -> Result<(), ExperimentError> {
        debug!(data_dir = %self.data_dir.display(), "validating directory layout");
        if !self.data_dir.is_dir() {
            return Err(ExperimentError::PathNotFound {
                path: self.data_dir.clone(),
            });
        }
        for dir in self.walk_dirs() {
            let full = self.data_dir.join(&dir);
            debug!(path = %full.display(), "checking case directory");
            if !full.is_dir() {
                return Err(ExperimentError::PathNotFound { path: full });
            }
        }
        Ok(())
    }

    /// Create `data_dir` and every case directory, returning how many case
    /// directories the layout has.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::Io`] if a directory cannot be created.
    pub fn create_directories(&self) -> Result<usize, ExperimentError> {
        let dirs = self.walk_dirs();
        for dir in std::iter::once(self.data_dir.clone())
            .chain(dirs.iter().map(|d| self.data_dir.join(d)))
        {
            fs::create_dir_all(&dir).map_err(|e| ExperimentError::Io {
                path: dir.clone(),
                reason: e.to_string(),
            })?;
            debug!(path = %dir.display(), "created directory");
        }
        info!(experiment = %self.name, n_dirs = dirs.len(), "directory layout created");
        Ok(dirs.len())
    }

    fn warn_unreferenced_cases(&self) {
        let mut referenced = vec![self.case_path.is_none(); self.cases.len()];
        for slot in self
            .case_path
            .iter()
            .flat_map(Template::slots)
            .chain(self.output_prefix.slots())
        {
            referenced[slot] = true;
        }
        for (case, used) in self.cases.iter().zip(referenced) {
            if !used && case.len() > 1 {
                warn!(
                    experiment = %self.name,
                    case = case.key(),
                    "case is not referenced by case_path or output_prefix; its values share files"
                );
            }
        }
    }
}

/// Reject labels that would escape or break the file name.
pub(crate) fn check_label(label: &str) -> Result<(), ExperimentError> {
    match check_token(label) {
        Some(_) => Err(ExperimentError::InvalidLabel {
            label: label.to_string(),
        }),
        None => Ok(()),
    }
}

impl PartialEq for Experiment {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.data_dir == other.data_dir
            && self.case_path == other.case_path
            && self.output_prefix == other.output_prefix
            && self.output_suffix == other.output_suffix
            && self.validate_data == other.validate_data
            && self.cases.len() == other.cases.len()
            && self
                .cases
                .iter()
                .zip(&other.cases)
                .all(|(a, b)| a.same_as(b))
    }
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -", self.name)?;
        for case in &self.cases {
            write!(
                f,
                "\n   * {} ({}):  [{}]",
                case.key(),
                case.long_name(),
                case.values().join(", ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emis_param(data_dir: &Path) -> Experiment {
        Experiment::builder("scenarios")
            .with_case(Case::new("emis", "Emissions scenario", ["low", "high"]).unwrap())
            .with_case(Case::new("param", "Tuning parameter", ["x", "y", "z"]).unwrap())
            .with_data_dir(data_dir)
            .with_case_path("emis_{emis}/param_{param}")
            .with_output_prefix("{emis}.{param}.")
            .with_output_suffix(".nc")
            .with_validate_data(false)
            .build()
            .unwrap()
    }

    #[test]
    fn build_rejects_unaddressable_case_space() {
        let cases: Vec<Case> = (0..usize::BITS + 1)
            .map(|i| Case::new(format!("k{i}"), "Switch", ["on", "off"]).unwrap())
            .collect();
        let err = Experiment::builder("huge")
            .with_cases(cases)
            .with_validate_data(false)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ExperimentError::Config { reason } if reason.contains("more combinations")
        ));
    }

    #[test]
    fn path_for_concrete_scenario() {
        let exp = emis_param(Path::new("/data"));
        let path = exp.path_for(&["low", "x"], "TS").unwrap();
        assert_eq!(path, PathBuf::from("/data/emis_low/param_x/low.x.TS.nc"));
    }

    #[test]
    fn path_for_every_combination_substitutes_all_placeholders() {
        let exp = emis_param(Path::new("/data"));
        for combo in exp.case_space() {
            let path = exp.path_for(combo.values(), "TS").unwrap();
            let text = path.to_string_lossy();
            assert!(!text.contains('{') && !text.contains('}'));
            for value in combo.values() {
                assert!(text.contains(value.as_str()));
            }
        }
    }

    #[test]
    fn path_for_rejects_wrong_length() {
        let exp = emis_param(Path::new("/data"));
        let err = exp.path_for(&["low"], "TS").unwrap_err();
        assert!(matches!(
            err,
            ExperimentError::CaseCount {
                expected: 2,
                got: 1
            }
        ));
        let err = exp.path_for(&["low", "x", "extra"], "TS").unwrap_err();
        assert!(matches!(err, ExperimentError::CaseCount { got: 3, .. }));
    }

    #[test]
    fn path_for_rejects_undeclared_value() {
        let exp = emis_param(Path::new("/data"));
        let err = exp.path_for(&["low", "w"], "TS").unwrap_err();
        assert!(matches!(
            err,
            ExperimentError::UnknownCaseValue { case, value } if case == "param" && value == "w"
        ));
    }

    #[test]
    fn path_for_rejects_bad_label() {
        let exp = emis_param(Path::new("/data"));
        for label in ["", "../TS", "a/b", "{emis}"] {
            assert!(matches!(
                exp.path_for(&["low", "x"], label),
                Err(ExperimentError::InvalidLabel { .. })
            ));
        }
    }

    #[test]
    fn default_case_path_nests_values() {
        let exp = Experiment::builder("nested")
            .with_case(Case::new("aer", "Aerosol", ["F2000", "F1850"]).unwrap())
            .with_case(Case::new("act", "Activation", ["arg_comp"]).unwrap())
            .with_data_dir("/archive")
            .with_validate_data(false)
            .build()
            .unwrap();
        assert_eq!(exp.case_path(), None);
        assert_eq!(
            exp.path_for(&["F1850", "arg_comp"], "T").unwrap(),
            PathBuf::from("/archive/F1850/arg_comp/T.nc")
        );
    }

    #[test]
    fn unknown_placeholder_fails_construction() {
        let result = Experiment::builder("bad")
            .with_case(Case::new("emis", "Emissions", ["low"]).unwrap())
            .with_case_path("{emis}/{param}")
            .with_validate_data(false)
            .build();
        assert!(matches!(
            result,
            Err(ExperimentError::UnknownPlaceholder { name, .. }) if name == "param"
        ));

        let result = Experiment::builder("bad")
            .with_case(Case::new("emis", "Emissions", ["low"]).unwrap())
            .with_output_prefix("{scenario}.")
            .with_validate_data(false)
            .build();
        assert!(matches!(
            result,
            Err(ExperimentError::UnknownPlaceholder { .. })
        ));
    }

    #[test]
    fn construction_rejects_bad_settings() {
        let no_cases = Experiment::builder("empty").with_validate_data(false).build();
        assert!(matches!(no_cases, Err(ExperimentError::Config { .. })));

        let dup = Experiment::builder("dup")
            .with_case(Case::new("emis", "A", ["low"]).unwrap())
            .with_case(Case::new("emis", "B", ["high"]).unwrap())
            .with_validate_data(false)
            .build();
        assert!(matches!(dup, Err(ExperimentError::Config { reason }) if reason.contains("duplicate")));

        let absolute = Experiment::builder("abs")
            .with_case(Case::new("emis", "A", ["low"]).unwrap())
            .with_case_path("/root/{emis}")
            .with_validate_data(false)
            .build();
        assert!(matches!(absolute, Err(ExperimentError::Config { .. })));
    }

    #[test]
    fn combination_from_pairs() {
        let exp = emis_param(Path::new("/data"));
        let combo = exp.combination(&[("param", "y"), ("emis", "high")]).unwrap();
        assert_eq!(combo.values(), &["high".to_string(), "y".to_string()]);

        assert!(matches!(
            exp.combination(&[("emis", "high")]),
            Err(ExperimentError::CaseCount { .. })
        ));
        assert!(matches!(
            exp.combination(&[("emis", "high"), ("nope", "y")]),
            Err(ExperimentError::UnknownCase { key }) if key == "nope"
        ));
        assert!(matches!(
            exp.combination(&[("emis", "high"), ("emis", "low")]),
            Err(ExperimentError::UnknownCase { key }) if key == "param"
        ));
        assert!(matches!(
            exp.combination(&[("emis", "mid"), ("param", "y")]),
            Err(ExperimentError::UnknownCaseValue { .. })
        ));
    }

    #[test]
    fn walk_dirs_deduplicates() {
        let exp = Experiment::builder("sample")
            .with_case(Case::new("p1", "Parameter 1", ["a", "b"]).unwrap())
            .with_case(Case::new("p2", "Parameter 2", ["alpha", "beta"]).unwrap())
            .with_case_path("{p1}")
            .with_output_prefix("{p1}.{p2}.")
            .with_validate_data(false)
            .build()
            .unwrap();
        assert_eq!(
            exp.walk_dirs(),
            vec![PathBuf::from("a"), PathBuf::from("b")]
        );
    }

    #[test]
    fn walk_files_follows_case_space_order() {
        let exp = emis_param(Path::new("/data"));
        let files: Vec<(Combination, PathBuf)> = exp.walk_files("TS").unwrap().collect();
        assert_eq!(files.len(), 6);
        assert_eq!(files[0].0.values(), &["low".to_string(), "x".to_string()]);
        assert_eq!(
            files[5].1,
            PathBuf::from("/data/emis_high/param_z/high.z.TS.nc")
        );
        assert!(exp.walk_files("a/b").is_err());
    }

    #[test]
    fn single_case_experiment_reads_from_data_dir() {
        let exp = Experiment::single("control", "/runs/control").unwrap();
        assert_eq!(exp.cases().len(), 1);
        assert_eq!(exp.case_values("control"), Some(&["control".to_string()][..]));
        assert_eq!(
            exp.path_for(&["control"], "T").unwrap(),
            PathBuf::from("/runs/control/T.nc")
        );
    }

    #[test]
    fn display_lists_cases() {
        let exp = Experiment::builder("my_experiment")
            .with_case(
                Case::new("emis", "Emissions Scenario", ["policy", "no_policy"]).unwrap(),
            )
            .with_case(Case::new("model_config", "Model configuration", ["no_clouds"]).unwrap())
            .with_validate_data(false)
            .build()
            .unwrap();
        assert_eq!(
            exp.to_string(),
            "my_experiment -\n   * emis (Emissions Scenario):  [policy, no_policy]\n   * model_config (Model configuration):  [no_clouds]"
        );
    }

    #[test]
    fn equality_compares_case_contents() {
        let a = emis_param(Path::new("/data"));
        let b = emis_param(Path::new("/data"));
        assert_eq!(a, b);

        let c = Experiment::builder("scenarios")
            .with_case(Case::new("emis", "Emissions scenario", ["low", "high"]).unwrap())
            .with_case(Case::new("param", "Tuning parameter", ["x", "y"]).unwrap())
            .with_data_dir("/data")
            .with_case_path("emis_{emis}/param_{param}")
            .with_output_prefix("{emis}.{param}.")
            .with_validate_data(false)
            .build()
            .unwrap();
        assert_ne!(a, c);
    }
}
